//! Property-based tests for ProgressService.
//!
//! - Monotonicity: accepted chains never decrease in percent or date
//! - Replay agrees with incremental application
//! - Completion and delay derivation

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use super::service::ProgressService;
use super::status::{ActivityProgress, ActivityStatus};
use super::types::{LogCandidate, LogEntry};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// (day offset, percent) attempts; many will be rejected.
fn attempts(max_len: usize) -> impl Strategy<Value = Vec<(i64, i16)>> {
    prop::collection::vec((0i64..60, -5i16..=105), 1..=max_len)
}

/// Feeds every attempt through the service, keeping the accepted ones.
fn run(
    attempts: &[(i64, i16)],
    planned_end: Option<NaiveDate>,
) -> (ActivityProgress, Vec<LogEntry>) {
    let mut state = ActivityProgress::pending();
    let mut logs: Vec<LogEntry> = Vec::new();

    for (i, (offset, percent)) in attempts.iter().enumerate() {
        let candidate = LogCandidate {
            date: start() + Duration::days(*offset),
            progress_percent: *percent,
        };
        if let Ok(next) = ProgressService::evaluate(
            &state,
            planned_end,
            &candidate,
            ProgressService::latest(&logs),
        ) {
            state = next;
            logs.push(LogEntry {
                id: i32::try_from(i).unwrap() + 1,
                date: candidate.date,
                progress_percent: candidate.progress_percent,
            });
        }
    }

    (state, logs)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Accepted logs in insertion order never decrease in percent or date.
    #[test]
    fn prop_accepted_chain_is_monotonic(attempts in attempts(30)) {
        let (_, logs) = run(&attempts, None);
        for pair in logs.windows(2) {
            prop_assert!(pair[1].progress_percent >= pair[0].progress_percent);
            prop_assert!(pair[1].date >= pair[0].date);
            prop_assert!(pair[1].progress_percent > 0);
        }
        for log in &logs {
            prop_assert!((0..=100).contains(&log.progress_percent));
        }
    }

    /// Replaying the accepted chain from scratch yields the incremental state.
    #[test]
    fn prop_replay_matches_incremental(
        attempts in attempts(30),
        planned_offset in prop::option::of(0i64..60),
    ) {
        let planned_end = planned_offset.map(|d| start() + Duration::days(d));
        let (state, logs) = run(&attempts, planned_end);
        prop_assert_eq!(ActivityProgress::replay(&logs, planned_end), state);
    }

    /// The activity percent is the latest accepted log's percent; status follows it.
    #[test]
    fn prop_status_follows_latest_log(attempts in attempts(30)) {
        let (state, logs) = run(&attempts, None);
        match logs.last() {
            None => prop_assert_eq!(state, ActivityProgress::pending()),
            Some(last) => {
                prop_assert_eq!(state.progress_percent, last.progress_percent);
                let expected = match last.progress_percent {
                    100 => ActivityStatus::Completed,
                    0 => ActivityStatus::Pending,
                    _ => ActivityStatus::InProgress,
                };
                prop_assert_eq!(state.status, expected);
                if state.status == ActivityStatus::Completed {
                    prop_assert_eq!(state.actual_end, Some(last.date));
                }
            }
        }
    }

    /// Without completion, a latest log past the planned end means Delayed.
    #[test]
    fn prop_late_unfinished_is_delayed(
        attempts in attempts(30),
        planned_offset in 0i64..60,
    ) {
        let planned_end = start() + Duration::days(planned_offset);
        let (state, logs) = run(&attempts, Some(planned_end));
        if let Some(last) = logs.last() {
            if last.date > planned_end && last.progress_percent < 100 {
                prop_assert_eq!(state.status, ActivityStatus::Delayed);
            }
            if last.progress_percent == 100 {
                prop_assert_eq!(state.status, ActivityStatus::Completed);
            }
        }
    }
}
