//! Activity and progress repository tests against in-memory SQLite.

mod common;

use buildtrack_core::progress::{
    ActivityStatus, CreateActivityInput, ProgressError, UpdateActivityInput, UpdateLogInput,
};
use buildtrack_db::entities::sea_orm_active_enums::ActivityStatus as DbActivityStatus;
use buildtrack_db::repositories::TrackingError;
use buildtrack_shared::types::ProjectId;
use common::{TestContext, date, log};
use rust_decimal_macros::dec;
use sea_orm::ConnectionTrait;

#[tokio::test]
async fn test_monotonic_progress_and_completion() {
    let ctx = TestContext::new().await;
    let project = ctx.project("A-001").await;
    let activity = ctx.activity(project.id, Some(date(3, 1)), Some(date(4, 30))).await;
    let progress = ctx.progress();

    let (_, a) = progress.add_progress_log(log(activity.id, date(3, 1), 30)).await.unwrap();
    assert_eq!(a.status, DbActivityStatus::InProgress);
    assert_eq!(a.actual_start, Some(date(3, 1)));

    let (_, a) = progress.add_progress_log(log(activity.id, date(3, 10), 60)).await.unwrap();
    assert_eq!(a.progress_percent, 60);

    let rejected = progress.add_progress_log(log(activity.id, date(3, 12), 50)).await;
    assert!(matches!(
        rejected,
        Err(TrackingError::Progress(ProgressError::ProgressDecreased { previous: 60, attempted: 50 }))
    ));
    let state = progress.current_status(activity.id).await.unwrap();
    assert_eq!(state.progress_percent, 60);
    assert_eq!(progress.list_progress_logs(activity.id).await.unwrap().len(), 2);

    let (log_row, a) = progress.add_progress_log(log(activity.id, date(3, 20), 100)).await.unwrap();
    assert_eq!(a.status, DbActivityStatus::Completed);
    assert_eq!(a.actual_end, Some(date(3, 20)));
    assert_eq!(a.actual_start, Some(date(3, 1)));
    assert_eq!(log_row.progress_percent, 100);
}

#[tokio::test]
async fn test_rejected_write_leaves_no_trace() {
    let ctx = TestContext::new().await;
    let project = ctx.project("A-002").await;
    let activity = ctx.activity(project.id, None, None).await;
    let progress = ctx.progress();

    progress.add_progress_log(log(activity.id, date(3, 1), 40)).await.unwrap();
    let before = progress.current_status(activity.id).await.unwrap();

    assert!(progress.add_progress_log(log(activity.id, date(3, 2), 30)).await.is_err());
    assert!(progress.add_progress_log(log(activity.id, date(2, 28), 50)).await.is_err());
    assert!(progress.add_progress_log(log(activity.id, date(3, 2), 101)).await.is_err());

    assert_eq!(progress.current_status(activity.id).await.unwrap(), before);
    assert_eq!(progress.list_progress_logs(activity.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_zero_after_start_rejected() {
    let ctx = TestContext::new().await;
    let project = ctx.project("A-003").await;
    let activity = ctx.activity(project.id, None, None).await;
    let progress = ctx.progress();

    let (_, a) = progress.add_progress_log(log(activity.id, date(3, 1), 0)).await.unwrap();
    assert_eq!(a.status, DbActivityStatus::Pending);

    let result = progress.add_progress_log(log(activity.id, date(3, 2), 0)).await;
    assert!(matches!(
        result,
        Err(TrackingError::Progress(ProgressError::ZeroAfterStart))
    ));
}

#[tokio::test]
async fn test_delay_detection() {
    let ctx = TestContext::new().await;
    let project = ctx.project("A-004").await;
    let activity = ctx.activity(project.id, Some(date(3, 1)), Some(date(3, 31))).await;
    let progress = ctx.progress();

    let (_, a) = progress.add_progress_log(log(activity.id, date(4, 5), 50)).await.unwrap();
    assert_eq!(a.status, DbActivityStatus::Delayed);

    // Completing late still completes.
    let (_, a) = progress.add_progress_log(log(activity.id, date(4, 9), 100)).await.unwrap();
    assert_eq!(a.status, DbActivityStatus::Completed);
}

#[tokio::test]
async fn test_completing_log_cannot_be_deleted() {
    let ctx = TestContext::new().await;
    let project = ctx.project("A-005").await;
    let activity = ctx.activity(project.id, None, None).await;
    let progress = ctx.progress();

    let (first, _) = progress.add_progress_log(log(activity.id, date(3, 1), 30)).await.unwrap();
    let (last, _) = progress.add_progress_log(log(activity.id, date(3, 20), 100)).await.unwrap();

    let result = progress.soft_delete_progress_log(last.id).await;
    assert!(matches!(
        result,
        Err(TrackingError::Progress(ProgressError::CompletedLogDelete))
    ));
    assert_eq!(progress.list_progress_logs(activity.id).await.unwrap().len(), 2);
    assert_eq!(
        progress.current_status(activity.id).await.unwrap().status,
        ActivityStatus::Completed
    );

    // Earlier logs may go; the cached state stays until resync.
    progress.soft_delete_progress_log(first.id).await.unwrap();
    let state = progress.current_status(activity.id).await.unwrap();
    assert_eq!(state.actual_start, Some(date(3, 1)));

    let resynced = progress.resync_activity(activity.id).await.unwrap();
    assert_eq!(resynced.status, DbActivityStatus::Completed);
    assert_eq!(resynced.actual_start, None);
    assert_eq!(resynced.actual_end, Some(date(3, 20)));
}

#[tokio::test]
async fn test_soft_deleted_log_is_not_prior() {
    let ctx = TestContext::new().await;
    let project = ctx.project("A-006").await;
    let activity = ctx.activity(project.id, None, None).await;
    let progress = ctx.progress();

    progress.add_progress_log(log(activity.id, date(3, 1), 20)).await.unwrap();
    let (second, _) = progress.add_progress_log(log(activity.id, date(3, 10), 70)).await.unwrap();
    progress.soft_delete_progress_log(second.id).await.unwrap();

    // 50 is below the deleted 70 but above the remaining 20.
    let (_, a) = progress.add_progress_log(log(activity.id, date(3, 5), 50)).await.unwrap();
    assert_eq!(a.progress_percent, 50);
}

#[tokio::test]
async fn test_update_log_revalidates_against_prior() {
    let ctx = TestContext::new().await;
    let project = ctx.project("A-007").await;
    let activity = ctx.activity(project.id, None, None).await;
    let progress = ctx.progress();

    progress.add_progress_log(log(activity.id, date(3, 1), 20)).await.unwrap();
    let (second, _) = progress.add_progress_log(log(activity.id, date(3, 10), 40)).await.unwrap();

    let (_, a) = progress
        .update_progress_log(
            second.id,
            UpdateLogInput {
                progress_percent: Some(45),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(a.progress_percent, 45);

    let result = progress
        .update_progress_log(
            second.id,
            UpdateLogInput {
                progress_percent: Some(10),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(TrackingError::Progress(ProgressError::ProgressDecreased { .. }))
    ));
}

#[tokio::test]
async fn test_activity_planning_rules() {
    let ctx = TestContext::new().await;
    let project = ctx.project("A-008").await;
    let activities = ctx.activities();

    let inverted = activities
        .create_activity(CreateActivityInput {
            project_id: ProjectId::from_uuid(project.id),
            category: None,
            name: "Roofing".to_string(),
            description: String::new(),
            planned_start: Some(date(5, 1)),
            planned_end: Some(date(4, 1)),
            created_by: None,
        })
        .await;
    assert!(matches!(
        inverted,
        Err(TrackingError::Progress(ProgressError::PlannedEndBeforeStart))
    ));

    let activity = ctx.activity(project.id, Some(date(3, 1)), Some(date(3, 31))).await;
    let result = activities
        .update_activity(
            activity.id,
            UpdateActivityInput {
                planned_end: Some(date(2, 1)),
                ..Default::default()
            },
            None,
        )
        .await;
    assert!(matches!(
        result,
        Err(TrackingError::Progress(ProgressError::PlannedEndBeforeStart))
    ));

    let updated = activities
        .update_activity(
            activity.id,
            UpdateActivityInput {
                name: Some("Foundation and footing".to_string()),
                planned_end: Some(date(4, 15)),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Foundation and footing");
    assert_eq!(updated.status, DbActivityStatus::Pending);

    activities.soft_delete_activity(activity.id, None).await.unwrap();
    assert!(activities.list_activities(project.id).await.unwrap().is_empty());
    assert!(matches!(
        ctx.progress().add_progress_log(log(activity.id, date(3, 1), 10)).await,
        Err(TrackingError::Progress(ProgressError::ActivityNotFound(_)))
    ));
}

#[tokio::test]
async fn test_inactive_project_blocks_progress() {
    let ctx = TestContext::new().await;
    let project = ctx.project("A-009").await;
    let activity = ctx.activity(project.id, None, None).await;
    ctx.projects().deactivate_project(project.id).await.unwrap();

    let result = ctx.progress().add_progress_log(log(activity.id, date(3, 1), 10)).await;
    assert!(matches!(
        result,
        Err(TrackingError::Progress(ProgressError::ProjectInactive(_)))
    ));
}

#[tokio::test]
async fn test_overview_and_weekly_trend() {
    let ctx = TestContext::new().await;
    let project = ctx.project("A-010").await;
    let progress = ctx.progress();

    let a = ctx.activity(project.id, None, None).await;
    let b = ctx.activity(project.id, None, None).await;
    ctx.activity(project.id, None, None).await;

    // 2024-03-04 and 2024-03-11 are Mondays.
    progress.add_progress_log(log(a.id, date(3, 5), 20)).await.unwrap();
    progress.add_progress_log(log(a.id, date(3, 12), 50)).await.unwrap();
    progress.add_progress_log(log(b.id, date(3, 6), 35)).await.unwrap();
    progress.add_progress_log(log(b.id, date(3, 13), 100)).await.unwrap();

    let overview = progress.progress_overview(project.id).await.unwrap();
    assert_eq!(overview.total_activities, 3);
    assert_eq!(overview.pending, 1);
    assert_eq!(overview.in_progress, 1);
    assert_eq!(overview.completed, 1);
    assert_eq!(overview.overall_progress, dec!(50.0));
    let last_update = overview.last_activity_update.unwrap();
    let b_updated = ctx.activities().get_activity(b.id).await.unwrap().updated_at;
    assert_eq!(last_update, b_updated.with_timezone(&chrono::Utc));

    let trend = progress.weekly_trend(project.id).await.unwrap();
    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0].week_start, date(3, 4));
    assert_eq!(trend[0].progress, 35);
    assert_eq!(trend[1].week_start, date(3, 11));
    assert_eq!(trend[1].progress, 100);
}

#[tokio::test]
async fn test_same_day_completion_cannot_be_deleted() {
    let ctx = TestContext::new().await;
    let project = ctx.project("A-011").await;
    let activity = ctx.activity(project.id, None, None).await;
    let progress = ctx.progress();

    let (first, _) = progress.add_progress_log(log(activity.id, date(3, 20), 100)).await.unwrap();
    let (second, _) = progress.add_progress_log(log(activity.id, date(3, 20), 100)).await.unwrap();
    assert!(first.id < second.id);

    // Ties with the latest 100% log on the same date.
    let result = progress.soft_delete_progress_log(first.id).await;
    assert!(matches!(
        result,
        Err(TrackingError::Progress(ProgressError::CompletedLogDelete))
    ));
    assert_eq!(progress.list_progress_logs(activity.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_activity_update_rolls_back_log() {
    let ctx = TestContext::new().await;
    let project = ctx.project("A-012").await;
    let activity = ctx.activity(project.id, None, None).await;
    let progress = ctx.progress();

    progress.add_progress_log(log(activity.id, date(3, 1), 20)).await.unwrap();
    let before = progress.current_status(activity.id).await.unwrap();

    // The log insert succeeds; the derived-state update that follows fails.
    ctx.db
        .execute_unprepared(
            "CREATE TRIGGER refuse_activity_update BEFORE UPDATE ON activities \
             BEGIN SELECT RAISE(ABORT, 'activity update refused'); END;",
        )
        .await
        .unwrap();

    let result = progress.add_progress_log(log(activity.id, date(3, 5), 40)).await;
    assert!(matches!(result, Err(TrackingError::Database(_))));

    ctx.db
        .execute_unprepared("DROP TRIGGER refuse_activity_update;")
        .await
        .unwrap();

    let logs = progress.list_progress_logs(activity.id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].progress_percent, 20);
    assert_eq!(progress.current_status(activity.id).await.unwrap(), before);

    // The chain still accepts the rejected write once the fault is gone.
    let (_, a) = progress.add_progress_log(log(activity.id, date(3, 5), 40)).await.unwrap();
    assert_eq!(a.progress_percent, 40);
}
