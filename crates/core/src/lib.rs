//! Core business logic for Buildtrack.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Running balance per project over fund transactions
//! - `progress` - Monotonic progress logs and the derived activity status

pub mod ledger;
pub mod progress;
