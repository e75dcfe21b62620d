//! # Dayplan
//!
//! A terminal task planner with projects, labels, recurring task series,
//! and daily/monthly work reports. All state lives in JSON files in a local
//! data directory.
//!
//! The heart of the crate is [`recurrence`]: [`recurrence::next_occurrence`]
//! steps a date along a repeat rule, [`recurrence::regenerate_series`]
//! rebuilds a series from its template, and [`recurrence::apply_update`]
//! routes every task edit through the right series transition.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod recurrence;
pub mod reports;
pub mod storage;
pub mod tasks;
pub mod views;

pub use error::{Error, Result};
