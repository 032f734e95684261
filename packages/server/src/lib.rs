//! Live poll server library.
//!
//! Accepts votes under a one-vote-per-voter rule, recomputes per-option counts,
//! and pushes results and participant counts to every connection viewing a poll.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
