//! Shared utilities for the Tohyo live poll workspace.

pub mod logger;
pub mod time;
