//! Unit tests for Mentorboard.

mod notifications_tests;
mod perf_tests;
mod settings_tests;
mod snapshot_tests;
