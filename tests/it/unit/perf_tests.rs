//! Unit tests for hover tick statistics.

use mentorboard::perf::{TickStats, measure};

#[test]
fn test_empty_stats() {
    let stats = TickStats::default();
    assert_eq!(stats.count(), 0);
    assert_eq!(stats.average(), 0.0);
    assert_eq!(stats.over_budget_percentage(), 0.0);
}

#[test]
fn test_over_budget_share() {
    let mut stats = TickStats::default();
    stats.record(1.0);
    stats.record(2.0);
    stats.record(3.0);
    stats.record(10.0);

    assert_eq!(stats.count(), 4);
    assert_eq!(stats.max_ms(), 10.0);
    assert_eq!(stats.average(), 4.0);
    assert_eq!(stats.over_budget_percentage(), 25.0);

    stats.reset();
    assert_eq!(stats.count(), 0);
    assert_eq!(stats.max_ms(), 0.0);
}

#[test]
fn test_measure_times_closure() {
    let (value, elapsed) = measure(|| (1..=10).sum::<u32>());
    assert_eq!(value, 55);
    assert!(elapsed >= 0.0);
}
