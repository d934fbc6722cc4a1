//! End-to-end runs of the full demo sequence.
//!
//! These tests exercise the driver exactly as the binary does, with the
//! delays scaled down so the suite stays fast.

#![cfg(test)]

use std::sync::Arc;
use std::time::Instant;

use crate::config::DemoConfig;
use crate::driver::DemoDriver;
use crate::logging::{Logger, MemorySink};

fn fast_config() -> DemoConfig {
    DemoConfig {
        cpu_iterations: 50_000,
        io_delay_ms: 60,
        parallel_for_iterations: 5,
        parallel_map_items: 5,
        per_item_delay_ms: 30,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn full_sequence_completes_with_noop_logger() {
    let config = fast_config();
    let driver = DemoDriver::new(config.clone(), Logger::null());

    let started = Instant::now();
    let report = driver.run_all_demos().await.unwrap();
    let wall = started.elapsed();

    // The driver must not return before both background operations finish,
    // so wall time is bounded below by the delay-bound task.
    assert!(wall >= config.io_delay());
    assert_eq!(report.map_results, vec![2, 4, 6, 8, 10]);
}

#[tokio::test(flavor = "multi_thread")]
async fn degenerate_iteration_range_still_runs_to_completion() {
    let config = DemoConfig {
        parallel_for_iterations: 0,
        ..fast_config()
    };
    let driver = DemoDriver::new(config, Logger::null());

    let report = driver.run_all_demos().await.unwrap();
    assert_eq!(report.for_completed, 0);
    assert_eq!(report.invoke_completed, 3);
    assert_eq!(report.map_results, vec![2, 4, 6, 8, 10]);
}

#[tokio::test(flavor = "multi_thread")]
async fn sequential_runs_produce_equally_shaped_logs() {
    let config = fast_config();

    let mut line_counts = Vec::new();
    for _ in 0..2 {
        let sink = Arc::new(MemorySink::new());
        let driver = DemoDriver::new(config.clone(), Logger::new(sink.clone()));
        driver.run_all_demos().await.unwrap();

        let lines = sink.lines();
        assert!(lines.first().is_some_and(|l| l.contains("Starting demo sequence")));
        assert!(lines.last().is_some_and(|l| l.contains("All tasks completed in")));
        line_counts.push(lines.len());
    }

    assert_eq!(line_counts[0], line_counts[1]);
}

#[tokio::test(flavor = "multi_thread")]
async fn map_results_are_printed_in_order_after_the_step() {
    let sink = Arc::new(MemorySink::new());
    let driver = DemoDriver::new(fast_config(), Logger::new(sink.clone()));
    driver.run_all_demos().await.unwrap();

    let lines = sink.lines();
    let printed: Vec<&String> = lines
        .iter()
        .filter(|l| l.contains("Parallel map result:"))
        .collect();

    assert_eq!(printed.len(), 5);
    for (i, line) in printed.iter().enumerate() {
        assert!(line.ends_with(&format!("Parallel map result: {}", (i as i64 + 1) * 2)));
    }
}
