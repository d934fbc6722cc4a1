//! The demo driver: a fixed, linear sequence of concurrency patterns.
//!
//! The sequence is deliberately scripted so that any interleaving visible
//! in the log comes from the scheduler, not from the driver:
//!
//! 1. spawn a CPU-bound task on the blocking pool (not awaited yet)
//! 2. spawn a delay-bound task on the async runtime (not awaited yet)
//! 3. bounded parallel iteration, awaited to completion
//! 4. parallel invocation of three independent actions, awaited
//! 5. order-preserving parallel map, awaited
//! 6. gather both background tasks, then report elapsed time

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::future::join_all;
use rayon::prelude::*;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::DemoConfig;
use crate::logging::{Logger, current_thread_label};

/// Shape of one completed demo run.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    /// Checksum of the CPU-bound loop (sum of square roots).
    pub cpu_checksum: f64,
    /// Iterations completed by the bounded parallel iteration.
    pub for_completed: usize,
    /// Actions completed by the parallel invocation.
    pub invoke_completed: usize,
    /// Ordered results of the parallel map.
    pub map_results: Vec<i64>,
    /// Wall-clock duration of the whole run.
    pub elapsed: Duration,
}

/// Runs the demo sequence and logs its progress through a [`Logger`].
///
/// The driver holds no mutable state; running it twice yields two
/// independent runs.
pub struct DemoDriver {
    config: DemoConfig,
    logger: Logger,
}

impl DemoDriver {
    pub fn new(config: DemoConfig, logger: Logger) -> Self {
        Self { config, logger }
    }

    /// Run the full demo sequence once.
    ///
    /// Returns only after every step, including both background tasks, has
    /// finished. A panic in any branch surfaces here after its sibling
    /// branches settle.
    pub async fn run_all_demos(&self) -> Result<DemoReport> {
        self.logger.log(&format!(
            "Starting demo sequence on {}",
            current_thread_label()
        ));
        let started = Instant::now();

        self.logger.log("Spawning CPU-bound task...");
        let cpu_task = self.spawn_cpu_task();

        self.logger.log("Spawning I/O-bound task...");
        let io_task = self.spawn_delay_task();

        self.logger.log("Entering bounded parallel iteration...");
        let for_completed = self.parallel_for().await?;

        self.logger.log("Entering parallel invocation...");
        let invoke_completed = self.parallel_invoke().await?;

        self.logger.log("Entering parallel map...");
        let map_results = self.parallel_map().await?;
        for result in &map_results {
            self.logger.log(&format!("Parallel map result: {}", result));
        }

        self.logger.log("Waiting for background tasks...");
        // Let both settle before propagating either failure.
        let (cpu_res, io_res) = tokio::join!(cpu_task, io_task);
        let cpu_checksum = cpu_res.context("CPU-bound task faulted")?;
        io_res.context("I/O-bound task faulted")?;

        let elapsed = started.elapsed();
        self.logger
            .log(&format!("All tasks completed in {} ms", elapsed.as_millis()));

        Ok(DemoReport {
            cpu_checksum,
            for_completed,
            invoke_completed,
            map_results,
            elapsed,
        })
    }

    /// Fire-and-forget CPU-bound work on the blocking pool. The returned
    /// handle is gathered at the end of the sequence.
    fn spawn_cpu_task(&self) -> JoinHandle<f64> {
        let logger = self.logger.clone();
        let iterations = self.config.cpu_iterations;

        tokio::task::spawn_blocking(move || {
            logger.log(&format!(
                "CPU-bound task started on {}",
                current_thread_label()
            ));

            let mut checksum = 0.0;
            for i in 0..iterations {
                checksum += (i as f64).sqrt();
            }

            logger.log(&format!(
                "CPU-bound task completed on {}",
                current_thread_label()
            ));
            checksum
        })
    }

    /// Fire-and-forget delay-bound work. Suspends at the sleep without
    /// holding a worker thread.
    fn spawn_delay_task(&self) -> JoinHandle<()> {
        let logger = self.logger.clone();
        let delay = self.config.io_delay();

        tokio::spawn(async move {
            logger.log(&format!(
                "I/O-bound task started on {}",
                current_thread_label()
            ));
            tokio::time::sleep(delay).await;
            logger.log(&format!(
                "I/O-bound task resumed on {}",
                current_thread_label()
            ));
        })
    }

    /// Bounded parallel iteration on the rayon pool.
    ///
    /// Blocks (on the blocking pool, never the async executor) until every
    /// iteration has run. Iteration order is unspecified.
    async fn parallel_for(&self) -> Result<usize> {
        let logger = self.logger.clone();
        let iterations = self.config.parallel_for_iterations;
        let completed = Arc::new(AtomicUsize::new(0));
        let pool_completed = completed.clone();

        tokio::task::spawn_blocking(move || {
            (0..iterations).into_par_iter().for_each(|i| {
                logger.log(&format!(
                    "Parallel iteration index {} on {}",
                    i,
                    current_thread_label()
                ));
                let local_value = i * 10;
                logger.log(&format!("Iteration {} local value = {}", i, local_value));
                pool_completed.fetch_add(1, Ordering::Relaxed);
            });
        })
        .await
        .context("bounded parallel iteration faulted")?;

        let count = completed.load(Ordering::Relaxed);
        debug!("bounded parallel iteration finished ({} iterations)", count);
        Ok(count)
    }

    /// Three independent actions fanned out on the rayon pool; all finish
    /// before this returns.
    async fn parallel_invoke(&self) -> Result<usize> {
        let logger = self.logger.clone();
        let completed = Arc::new(AtomicUsize::new(0));
        let pool_completed = completed.clone();

        tokio::task::spawn_blocking(move || {
            rayon::scope(|s| {
                for action in 1..=3 {
                    let logger = logger.clone();
                    let completed = pool_completed.clone();
                    s.spawn(move |_| {
                        logger.log(&format!(
                            "Invoke action {} on {}",
                            action,
                            current_thread_label()
                        ));
                        completed.fetch_add(1, Ordering::Relaxed);
                    });
                }
            });
        })
        .await
        .context("parallel invocation faulted")?;

        let count = completed.load(Ordering::Relaxed);
        debug!("parallel invocation finished ({} actions)", count);
        Ok(count)
    }

    /// Order-preserving parallel map: one spawned task per input, handles
    /// gathered in spawn order so the output matches the input order no
    /// matter which item finishes first.
    async fn parallel_map(&self) -> Result<Vec<i64>> {
        let delay = self.config.per_item_delay();

        let handles: Vec<JoinHandle<i64>> = (1..=self.config.parallel_map_items as i64)
            .map(|n| {
                let logger = self.logger.clone();
                tokio::spawn(async move {
                    logger.log(&format!(
                        "Parallel map processing {} on {}",
                        n,
                        current_thread_label()
                    ));
                    tokio::time::sleep(delay).await;
                    n * 2
                })
            })
            .collect();

        // join_all waits for every item before any error propagates.
        let mut results = Vec::with_capacity(handles.len());
        for joined in join_all(handles).await {
            results.push(joined.context("parallel map item faulted")?);
        }
        Ok(results)
    }
}
