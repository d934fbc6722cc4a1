//! Demo run configuration.
//!
//! Defaults reproduce the documented demo constants. A JSON file can
//! override any subset of fields, and CLI flags override the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Iterations of the square-root accumulation loop in the CPU-bound task.
    pub cpu_iterations: u64,
    /// Simulated I/O latency for the delay-bound task, in milliseconds.
    pub io_delay_ms: u64,
    /// Upper bound (exclusive) of the bounded parallel iteration.
    pub parallel_for_iterations: usize,
    /// Number of inputs fed to the parallel map (1..=n).
    pub parallel_map_items: usize,
    /// Simulated per-item work in the parallel map, in milliseconds.
    pub per_item_delay_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            cpu_iterations: 10_000_000,
            io_delay_ms: 1000,
            parallel_for_iterations: 5,
            parallel_map_items: 5,
            per_item_delay_ms: 1000,
        }
    }
}

impl DemoConfig {
    pub fn io_delay(&self) -> Duration {
        Duration::from_millis(self.io_delay_ms)
    }

    pub fn per_item_delay(&self) -> Duration {
        Duration::from_millis(self.per_item_delay_ms)
    }
}

/// Locate a config file when none was given explicitly: `./demo.json` if
/// it exists, otherwise none (defaults apply).
pub fn resolve_config_path() -> Option<PathBuf> {
    let candidate = PathBuf::from("demo.json");
    if candidate.exists() {
        return Some(candidate);
    }
    None
}

/// Load the demo configuration.
///
/// An explicit path wins; otherwise `./demo.json` is used if present;
/// otherwise the documented defaults. Zero iteration counts are legal and
/// produce degenerate (but valid) runs.
pub fn load_config(explicit: Option<&Path>) -> Result<DemoConfig> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => resolve_config_path(),
    };

    match path {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading demo config {}", path.display()))?;
            let config: DemoConfig = serde_json::from_str(&raw)
                .with_context(|| format!("parsing demo config {}", path.display()))?;
            Ok(config)
        }
        None => Ok(DemoConfig::default()),
    }
}
