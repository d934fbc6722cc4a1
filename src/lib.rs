// Core modules
mod config;
mod driver;
mod logging;

mod integration_tests;

// Re-export key types and functions
pub use config::{DemoConfig, load_config, resolve_config_path};
pub use driver::{DemoDriver, DemoReport};
pub use logging::{LogSink, Logger, MemorySink, NullSink, StdoutSink, current_thread_label};

/// Convenience function to create a driver wired to stdout logging.
pub fn create_driver(config: DemoConfig) -> DemoDriver {
    DemoDriver::new(config, Logger::stdout())
}
