//! Log sinks and the timestamped demo logger.
//!
//! Every observable line the demos emit goes through a [`Logger`], which
//! prefixes a local-time timestamp and hands the finished line to a
//! [`LogSink`]. Sinks must tolerate concurrent callers; each call delivers
//! a single atomic line.

use std::sync::{Arc, Mutex};

/// A destination for finished log lines.
///
/// Implementations must be safe to call from multiple threads at once and
/// must never split a line across interleaved writes.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes each line to stdout. `println!` serializes on the stdout lock,
/// so concurrent lines never interleave mid-line.
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// Discards every line. Used where only completion matters.
pub struct NullSink;

impl LogSink for NullSink {
    fn write_line(&self, _line: &str) {}
}

/// Collects lines in memory, in emission order.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// Cheap-clone handle over a shared sink.
///
/// Prefixes each message with a local-time `HH:MM:SS.mmm` timestamp before
/// forwarding it as one line.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutSink))
    }

    pub fn null() -> Self {
        Self::new(Arc::new(NullSink))
    }

    /// Format and emit a single line.
    pub fn log(&self, message: &str) {
        let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
        self.sink.write_line(&format!("{} {}", stamp, message));
    }
}

/// Label for the executing thread, for inclusion in demo messages.
///
/// Named threads (tokio and rayon workers) report their name; anonymous
/// threads fall back to the numeric id.
pub fn current_thread_label() -> String {
    let current = std::thread::current();
    match current.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", current.id()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_prefixes_timestamp() {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::new(sink.clone());

        logger.log("hello");

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);

        // "HH:MM:SS.mmm hello"
        let (stamp, rest) = lines[0].split_once(' ').expect("line has a prefix");
        assert_eq!(rest, "hello");
        assert_eq!(stamp.len(), 12);
        assert_eq!(stamp.matches(':').count(), 2);
        assert_eq!(stamp.matches('.').count(), 1);
    }

    #[test]
    fn test_memory_sink_preserves_emission_order() {
        let sink = MemorySink::new();
        sink.write_line("first");
        sink.write_line("second");
        sink.write_line("third");
        assert_eq!(sink.lines(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_memory_sink_tolerates_concurrent_writers() {
        let sink = Arc::new(MemorySink::new());

        std::thread::scope(|s| {
            for t in 0..4 {
                let sink = sink.clone();
                s.spawn(move || {
                    for i in 0..25 {
                        sink.write_line(&format!("writer {} line {}", t, i));
                    }
                });
            }
        });

        // No lines lost, no lines corrupted.
        let lines = sink.lines();
        assert_eq!(lines.len(), 100);
        assert!(lines.iter().all(|l| l.starts_with("writer ")));
    }

    #[test]
    fn test_null_sink_discards() {
        let logger = Logger::null();
        logger.log("dropped");
    }

    #[test]
    fn test_thread_label_is_nonempty() {
        assert!(!current_thread_label().is_empty());
    }
}
