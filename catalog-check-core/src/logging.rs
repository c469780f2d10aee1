use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEvent {
    pub ts: DateTime<Utc>,
    pub level: LogLevel,
    pub run_id: Option<String>,
    pub rule: Option<String>,
    pub message: String,
    pub fields: BTreeMap<String, String>,
}

pub trait EventLogger: Send + Sync {
    fn log(&self, event: LogEvent);
}

#[derive(Default)]
pub struct NoopEventLogger;

impl EventLogger for NoopEventLogger {
    fn log(&self, _event: LogEvent) {}
}

pub type SharedEventLogger = Arc<dyn EventLogger>;

/// Writes one line per event to stderr, dropping events below `min_level`.
pub struct StderrEventLogger {
    min_level: LogLevel,
}

impl StderrEventLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn format(event: &LogEvent) -> String {
        let mut line = format!(
            "{} {:<5} {}",
            event.ts.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            event.level.as_str(),
            event.message
        );
        if let Some(rule) = &event.rule {
            line.push_str(&format!(" rule={rule}"));
        }
        for (k, v) in &event.fields {
            line.push_str(&format!(" {k}={v}"));
        }
        line
    }
}

impl EventLogger for StderrEventLogger {
    fn log(&self, event: LogEvent) {
        if event.level < self.min_level {
            return;
        }
        eprintln!("{}", Self::format(&event));
    }
}

/// Keeps the most recent events in memory and optionally appends every event
/// to a JSONL file.
pub struct BufferedEventLogger {
    seq: AtomicU64,
    max_events: usize,
    events_file: Option<PathBuf>,
    events: Mutex<VecDeque<(u64, LogEvent)>>,
}

impl BufferedEventLogger {
    pub fn new(max_events: usize) -> Self {
        Self {
            seq: AtomicU64::new(0),
            max_events: max_events.max(1),
            events_file: None,
            events: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_events_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.events_file = Some(path.into());
        self
    }

    pub fn events_since(&self, last_seq: u64) -> (u64, Vec<LogEvent>) {
        let Ok(events) = self.events.lock() else {
            return (last_seq, Vec::new());
        };
        let mut out = Vec::new();
        let mut new_last = last_seq;
        for (seq, ev) in events.iter() {
            if *seq > last_seq {
                out.push(ev.clone());
                new_last = new_last.max(*seq);
            }
        }
        (new_last, out)
    }

    pub fn messages(&self) -> Vec<String> {
        self.events_since(0)
            .1
            .into_iter()
            .map(|ev| ev.message)
            .collect()
    }

    fn write_to_file(&self, event: &LogEvent) {
        let Some(path) = &self.events_file else {
            return;
        };
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        let Ok(line) = serde_json::to_string(event) else {
            return;
        };
        let Ok(mut f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
        else {
            return;
        };
        let _ = f.write_all(format!("{line}\n").as_bytes());
    }
}

impl EventLogger for BufferedEventLogger {
    fn log(&self, event: LogEvent) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;

        self.write_to_file(&event);

        let Ok(mut events) = self.events.lock() else {
            return;
        };
        events.push_back((seq, event));
        while events.len() > self.max_events {
            events.pop_front();
        }
    }
}

/// Forwards every event to each inner logger.
pub struct FanoutEventLogger {
    loggers: Vec<SharedEventLogger>,
}

impl FanoutEventLogger {
    pub fn new(loggers: Vec<SharedEventLogger>) -> Self {
        Self { loggers }
    }
}

impl EventLogger for FanoutEventLogger {
    fn log(&self, event: LogEvent) {
        for logger in &self.loggers {
            logger.log(event.clone());
        }
    }
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            level,
            run_id: None,
            rule: None,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_run(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_field(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.fields.insert(k.into(), v.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_drops_oldest_events() {
        let logger = BufferedEventLogger::new(2);
        logger.log(LogEvent::new(LogLevel::Info, "a"));
        logger.log(LogEvent::new(LogLevel::Info, "b"));
        logger.log(LogEvent::new(LogLevel::Info, "c"));
        assert_eq!(logger.messages(), vec!["b", "c"]);

        let (last, events) = logger.events_since(2);
        assert_eq!(last, 3);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn stderr_format_includes_rule_and_fields() {
        let ev = LogEvent::new(LogLevel::Warn, "rule.failed")
            .with_rule("price")
            .with_field("violations", "2");
        let line = StderrEventLogger::format(&ev);
        assert!(line.contains("WARN  rule.failed rule=price violations=2"));
    }
}
