use serde::Serialize;
use std::fmt;

use super::ProvisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Remove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Remove => "remove",
        })
    }
}

/// Log severities understood by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Failure,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Counts {
    pub created: u32,
    pub updated: u32,
    pub removed: u32,
    pub skipped: u32,
}

/// Outcome of one provisioning run. Every entry is also emitted through tracing.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub operation: Operation,
    pub dry_run: bool,
    pub entries: Vec<LogEntry>,
    pub counts: Counts,
}

impl Report {
    pub fn new(operation: Operation, dry_run: bool) -> Self {
        Self {
            operation,
            dry_run,
            entries: Vec::new(),
            counts: Counts::default(),
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(operation = %self.operation, "{}", message);
        self.push(LogLevel::Info, message);
    }

    pub fn failure(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(operation = %self.operation, "{}", message);
        self.push(LogLevel::Failure, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        let mut message = message.into();
        if self.dry_run {
            message.push_str(" (dry run)");
        }
        tracing::info!(operation = %self.operation, "{}", message);
        self.push(LogLevel::Success, message);
    }

    fn push(&mut self, level: LogLevel, message: String) {
        self.entries.push(LogEntry { level, message });
    }

    /// Entries of one severity, in order
    pub fn messages(&self, level: LogLevel) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// The final summary entry, if the run got that far
    pub fn summary(&self) -> Option<&LogEntry> {
        self.entries.last().filter(|e| e.level == LogLevel::Success)
    }

    /// Close the report on a fatal error
    pub(super) fn abort(mut self, error: ProvisionError) -> RunError {
        self.failure(format!("{} aborted: {}", self.operation, error));
        RunError { report: self, error }
    }
}

/// A run that stopped early. The report holds everything applied before the error.
#[derive(Debug, thiserror::Error)]
#[error("{} failed: {}", .report.operation, .error)]
pub struct RunError {
    pub report: Report,
    #[source]
    pub error: ProvisionError,
}
