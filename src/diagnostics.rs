//! Severity-classified event log for one decode attempt.
//!
//! Every validation failure becomes a [`DiagnosticEvent`]; decoders never
//! return early on malformed content. A file is successful when it carries no
//! warning and no error, and its overall status is the highest severity seen.

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::sync::Arc;

use serde::Serialize;

use crate::messages::{self, EnglishCatalog, MessageCatalog};

// =============================================================================
// Severity
// =============================================================================

/// Severity of a diagnostic event, ordered `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Positive confirmation (e.g. baseline conformance)
    Info,
    /// Suspicious but non-fatal
    Warning,
    /// Violation that invalidates the file
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticEvent {
    pub severity: Severity,
    /// Stable key, independent of the rendered language
    pub key: &'static str,
    pub message: String,
}

// =============================================================================
// ResultStatus
// =============================================================================

/// Bucket a processed file falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Ok,
    Warn,
    Error,
    /// No decoder identified the file
    Unknown,
}

impl ResultStatus {
    /// Lowercase name used in golden files.
    pub const fn as_str(self) -> &'static str {
        match self {
            ResultStatus::Ok => "ok",
            ResultStatus::Warn => "warn",
            ResultStatus::Error => "error",
            ResultStatus::Unknown => "unknown",
        }
    }

    /// Parse the golden-file spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ok" => Some(ResultStatus::Ok),
            "warn" => Some(ResultStatus::Warn),
            "error" => Some(ResultStatus::Error),
            "unknown" => Some(ResultStatus::Unknown),
            _ => None,
        }
    }

    /// Message key of the status text shown in result lines.
    pub const fn message_key(self) -> Option<&'static str> {
        match self {
            ResultStatus::Ok => Some(messages::result::OK),
            ResultStatus::Warn => Some(messages::result::WARN),
            ResultStatus::Error => Some(messages::result::ERROR),
            ResultStatus::Unknown => None,
        }
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Ordered event list shared by every format's file description.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    events: Vec<DiagnosticEvent>,
    messages: Arc<dyn MessageCatalog>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Arc::new(EnglishCatalog::new()))
    }
}

impl Diagnostics {
    pub fn new(messages: Arc<dyn MessageCatalog>) -> Self {
        Self {
            events: Vec::new(),
            messages,
        }
    }

    /// Catalog used to render event text.
    pub fn messages(&self) -> &Arc<dyn MessageCatalog> {
        &self.messages
    }

    /// Append an event with an already rendered message.
    pub fn add_event(&mut self, severity: Severity, key: &'static str, message: String) {
        self.events.push(DiagnosticEvent {
            severity,
            key,
            message,
        });
    }

    /// Render `key` with `args` and append it.
    pub fn record(&mut self, severity: Severity, key: &'static str, args: &[&dyn Display]) {
        let message = self.messages.msg(key, args);
        self.add_event(severity, key, message);
    }

    pub fn error(&mut self, key: &'static str, args: &[&dyn Display]) {
        self.record(Severity::Error, key, args);
    }

    pub fn warning(&mut self, key: &'static str, args: &[&dyn Display]) {
        self.record(Severity::Warning, key, args);
    }

    pub fn info(&mut self, key: &'static str, args: &[&dyn Display]) {
        self.record(Severity::Info, key, args);
    }

    /// Copy all events of `other` after the existing ones.
    pub fn extend_from(&mut self, other: &Diagnostics) {
        self.events.extend(other.events.iter().cloned());
    }

    pub fn events(&self) -> &[DiagnosticEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn contains_event(&self, key: &str) -> bool {
        self.events.iter().any(|e| e.key == key)
    }

    pub fn has_warning_or_higher(&self) -> bool {
        self.events.iter().any(|e| e.severity >= Severity::Warning)
    }

    /// True iff no warning or error has been recorded.
    pub fn is_success(&self) -> bool {
        !self.has_warning_or_higher()
    }

    pub fn find_highest_severity(&self) -> Option<Severity> {
        self.events.iter().map(|e| e.severity).max()
    }

    /// Status bucket for an identified file.
    pub fn result_status(&self) -> ResultStatus {
        match self.find_highest_severity() {
            Some(Severity::Error) => ResultStatus::Error,
            Some(Severity::Warning) => ResultStatus::Warn,
            _ => ResultStatus::Ok,
        }
    }

    /// Sorted, deduplicated keys of all warning and error events.
    pub fn sorted_error_warning_keys(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .filter(|e| e.severity >= Severity::Warning)
            .map(|e| e.key)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Messages of warning and error events for a result line.
    ///
    /// A single message is returned as is; several are numbered
    /// `(1) first (2) second`.
    pub fn format_events(&self) -> String {
        let messages: Vec<&str> = self
            .events
            .iter()
            .filter(|e| e.severity >= Severity::Warning)
            .map(|e| e.message.as_str())
            .collect();
        match messages.as_slice() {
            [] => String::new(),
            [single] => (*single).to_string(),
            many => many
                .iter()
                .enumerate()
                .map(|(i, m)| format!("({}) {}", i + 1, m))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Drop all events, keeping the catalog.
    pub fn reset(&mut self) {
        self.events.clear();
    }
}
