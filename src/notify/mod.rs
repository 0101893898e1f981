//! User-facing notices and the destructive-operation confirmation seam.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Severity of a notice.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSeverity {
    /// An operation completed.
    Success,
    /// An operation failed and state was left as it was.
    Error,
}

/// A user-visible notice surfaced by the contact sync flows.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity of the notice.
    pub severity: NoticeSeverity,
    /// Human-readable text.
    pub text: String,
    /// When the notice was published.
    pub at: DateTime<Utc>,
}

impl Notice {
    /// Build a success notice.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Success,
            text: text.into(),
            at: Utc::now(),
        }
    }

    /// Build an error notice.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Where notices go; the presentation layer decides how they look.
pub trait NoticeSink: Send + Sync {
    /// Publish one notice.
    fn publish(&self, notice: Notice);
}

/// Notice sink that forwards to the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingNoticeSink;

impl NoticeSink for TracingNoticeSink {
    fn publish(&self, notice: Notice) {
        match notice.severity {
            NoticeSeverity::Success => info!("{}", notice.text),
            NoticeSeverity::Error => error!("{}", notice.text),
        }
    }
}

/// Notice sink that buffers notices for an embedding UI (or a test) to
/// drain.
#[derive(Debug, Default)]
pub struct MemoryNoticeSink {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNoticeSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered notices, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(mut notices) => notices.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl NoticeSink for MemoryNoticeSink {
    fn publish(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

/// Blocking confirmation barrier for destructive operations.
///
/// The sync engine asks before issuing a delete; a declined confirmation
/// is a normal no-op, not an error.
pub trait ConfirmPrompt: Send + Sync {
    /// Ask the operator to confirm `message`. `true` proceeds.
    fn confirm(&self, message: &str) -> bool;
}

/// Confirmation prompt that approves everything, for headless embedding.
#[derive(Debug, Default)]
pub struct AutoConfirm;

impl ConfirmPrompt for AutoConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}
