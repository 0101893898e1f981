//! Wire types for the agent backend API.

use serde::{Deserialize, Serialize};

use crate::contacts::record::ContactRecord;

/// Run-turn request body.
#[derive(Debug, Serialize)]
pub struct RunRequest<'a> {
    /// The operator's message for this turn.
    pub user_query: &'a str,
}

/// Run-turn response envelope.
#[derive(Debug, Deserialize)]
pub struct RunResponse {
    /// The agent's structured output.
    pub output: RunOutput,
}

/// Structured output of one agent run.
///
/// Both fields are optional on the wire; absent fields decode to their
/// defaults instead of failing the whole turn.
#[derive(Debug, Default, Deserialize)]
pub struct RunOutput {
    /// Primary answer text.
    #[serde(default)]
    pub extracted_content: String,
    /// Optional URL of a file produced during the run.
    #[serde(default)]
    pub download_file_url: Option<String>,
}

/// The agent's reply to one conversation turn, decoded from [`RunOutput`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentReply {
    /// Primary answer text.
    pub message: String,
    /// Optional URL of a produced file to reference after the message.
    pub attachment: Option<String>,
}

impl AgentReply {
    /// Build a reply with no attachment.
    #[must_use]
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attachment: None,
        }
    }

    /// Final turn text: the message, plus a markdown reference link when an
    /// attachment is present.
    #[must_use]
    pub fn into_text(self) -> String {
        match self.attachment {
            Some(url) => format!("{}\n\n[Open attachment]({url})", self.message),
            None => self.message,
        }
    }
}

impl From<RunOutput> for AgentReply {
    fn from(output: RunOutput) -> Self {
        Self {
            message: output.extracted_content,
            attachment: output.download_file_url,
        }
    }
}

/// Replace-contacts request body.
#[derive(Debug, Serialize)]
pub struct ContactsUpdateRequest<'a> {
    /// The full working copy; the server replaces its roster with it.
    pub contacts: &'a [ContactRecord],
}

/// Status-only reply used by the roster mutation endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct StatusReply {
    /// Machine status, e.g. `"success"`.
    #[serde(default)]
    pub status: String,
    /// Optional human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}
