//! Conversation turn model.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::types::AgentReply;
use crate::core::ids::TurnId;

/// Who produced a turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// Operator input.
    User,
    /// Agent response.
    Agent,
}

impl TurnRole {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "agent" => Ok(Self::Agent),
            _ => Err(value.to_string()),
        }
    }
}

/// Content of a turn.
///
/// An agent turn starts `Pending` and is replaced in place exactly once:
/// with `Text` when the backend call succeeds, with `Failure` when it does
/// not. User turns are `Text` from the start.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TurnBody {
    /// Placeholder awaiting the backend call for this turn.
    Pending,
    /// Final content.
    Text(String),
    /// Final content describing a locally recovered failure.
    Failure(String),
}

impl TurnBody {
    /// Whether this body is still awaiting resolution.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The resolved text, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Pending => None,
            Self::Text(text) | Self::Failure(text) => Some(text),
        }
    }
}

/// A single conversation turn.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Stable identity, minted at append time.
    pub id: TurnId,
    /// Who produced the turn.
    pub role: TurnRole,
    /// Turn content.
    pub body: TurnBody,
    /// Timestamp for ordering and display.
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    /// Build a user turn with final text.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            role: TurnRole::User,
            body: TurnBody::Text(text.into()),
            created_at: Utc::now(),
        }
    }

    /// Build the provisional agent turn reserved for a backend call.
    #[must_use]
    pub fn pending_agent() -> Self {
        Self {
            id: TurnId::new(),
            role: TurnRole::Agent,
            body: TurnBody::Pending,
            created_at: Utc::now(),
        }
    }

    /// Final body for a successful reply.
    #[must_use]
    pub fn resolved_body(reply: AgentReply) -> TurnBody {
        TurnBody::Text(reply.into_text())
    }

    /// Final body for a locally recovered failure.
    #[must_use]
    pub fn failed_body(message: impl Into<String>) -> TurnBody {
        TurnBody::Failure(format!("Request failed: {}", message.into()))
    }
}
