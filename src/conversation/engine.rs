//! Conversation state: slot reservation and in-place resolution.

use tracing::debug;

use crate::backend::types::AgentReply;
use crate::core::errors::{ConsoleError, ConsoleResult};
use crate::core::ids::{Generation, TurnId};

use super::turn::{ConversationTurn, TurnBody, TurnRole};

/// A claim on one pending agent turn.
///
/// Returned by [`Conversation::append_user_turn`] and threaded through the
/// asynchronous continuation; resolution addresses the turn by this token,
/// never by a recomputed position. The token is stamped with the
/// conversation generation at reservation time so a settlement that
/// outlives a [`Conversation::reset`] is rejected as stale.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use = "a reservation must be resolved exactly once"]
pub struct Reservation {
    turn: TurnId,
    generation: Generation,
}

impl Reservation {
    /// Identity of the reserved pending turn.
    #[must_use]
    pub const fn turn(&self) -> TurnId {
        self.turn
    }
}

/// Ordered, append-only sequence of conversation turns.
///
/// Mutated only by (1) appending a user turn together with its pending
/// agent turn and (2) replacing that agent turn's body in place once the
/// backend call settles. Turns are never removed or reordered; the state
/// is process-local and discarded by [`Conversation::reset`].
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
    generation: Generation,
}

impl Conversation {
    /// Create an empty conversation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn and reserve its pending agent turn.
    ///
    /// Input is trimmed; empty input is ignored and returns `None` (not an
    /// error). Otherwise both turns are appended in the same synchronous
    /// step and the reservation for the agent turn is returned.
    pub fn append_user_turn(&mut self, text: &str) -> Option<Reservation> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.turns.push(ConversationTurn::user(text));
        let pending = ConversationTurn::pending_agent();
        let reservation = Reservation {
            turn: pending.id,
            generation: self.generation,
        };
        self.turns.push(pending);
        Some(reservation)
    }

    /// Resolve a reservation with a successful reply.
    ///
    /// # Errors
    /// Returns a stale-class error if the reservation's generation is
    /// superseded, the turn no longer exists, or the turn was already
    /// resolved.
    pub fn resolve_reply(
        &mut self,
        reservation: Reservation,
        reply: AgentReply,
    ) -> ConsoleResult<()> {
        self.finish(reservation, ConversationTurn::resolved_body(reply))
    }

    /// Resolve a reservation with a locally recovered failure message.
    ///
    /// # Errors
    /// Same stale-class errors as [`Conversation::resolve_reply`].
    pub fn resolve_error(
        &mut self,
        reservation: Reservation,
        message: impl Into<String>,
    ) -> ConsoleResult<()> {
        self.finish(reservation, ConversationTurn::failed_body(message))
    }

    fn finish(&mut self, reservation: Reservation, body: TurnBody) -> ConsoleResult<()> {
        if reservation.generation != self.generation {
            return Err(ConsoleError::StaleGeneration {
                stamped: reservation.generation,
                current: self.generation,
            });
        }

        let turn = self
            .turns
            .iter_mut()
            .find(|turn| turn.id == reservation.turn)
            .ok_or(ConsoleError::UnknownTurn(reservation.turn))?;

        if !turn.body.is_pending() {
            return Err(ConsoleError::AlreadyResolved(reservation.turn));
        }

        turn.body = body;
        Ok(())
    }

    /// Discard all turns and invalidate outstanding reservations.
    ///
    /// Models the session reload: in-flight calls reserved against the old
    /// state settle as stale and are discarded.
    pub fn reset(&mut self) {
        debug!(
            "conversation reset, dropping {} turns",
            self.turns.len()
        );
        self.turns.clear();
        self.generation = self.generation.next();
    }

    /// The turns, in order.
    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Display position of a turn, if it is present.
    #[must_use]
    pub fn position_of(&self, id: TurnId) -> Option<usize> {
        self.turns.iter().position(|turn| turn.id == id)
    }

    /// Number of agent turns still awaiting resolution.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.turns
            .iter()
            .filter(|turn| turn.role == TurnRole::Agent && turn.body.is_pending())
            .count()
    }

    /// Current conversation generation.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }
}
