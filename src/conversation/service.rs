//! Conversation orchestration: reserve, dispatch, resolve.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::backend::client::AgentBackend;
use crate::core::ids::TurnId;

use super::engine::Conversation;
use super::turn::ConversationTurn;

/// Drives a [`Conversation`] against an [`AgentBackend`].
///
/// State lives behind an `RwLock` so the presentation layer can read
/// snapshots while a call is in flight; the lock is never held across an
/// await.
#[derive(Clone)]
pub struct ConversationService {
    conversation: Arc<RwLock<Conversation>>,
    backend: Arc<dyn AgentBackend>,
}

impl ConversationService {
    /// Create a service over an empty conversation.
    #[must_use]
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self {
            conversation: Arc::new(RwLock::new(Conversation::new())),
            backend,
        }
    }

    /// Send one operator message.
    ///
    /// Appends the user turn, reserves the pending agent turn, performs
    /// exactly one backend call and resolves the reserved slot with either
    /// the reply content or a failure message. Returns the resolved turn's
    /// identity, or `None` when the input was empty and ignored.
    ///
    /// A settlement that arrives after the conversation was reset is
    /// discarded.
    pub async fn send(&self, text: &str) -> Option<TurnId> {
        let reservation = {
            let mut conversation = self.conversation.write().await;
            conversation.append_user_turn(text)?
        };

        let outcome = self.backend.run_turn(text.trim()).await;

        let mut conversation = self.conversation.write().await;
        let resolution = match outcome {
            Ok(reply) => conversation.resolve_reply(reservation, reply),
            Err(err) => conversation.resolve_error(reservation, err.to_string()),
        };

        match resolution {
            Ok(()) => Some(reservation.turn()),
            Err(err) => {
                debug!("discarding settlement for superseded turn: {err}");
                None
            }
        }
    }

    /// Snapshot of the turns for display.
    pub async fn snapshot(&self) -> Vec<ConversationTurn> {
        self.conversation.read().await.turns().to_vec()
    }

    /// Discard the conversation, invalidating in-flight settlements.
    pub async fn reset(&self) {
        self.conversation.write().await.reset();
    }

    /// Shared handle to the conversation state.
    #[must_use]
    pub fn state(&self) -> Arc<RwLock<Conversation>> {
        Arc::clone(&self.conversation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::backend::client::BackendFuture;
    use crate::backend::types::AgentReply;
    use crate::core::errors::{ConsoleError, ConsoleResult};
    use crate::conversation::turn::{TurnBody, TurnRole};

    /// Fake agent that understands three query shapes:
    /// `"fail"` errors, `"<ms>:<reply>"` sleeps then answers, anything else
    /// echoes with a `re: ` prefix. A query ending in `+file` attaches a
    /// download URL.
    struct FakeAgent;

    impl AgentBackend for FakeAgent {
        fn run_turn(&self, user_query: &str) -> BackendFuture<'_, ConsoleResult<AgentReply>> {
            let query = user_query.to_string();
            Box::pin(async move {
                if query == "fail" {
                    return Err(ConsoleError::BackendStatus {
                        status: 500,
                        message: "agent crashed".to_string(),
                    });
                }
                let (delay_ms, text) = match query.split_once(':') {
                    Some((ms, rest)) => (ms.parse().unwrap_or(0), rest.to_string()),
                    None => (0, format!("re: {query}")),
                };
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                match text.strip_suffix("+file") {
                    Some(body) => Ok(AgentReply {
                        message: body.to_string(),
                        attachment: Some("http://x/f.pdf".to_string()),
                    }),
                    None => Ok(AgentReply::text(text)),
                }
            })
        }
    }

    fn service() -> ConversationService {
        ConversationService::new(Arc::new(FakeAgent))
    }

    #[tokio::test]
    async fn test_send_resolves_reserved_slot() {
        let service = service();
        let turn_id = service.send("hello").await.unwrap();

        let turns = service.snapshot().await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].body.as_text(), Some("hello"));
        assert_eq!(turns[1].id, turn_id);
        assert_eq!(turns[1].role, TurnRole::Agent);
        assert_eq!(turns[1].body.as_text(), Some("re: hello"));
    }

    #[tokio::test]
    async fn test_reply_with_attachment_appends_link() {
        let service = service();
        service.send("0:hi!+file").await.unwrap();

        let turns = service.snapshot().await;
        assert_eq!(
            turns[1].body.as_text(),
            Some("hi!\n\n[Open attachment](http://x/f.pdf)")
        );
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_turn_content() {
        let service = service();
        service.send("fail").await.unwrap();

        let turns = service.snapshot().await;
        assert_eq!(
            turns[1].body,
            TurnBody::Failure(
                "Request failed: backend returned status 500: agent crashed".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_empty_input_sends_nothing() {
        let service = service();
        assert!(service.send("   ").await.is_none());
        assert!(service.snapshot().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interleaved_sends_resolve_their_own_slots() {
        let service = service();

        // The first send answers slower than the second.
        let (slow, fast) = tokio::join!(service.send("30:slow reply"), service.send("10:fast reply"));
        slow.unwrap();
        fast.unwrap();

        let texts: Vec<_> = service
            .snapshot()
            .await
            .iter()
            .map(|turn| turn.body.as_text().unwrap().to_string())
            .collect();
        assert_eq!(
            texts,
            vec!["30:slow reply", "slow reply", "10:fast reply", "fast reply"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_settlement_after_reset_is_discarded() {
        let service = service();

        let send = service.send("20:late reply");
        let reset = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            service.reset().await;
        };
        let (resolved, ()) = tokio::join!(send, reset);

        assert!(resolved.is_none());
        assert!(service.snapshot().await.is_empty());
    }
}
