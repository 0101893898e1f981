//! Conversation subsystem: turn model, engine, dispatch service.

pub mod engine;
pub mod service;
pub mod turn;

pub use engine::{Conversation, Reservation};
pub use service::ConversationService;
pub use turn::{ConversationTurn, TurnBody, TurnRole};
