//! Agent backend access: wire types, trait seams, HTTP implementation.

pub mod client;
pub mod types;

pub use client::{AgentBackend, BackendFuture, ContactsBackend, HttpBackend};
pub use types::{AgentReply, RunOutput, RunRequest, RunResponse};
