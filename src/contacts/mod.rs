//! Contact roster subsystem: record model, directory state, sync service.

pub mod engine;
pub mod record;
pub mod service;

pub use engine::ContactDirectory;
pub use record::{ContactField, ContactRecord, EditRow};
pub use service::{ContactService, DeleteOutcome, SyncOutcome};
