//! Contact roster orchestration: load, edit, delete, submit.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::backend::client::ContactsBackend;
use crate::core::errors::ConsoleResult;
use crate::core::ids::RecordId;
use crate::notify::{ConfirmPrompt, Notice, NoticeSink};

use super::engine::ContactDirectory;
use super::record::{ContactField, EditRow};

/// What happened to a submit settlement.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyncOutcome {
    /// The server accepted the replacement; ground truth was re-fetched.
    Applied,
    /// The server rejected the replacement; the edit buffer is untouched.
    Rejected,
    /// The roster moved while the call was in flight; the settlement was
    /// discarded.
    Stale,
}

/// What happened to a delete request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeleteOutcome {
    /// The server deleted the record; ground truth was re-fetched.
    Deleted,
    /// The server refused; local state is untouched.
    Rejected,
    /// The operator declined the confirmation; no call was made.
    Declined,
    /// The roster moved while the call was in flight; the settlement was
    /// discarded.
    Stale,
}

/// Drives a [`ContactDirectory`] against a [`ContactsBackend`].
///
/// Destructive operations pass the [`ConfirmPrompt`] barrier first;
/// outcomes the operator must see go through the [`NoticeSink`]. Locks are
/// never held across an await.
#[derive(Clone)]
pub struct ContactService {
    directory: Arc<RwLock<ContactDirectory>>,
    backend: Arc<dyn ContactsBackend>,
    notices: Arc<dyn NoticeSink>,
    prompt: Arc<dyn ConfirmPrompt>,
}

impl ContactService {
    /// Create a service over an empty directory.
    #[must_use]
    pub fn new(
        backend: Arc<dyn ContactsBackend>,
        notices: Arc<dyn NoticeSink>,
        prompt: Arc<dyn ConfirmPrompt>,
    ) -> Self {
        Self {
            directory: Arc::new(RwLock::new(ContactDirectory::new())),
            backend,
            notices,
            prompt,
        }
    }

    /// Fetch the roster and reseed the edit buffer from it, discarding any
    /// unsaved edits.
    ///
    /// # Errors
    /// Returns the transport error after surfacing a failure notice; local
    /// state is left unchanged.
    pub async fn load(&self) -> ConsoleResult<()> {
        match self.backend.list_contacts().await {
            Ok(contacts) => {
                self.directory.write().await.install(contacts);
                Ok(())
            }
            Err(err) => {
                self.notices
                    .publish(Notice::error(format!("Failed to load contacts: {err}")));
                Err(err)
            }
        }
    }

    /// Submit the entire edit buffer as a wholesale roster replacement.
    ///
    /// On acceptance, surfaces a success notice and re-loads ground truth.
    /// On rejection, surfaces a failure notice and leaves the buffer
    /// exactly as the operator left it. A settlement stamped with a
    /// superseded roster generation is discarded.
    ///
    /// # Errors
    /// Only non-transport errors propagate; transport failures are
    /// recovered locally as `Rejected`.
    pub async fn submit(&self) -> ConsoleResult<SyncOutcome> {
        let (payload, stamped) = {
            let directory = self.directory.read().await;
            (directory.payload(), directory.generation())
        };

        let settled = self.backend.replace_contacts(payload).await;

        {
            let directory = self.directory.read().await;
            if !directory.is_current(stamped) {
                debug!(
                    "discarding submit settlement stamped {stamped}, roster is at {}",
                    directory.generation()
                );
                return Ok(SyncOutcome::Stale);
            }
        }

        match settled {
            Ok(()) => {
                self.notices.publish(Notice::success("Contacts updated"));
                let _ = self.load().await;
                Ok(SyncOutcome::Applied)
            }
            Err(err) if err.is_transport() => {
                self.notices
                    .publish(Notice::error(format!("Failed to update contacts: {err}")));
                Ok(SyncOutcome::Rejected)
            }
            Err(err) => Err(err),
        }
    }

    /// Delete one record by name, behind the confirmation barrier.
    ///
    /// Declined confirmation issues no network call. On server success,
    /// surfaces a success notice and re-loads ground truth (the delete is
    /// never applied optimistically); on refusal, surfaces a failure
    /// notice and leaves local state untouched. Stale settlements are
    /// discarded.
    ///
    /// # Errors
    /// Only non-transport errors propagate; transport failures are
    /// recovered locally as `Rejected`.
    pub async fn request_delete(&self, name: &str) -> ConsoleResult<DeleteOutcome> {
        if !self.prompt.confirm(&format!("Delete contact \"{name}\"?")) {
            debug!("delete of \"{name}\" declined");
            return Ok(DeleteOutcome::Declined);
        }

        let stamped = self.directory.read().await.generation();
        let settled = self.backend.delete_contact(name).await;

        {
            let directory = self.directory.read().await;
            if !directory.is_current(stamped) {
                debug!(
                    "discarding delete settlement stamped {stamped}, roster is at {}",
                    directory.generation()
                );
                return Ok(DeleteOutcome::Stale);
            }
        }

        match settled {
            Ok(()) => {
                self.notices
                    .publish(Notice::success(format!("Deleted contact {name}")));
                let _ = self.load().await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) if err.is_transport() => {
                self.notices
                    .publish(Notice::error(format!("Failed to delete {name}: {err}")));
                Ok(DeleteOutcome::Rejected)
            }
            Err(err) => Err(err),
        }
    }

    /// Edit one field of the row displayed at `index`.
    ///
    /// # Errors
    /// Returns an error when the index addresses no row.
    pub async fn edit_at(
        &self,
        index: usize,
        field: ContactField,
        value: impl Into<String>,
    ) -> ConsoleResult<()> {
        self.directory.write().await.edit_at(index, field, value)
    }

    /// Append an all-empty row to the edit buffer.
    pub async fn append_blank_row(&self) -> RecordId {
        self.directory.write().await.append_blank_row()
    }

    /// Snapshot of the edit-buffer rows for display.
    pub async fn rows_snapshot(&self) -> Vec<EditRow> {
        self.directory.read().await.rows().to_vec()
    }

    /// Shared handle to the directory state.
    #[must_use]
    pub fn state(&self) -> Arc<RwLock<ContactDirectory>> {
        Arc::clone(&self.directory)
    }
}
