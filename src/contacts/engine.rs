//! Contact roster state: server mirror, edit buffer, generation tracking.

use tracing::debug;

use crate::core::errors::{ConsoleError, ConsoleResult};
use crate::core::ids::{Generation, RecordId};

use super::record::{ContactField, ContactRecord, EditRow};

/// The roster as last fetched from the server, plus the operator's working
/// copy.
///
/// The working copy (edit buffer) is reseeded from the roster on every
/// successful [`ContactDirectory::install`] — unsaved edits are discarded,
/// never merged. The buffer is the sole source of truth at submission
/// time: submission is whole-list replacement, not a per-record diff.
#[derive(Debug, Default)]
pub struct ContactDirectory {
    roster: Vec<ContactRecord>,
    rows: Vec<EditRow>,
    generation: Generation,
}

impl ContactDirectory {
    /// Create an empty directory awaiting its first load.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly fetched roster, reseeding the edit buffer and
    /// superseding every in-flight mutation stamped with the previous
    /// generation.
    pub fn install(&mut self, contacts: Vec<ContactRecord>) {
        debug!(
            "installing roster of {} records over {} edited rows",
            contacts.len(),
            self.rows.len()
        );
        self.rows = contacts.iter().cloned().map(EditRow::seeded).collect();
        self.roster = contacts;
        self.generation = self.generation.next();
    }

    /// Edit one field of one buffer row, addressed by row identity.
    ///
    /// # Errors
    /// Returns [`ConsoleError::UnknownRow`] if the row no longer exists.
    pub fn edit_field(
        &mut self,
        id: RecordId,
        field: ContactField,
        value: impl Into<String>,
    ) -> ConsoleResult<()> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(ConsoleError::UnknownRow(id))?;
        field.apply(&mut row.record, value.into());
        Ok(())
    }

    /// Edit by display position; convenience for index-addressed callers.
    ///
    /// # Errors
    /// Returns [`ConsoleError::UnknownRowIndex`] when the index is out of
    /// bounds.
    pub fn edit_at(
        &mut self,
        index: usize,
        field: ContactField,
        value: impl Into<String>,
    ) -> ConsoleResult<()> {
        match self.row_id_at(index) {
            Some(id) => self.edit_field(id, field, value),
            None => Err(ConsoleError::UnknownRowIndex(index)),
        }
    }

    /// Append an all-empty row to the edit buffer.
    ///
    /// The row is indistinguishable from a real one at submission time;
    /// accepting or rejecting it is the server's call.
    pub fn append_blank_row(&mut self) -> RecordId {
        let row = EditRow::blank();
        let id = row.id;
        self.rows.push(row);
        id
    }

    /// Identity of the row displayed at `index`.
    #[must_use]
    pub fn row_id_at(&self, index: usize) -> Option<RecordId> {
        self.rows.get(index).map(|row| row.id)
    }

    /// The working copy as it would be submitted, in order.
    #[must_use]
    pub fn payload(&self) -> Vec<ContactRecord> {
        self.rows.iter().map(|row| row.record.clone()).collect()
    }

    /// The last-known server copy, in server order.
    #[must_use]
    pub fn roster(&self) -> &[ContactRecord] {
        &self.roster
    }

    /// The edit-buffer rows, in display order.
    #[must_use]
    pub fn rows(&self) -> &[EditRow] {
        &self.rows
    }

    /// Whether the working copy differs from the server copy.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.rows.len() != self.roster.len()
            || self
                .rows
                .iter()
                .zip(self.roster.iter())
                .any(|(row, record)| row.record != *record)
    }

    /// Current roster generation.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether a settlement stamped with `stamped` still targets current
    /// state.
    #[must_use]
    pub fn is_current(&self, stamped: Generation) -> bool {
        stamped == self.generation
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn roster() -> Vec<ContactRecord> {
        vec![
            ContactRecord {
                name: "Alice".to_string(),
                description: "ops".to_string(),
                email: "alice@example.com".to_string(),
            },
            ContactRecord {
                name: "Bob".to_string(),
                description: "qa".to_string(),
                email: "bob@example.com".to_string(),
            },
        ]
    }

    #[test]
    fn test_install_seeds_buffer_from_roster() {
        let mut directory = ContactDirectory::new();
        directory.install(roster());

        assert_eq!(directory.roster(), roster().as_slice());
        assert_eq!(directory.payload(), roster());
        assert!(!directory.is_dirty());
    }

    #[test]
    fn test_install_is_idempotent_for_content() {
        let mut directory = ContactDirectory::new();
        directory.install(roster());
        let first = directory.payload();
        directory.install(roster());

        assert_eq!(directory.payload(), first);
        assert_eq!(directory.payload(), directory.roster());
    }

    #[test]
    fn test_install_discards_unsaved_edits() {
        let mut directory = ContactDirectory::new();
        directory.install(roster());
        directory
            .edit_at(0, ContactField::Name, "Alicia")
            .unwrap();
        assert!(directory.is_dirty());

        directory.install(roster());
        assert!(!directory.is_dirty());
        assert_eq!(directory.rows()[0].record.name, "Alice");
    }

    #[test]
    fn test_install_bumps_generation() {
        let mut directory = ContactDirectory::new();
        let before = directory.generation();
        directory.install(roster());

        assert!(directory.generation() > before);
        assert!(!directory.is_current(before));
        assert!(directory.is_current(directory.generation()));
    }

    #[test]
    fn test_edit_by_identity_survives_appends() {
        let mut directory = ContactDirectory::new();
        directory.install(roster());
        let bob = directory.row_id_at(1).unwrap();

        directory.append_blank_row();
        directory
            .edit_field(bob, ContactField::Email, "bob@corp.example")
            .unwrap();

        assert_eq!(directory.rows()[1].record.email, "bob@corp.example");
        assert_eq!(directory.rows()[2].record, ContactRecord::blank());
    }

    #[test]
    fn test_edit_unknown_row_is_an_error() {
        let mut directory = ContactDirectory::new();
        directory.install(roster());

        let err = directory
            .edit_field(RecordId::new(), ContactField::Name, "x")
            .unwrap_err();
        assert!(matches!(err, ConsoleError::UnknownRow(_)));
        let err = directory
            .edit_at(9, ContactField::Name, "x")
            .unwrap_err();
        assert!(matches!(err, ConsoleError::UnknownRowIndex(9)));
    }

    #[test]
    fn test_blank_row_enters_payload_verbatim() {
        let mut directory = ContactDirectory::new();
        directory.install(roster());
        directory.append_blank_row();

        let payload = directory.payload();
        assert_eq!(payload.len(), 3);
        assert!(payload[2].is_blank());
        assert!(directory.is_dirty());
    }
}
