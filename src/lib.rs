//! Core state-reconciliation engines for an agent operator console.
//!
//! Two subsystems share one pattern (reserve a slot, fill the slot later):
//! a conversation engine that appends a provisional agent turn and resolves
//! it in place once the backend call settles, and a contact-roster engine
//! that keeps a locally edited working copy consistent with the
//! server-of-record across edits, blank-row appends, confirmed deletes and
//! wholesale replacement. Rendering, routing and styling live outside this
//! crate; the binary in `src/bin/console.rs` is only an exercise harness.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(non_camel_case_types)]
#![deny(unused_must_use)]
#![deny(non_snake_case)]
#![deny(non_upper_case_globals)]
#![deny(nonstandard_style)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

/// Wire types and the HTTP backend behind trait seams.
pub mod backend;
/// Contact roster synchronization (roster, edit buffer, sync service).
pub mod contacts;
/// Conversation turns, slot reservation and resolution.
pub mod conversation;
/// Identifiers, errors and configuration shared across the crate.
pub mod core;
/// Notices and the destructive-operation confirmation seam.
pub mod notify;
/// Entry helpers for the `calliope` binary.
#[allow(clippy::print_stdout)]
pub mod start_console;
