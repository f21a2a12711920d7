//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, object store and session calls into
//!   use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod entry_form;
pub mod journal_service;

pub use entry_form::EntryForm;
pub use journal_service::{JournalResult, JournalService, JournalServiceError};
