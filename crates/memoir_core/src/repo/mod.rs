//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the entry store contract consumed by services.
//! - Isolate SQLite query details from journal orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Entry::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod entry_repo;
