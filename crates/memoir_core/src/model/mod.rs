//! Journal domain model.
//!
//! # Responsibility
//! - Define the canonical records owned by one calendar day: entry, photos,
//!   voice note, mood and song reference.
//! - Centralize default/clamp normalization so downstream logic can assume
//!   fully-populated fields.
//!
//! # Invariants
//! - One entry per `(user_id, date)`; the date is the natural key.
//! - An entry owns at most `MAX_PHOTOS_PER_ENTRY` photos.
//! - Photo pan offsets are always within `[0, 100]`.

pub mod entry;
pub mod mood;
pub mod photo;
pub mod song;
