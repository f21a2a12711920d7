//! Collage layout engine.
//!
//! # Responsibility
//! - Select a deterministic slot template from the photo count.
//! - Reduce drag gestures into frame-offset or pan-offset updates.
//! - Own the editing surface state (photos + active mode + in-flight drag).
//!
//! # Invariants
//! - Layout selection is a total, pure function of the photo count.
//! - Exactly one offset pair is written per committed gesture, chosen by
//!   the editor session mode.
//! - Only the `End` phase of a gesture commits state.
//! - No operation in this module performs I/O.

pub mod editor;
pub mod gesture;
pub mod template;
