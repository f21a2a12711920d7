//! Drag gesture reduction.
//!
//! # Responsibility
//! - Model the editing surface mode as an explicit session value.
//! - Turn a `(dx, dy)` displacement accumulated since gesture start into
//!   the next photo state.
//!
//! # Invariants
//! - `Move` writes only the frame offset, additively and unclamped.
//! - `Crop` writes only the pan offset, inverted and scaled by
//!   `PAN_SENSITIVITY`, then clamped to `[0, 100]`.
//! - `Begin`/`Update` phases never change stored state.

use crate::model::photo::{FrameOffset, PanOffset, Photo};

/// Pan percent per layout unit of drag.
pub const PAN_SENSITIVITY: f64 = 0.5;

/// Which offset future gestures write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    /// Drag moves the polaroid frame.
    #[default]
    Move,
    /// Drag pans the image under a pinned frame.
    Crop,
}

/// Editor-wide interaction context passed to every photo handler.
///
/// One mode applies to the whole editing surface, not per photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditorSession {
    mode: DragMode,
}

impl EditorSession {
    pub fn new(mode: DragMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Switches mode. Stored offsets are untouched.
    pub fn set_mode(&mut self, mode: DragMode) {
        self.mode = mode;
    }

    /// Hint shown next to the mode toggle.
    pub fn hint(&self) -> &'static str {
        match self.mode {
            DragMode::Move => "Drag photo to move",
            DragMode::Crop => "Drag photo to crop",
        }
    }
}

/// Gesture lifecycle tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Begin,
    Update,
    End,
}

/// Pointer displacement accumulated since gesture start, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureDelta {
    pub dx: f64,
    pub dy: f64,
}

impl GestureDelta {
    /// Non-finite components are treated as no movement.
    pub fn new(dx: f64, dy: f64) -> Self {
        Self {
            dx: if dx.is_finite() { dx } else { 0.0 },
            dy: if dy.is_finite() { dy } else { 0.0 },
        }
    }
}

/// One gesture event for one photo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub phase: GesturePhase,
    pub delta: GestureDelta,
}

impl GestureEvent {
    pub fn begin() -> Self {
        Self {
            phase: GesturePhase::Begin,
            delta: GestureDelta::default(),
        }
    }

    pub fn update(dx: f64, dy: f64) -> Self {
        Self {
            phase: GesturePhase::Update,
            delta: GestureDelta::new(dx, dy),
        }
    }

    pub fn end(dx: f64, dy: f64) -> Self {
        Self {
            phase: GesturePhase::End,
            delta: GestureDelta::new(dx, dy),
        }
    }
}

/// Adds a drag displacement to a frame offset.
pub fn apply_frame_drag(frame: FrameOffset, delta: GestureDelta) -> FrameOffset {
    frame.translated(delta.dx, delta.dy)
}

/// Applies an inverse, scaled pan for a drag displacement.
///
/// Dragging the image left reveals content that was to its right.
pub fn apply_pan_drag(pan: PanOffset, delta: GestureDelta) -> PanOffset {
    PanOffset::new(
        pan.pan_x() - delta.dx * PAN_SENSITIVITY,
        pan.pan_y() - delta.dy * PAN_SENSITIVITY,
    )
}

/// Commits one finished drag to a photo according to the session mode.
pub fn commit_drag(session: EditorSession, photo: &Photo, delta: GestureDelta) -> Photo {
    match session.mode() {
        DragMode::Move => photo.with_frame(apply_frame_drag(photo.frame(), delta)),
        DragMode::Crop => photo.with_pan(apply_pan_drag(photo.pan(), delta)),
    }
}

/// Pure gesture reducer: only `End` produces a new state.
pub fn reduce_gesture(session: EditorSession, photo: &Photo, event: GestureEvent) -> Photo {
    match event.phase {
        GesturePhase::Begin | GesturePhase::Update => photo.clone(),
        GesturePhase::End => commit_drag(session, photo, event.delta),
    }
}

/// Frame position to draw while a drag is in flight.
///
/// In crop mode the frame stays pinned to its stored offset.
pub fn preview_frame(session: EditorSession, photo: &Photo, delta: GestureDelta) -> FrameOffset {
    match session.mode() {
        DragMode::Move => apply_frame_drag(photo.frame(), delta),
        DragMode::Crop => photo.frame(),
    }
}
