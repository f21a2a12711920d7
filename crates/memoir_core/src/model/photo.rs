//! Photo record and its two independent offsets.
//!
//! # Responsibility
//! - Hold one collage photo: identity, media reference, decorative tilt,
//!   frame offset (polaroid position) and pan offset (crop focal point).
//! - Normalize optional wire fields exactly once, at construction/decoding.
//!
//! # Invariants
//! - `rotation` is assigned at creation and never changes.
//! - Frame offsets are unclamped but always finite.
//! - Pan offsets are always clamped to `[PAN_MIN, PAN_MAX]`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PAN_MIN: f64 = 0.0;
pub const PAN_MAX: f64 = 100.0;
pub const PAN_CENTER: f64 = 50.0;
/// New photos are tilted uniformly within `[-MAX_TILT_DEGREES, MAX_TILT_DEGREES)`.
pub const MAX_TILT_DEGREES: f64 = 3.0;

/// Opaque photo identifier, unique within its entry.
pub type PhotoId = String;

/// Clamps one pan percentage into `[PAN_MIN, PAN_MAX]`.
///
/// `NaN` falls back to `PAN_CENTER`.
pub fn clamp_pan(value: f64) -> f64 {
    if value.is_nan() {
        PAN_CENTER
    } else {
        value.clamp(PAN_MIN, PAN_MAX)
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Displacement of the polaroid frame from its layout slot, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOffset {
    x: f64,
    y: f64,
}

impl FrameOffset {
    pub const ORIGIN: FrameOffset = FrameOffset { x: 0.0, y: 0.0 };

    /// Non-finite components collapse to `0`.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: finite_or(x, 0.0),
            y: finite_or(y, 0.0),
        }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns this offset moved by `(dx, dy)` without clamping.
    ///
    /// A component whose sum overflows keeps its previous value.
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: finite_or(self.x + dx, self.x),
            y: finite_or(self.y + dy, self.y),
        }
    }
}

/// Focal point of the image inside its frame window, in percent.
///
/// `(50, 50)` is centered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanOffset {
    pan_x: f64,
    pan_y: f64,
}

impl PanOffset {
    pub const CENTERED: PanOffset = PanOffset {
        pan_x: PAN_CENTER,
        pan_y: PAN_CENTER,
    };

    /// Builds a clamped pan offset.
    pub fn new(pan_x: f64, pan_y: f64) -> Self {
        Self {
            pan_x: clamp_pan(pan_x),
            pan_y: clamp_pan(pan_y),
        }
    }

    pub fn pan_x(self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(self) -> f64 {
        self.pan_y
    }

    /// CSS `object-position` value for renderers, e.g. `50% 50%`.
    pub fn object_position(self) -> String {
        format!("{}% {}%", self.pan_x, self.pan_y)
    }
}

impl Default for PanOffset {
    fn default() -> Self {
        Self::CENTERED
    }
}

/// One collage photo.
///
/// Serialized in the stored wire shape `{id, url, rotation, x, y, panX, panY}`;
/// decoding accepts missing offsets and fills the documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PhotoRecord", into = "PhotoRecord")]
pub struct Photo {
    pub id: PhotoId,
    /// Public media reference; bytes live in the object store.
    pub url: String,
    rotation: f64,
    frame: FrameOffset,
    pan: PanOffset,
}

impl Photo {
    /// Creates a photo with a generated id, default offsets and a fixed tilt.
    pub fn new(url: impl Into<String>, rotation: f64) -> Self {
        Self::with_id(Uuid::new_v4().simple().to_string(), url, rotation)
    }

    /// Creates a photo with a caller-provided id and default offsets.
    pub fn with_id(id: impl Into<PhotoId>, url: impl Into<String>, rotation: f64) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            rotation: finite_or(rotation, 0.0),
            frame: FrameOffset::ORIGIN,
            pan: PanOffset::CENTERED,
        }
    }

    /// Creates a photo tilted by a random angle in `[-3, 3)` degrees.
    pub fn with_random_tilt(url: impl Into<String>, rng: &mut impl Rng) -> Self {
        let rotation = rng.gen_range(-MAX_TILT_DEGREES..MAX_TILT_DEGREES);
        Self::new(url, rotation)
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn frame(&self) -> FrameOffset {
        self.frame
    }

    pub fn pan(&self) -> PanOffset {
        self.pan
    }

    /// Returns a copy with the frame offset replaced.
    pub fn with_frame(&self, frame: FrameOffset) -> Self {
        Self {
            frame,
            ..self.clone()
        }
    }

    /// Returns a copy with the pan offset replaced.
    pub fn with_pan(&self, pan: PanOffset) -> Self {
        Self { pan, ..self.clone() }
    }
}

/// Stored/wire representation with optional offsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PhotoRecord {
    id: String,
    url: String,
    #[serde(default)]
    rotation: f64,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default, rename = "panX")]
    pan_x: Option<f64>,
    #[serde(default, rename = "panY")]
    pan_y: Option<f64>,
}

impl From<PhotoRecord> for Photo {
    fn from(record: PhotoRecord) -> Self {
        let photo = Photo::with_id(record.id, record.url, record.rotation);
        let frame = FrameOffset::new(record.x.unwrap_or(0.0), record.y.unwrap_or(0.0));
        let pan = PanOffset::new(
            record.pan_x.unwrap_or(PAN_CENTER),
            record.pan_y.unwrap_or(PAN_CENTER),
        );
        Photo { frame, pan, ..photo }
    }
}

impl From<Photo> for PhotoRecord {
    fn from(photo: Photo) -> Self {
        PhotoRecord {
            id: photo.id,
            url: photo.url,
            rotation: photo.rotation,
            x: Some(photo.frame.x),
            y: Some(photo.frame.y),
            pan_x: Some(photo.pan.pan_x),
            pan_y: Some(photo.pan.pan_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{clamp_pan, FrameOffset, PanOffset, Photo, MAX_TILT_DEGREES};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn decoding_fills_missing_offsets_with_defaults() {
        let photo: Photo =
            serde_json::from_str(r#"{"id":"p1","url":"https://cdn/x.png","rotation":-2}"#)
                .expect("legacy photo should decode");
        assert_eq!(photo.frame(), FrameOffset::ORIGIN);
        assert_eq!(photo.pan(), PanOffset::CENTERED);
        assert_eq!(photo.rotation(), -2.0);
    }

    #[test]
    fn decoding_clamps_out_of_range_pan() {
        let photo: Photo = serde_json::from_str(
            r#"{"id":"p1","url":"u","rotation":0,"x":12.5,"y":-4,"panX":140,"panY":-3}"#,
        )
        .expect("photo should decode");
        assert_eq!(photo.frame(), FrameOffset::new(12.5, -4.0));
        assert_eq!(photo.pan().pan_x(), 100.0);
        assert_eq!(photo.pan().pan_y(), 0.0);
    }

    #[test]
    fn encoding_always_emits_populated_offsets() {
        let photo = Photo::with_id("p9", "u", 1.5);
        let value = serde_json::to_value(&photo).expect("photo should encode");
        assert_eq!(value["x"], 0.0);
        assert_eq!(value["panX"], 50.0);
        assert_eq!(value["panY"], 50.0);
    }

    #[test]
    fn clamp_pan_is_idempotent_in_range() {
        for value in [0.0, 12.25, 50.0, 99.9, 100.0] {
            assert_eq!(clamp_pan(value), value);
            assert_eq!(clamp_pan(clamp_pan(value)), clamp_pan(value));
        }
        assert_eq!(clamp_pan(f64::NAN), 50.0);
        assert_eq!(clamp_pan(f64::INFINITY), 100.0);
    }

    #[test]
    fn frame_offset_rejects_non_finite_components() {
        let offset = FrameOffset::new(f64::NAN, f64::NEG_INFINITY);
        assert_eq!(offset, FrameOffset::ORIGIN);
    }

    #[test]
    fn overflowing_translation_keeps_previous_position() {
        let far = FrameOffset::new(f64::MAX, 10.0);
        let moved = far.translated(f64::MAX, 2.5);
        assert_eq!(moved.x(), f64::MAX);
        assert_eq!(moved.y(), 12.5);
        assert_eq!(far.translated(f64::NAN, 1.0), FrameOffset::new(f64::MAX, 11.0));
    }

    #[test]
    fn object_position_formats_pan_percentages() {
        assert_eq!(PanOffset::CENTERED.object_position(), "50% 50%");
        assert_eq!(PanOffset::new(12.5, 140.0).object_position(), "12.5% 100%");
    }

    #[test]
    fn random_tilt_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let photo = Photo::with_random_tilt("u", &mut rng);
            assert!(photo.rotation() >= -MAX_TILT_DEGREES);
            assert!(photo.rotation() < MAX_TILT_DEGREES);
        }
    }
}
