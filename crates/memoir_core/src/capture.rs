//! Audio capture collaborator and scoped recording guard.
//!
//! # Responsibility
//! - Abstract the platform microphone behind `CaptureDevice`.
//! - Guarantee the device is stopped and released when a recording ends,
//!   whether it finishes normally or is abandoned.
//!
//! # Invariants
//! - A `Recording` releases its device exactly once.
//! - Durations are whole seconds, rounded down.

use crate::storage::MediaBlob;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// File name given to captured clips when the device does not supply one.
pub const DEFAULT_CLIP_NAME: &str = "voice-note.webm";

/// Finished audio clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAudio {
    pub bytes: Vec<u8>,
    pub duration_secs: u32,
    pub file_name: String,
}

impl CapturedAudio {
    pub fn new(bytes: Vec<u8>, elapsed: Duration) -> Self {
        Self {
            bytes,
            duration_secs: u32::try_from(elapsed.as_secs()).unwrap_or(u32::MAX),
            file_name: DEFAULT_CLIP_NAME.to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn to_blob(&self) -> MediaBlob {
        MediaBlob::new(self.file_name.clone(), self.bytes.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user or platform refused microphone access.
    PermissionDenied,
    /// `stop` was called without a running capture.
    NotRecording,
    Device(String),
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "microphone permission denied"),
            Self::NotRecording => write!(f, "capture device is not recording"),
            Self::Device(message) => write!(f, "capture device failure: {message}"),
        }
    }
}

impl Error for CaptureError {}

/// Platform microphone.
pub trait CaptureDevice {
    fn start(&mut self) -> Result<(), CaptureError>;
    fn stop(&mut self) -> Result<CapturedAudio, CaptureError>;
    /// Gives the input stream back to the platform. Must be idempotent.
    fn release(&mut self);
}

/// An in-progress recording that owns the device until finished or dropped.
pub struct Recording<'d, D: CaptureDevice + ?Sized> {
    device: &'d mut D,
    active: bool,
}

impl<'d, D: CaptureDevice + ?Sized> Recording<'d, D> {
    /// Starts the device. On failure the device is released before returning.
    pub fn start(device: &'d mut D) -> Result<Self, CaptureError> {
        if let Err(err) = device.start() {
            device.release();
            warn!("event=capture_start module=capture status=error error={err}");
            return Err(err);
        }
        info!("event=capture_start module=capture status=ok");
        Ok(Self {
            device,
            active: true,
        })
    }

    /// Stops capture, releases the device and returns the clip.
    pub fn finish(mut self) -> Result<CapturedAudio, CaptureError> {
        self.active = false;
        let result = self.device.stop();
        self.device.release();
        match &result {
            Ok(clip) => info!(
                "event=capture_finish module=capture status=ok duration_secs={}",
                clip.duration_secs
            ),
            Err(err) => warn!("event=capture_finish module=capture status=error error={err}"),
        }
        result
    }
}

impl<D: CaptureDevice + ?Sized> Drop for Recording<'_, D> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        if let Err(err) = self.device.stop() {
            warn!("event=capture_abandon module=capture status=error error={err}");
        }
        self.device.release();
        info!("event=capture_abandon module=capture status=ok");
    }
}

#[cfg(test)]
mod tests {
    use super::{CaptureDevice, CaptureError, CapturedAudio, Recording};
    use std::time::Duration;

    #[derive(Default)]
    struct FakeMic {
        deny: bool,
        recording: bool,
        starts: u32,
        releases: u32,
    }

    impl CaptureDevice for FakeMic {
        fn start(&mut self) -> Result<(), CaptureError> {
            if self.deny {
                return Err(CaptureError::PermissionDenied);
            }
            self.starts += 1;
            self.recording = true;
            Ok(())
        }

        fn stop(&mut self) -> Result<CapturedAudio, CaptureError> {
            if !self.recording {
                return Err(CaptureError::NotRecording);
            }
            self.recording = false;
            Ok(CapturedAudio::new(vec![7; 16], Duration::from_millis(4_900)))
        }

        fn release(&mut self) {
            self.releases += 1;
        }
    }

    #[test]
    fn finish_returns_whole_seconds_and_releases_once() {
        let mut mic = FakeMic::default();
        let clip = Recording::start(&mut mic)
            .expect("start")
            .finish()
            .expect("finish");
        assert_eq!(clip.duration_secs, 4);
        assert_eq!(clip.file_name, "voice-note.webm");
        assert_eq!(mic.releases, 1);
        assert!(!mic.recording);
    }

    #[test]
    fn dropping_unfinished_recording_releases_device() {
        let mut mic = FakeMic::default();
        {
            let _recording = Recording::start(&mut mic).expect("start");
        }
        assert_eq!(mic.starts, 1);
        assert_eq!(mic.releases, 1);
        assert!(!mic.recording);
    }

    #[test]
    fn permission_denial_is_surfaced() {
        let mut mic = FakeMic {
            deny: true,
            ..FakeMic::default()
        };
        let err = Recording::start(&mut mic).err().expect("denied");
        assert_eq!(err, CaptureError::PermissionDenied);
        assert_eq!(mic.releases, 1);
    }
}
