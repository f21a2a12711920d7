//! Collage editing surface.
//!
//! Holds the photo list being edited, the editor session mode and the drag
//! currently in flight. Continuous updates are tracked for preview only.

use crate::layout::gesture::{
    preview_frame, reduce_gesture, DragMode, EditorSession, GestureDelta, GestureEvent,
    GesturePhase,
};
use crate::layout::template::{place_photos, select_layout, CollageLayout, PlacedPhoto};
use crate::model::entry::MAX_PHOTOS_PER_ENTRY;
use crate::model::photo::{FrameOffset, Photo, PhotoId};
use log::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
struct ActiveDrag {
    photo_id: PhotoId,
    latest: GestureDelta,
}

/// Editing state for one entry's collage.
#[derive(Debug, Clone, Default)]
pub struct CollageEditor {
    photos: Vec<Photo>,
    session: EditorSession,
    active: Option<ActiveDrag>,
}

impl CollageEditor {
    /// Starts an editor over existing photos. Photos past the cap are dropped.
    pub fn new(mut photos: Vec<Photo>) -> Self {
        if photos.len() > MAX_PHOTOS_PER_ENTRY {
            warn!(
                "event=collage_truncate module=layout status=warn count={} max={}",
                photos.len(),
                MAX_PHOTOS_PER_ENTRY
            );
            photos.truncate(MAX_PHOTOS_PER_ENTRY);
        }
        Self {
            photos,
            session: EditorSession::default(),
            active: None,
        }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn into_photos(self) -> Vec<Photo> {
        self.photos
    }

    pub fn session(&self) -> EditorSession {
        self.session
    }

    pub fn set_mode(&mut self, mode: DragMode) {
        self.session.set_mode(mode);
    }

    pub fn remaining_slots(&self) -> usize {
        MAX_PHOTOS_PER_ENTRY.saturating_sub(self.photos.len())
    }

    pub fn is_full(&self) -> bool {
        self.remaining_slots() == 0
    }

    /// Appends photos up to the cap and returns how many were accepted.
    pub fn add_photos(&mut self, incoming: Vec<Photo>) -> usize {
        let accepted = incoming.len().min(self.remaining_slots());
        self.photos.extend(incoming.into_iter().take(accepted));
        accepted
    }

    pub fn remove_photo(&mut self, photo_id: &str) -> Option<Photo> {
        let index = self.photos.iter().position(|photo| photo.id == photo_id)?;
        if self
            .active
            .as_ref()
            .is_some_and(|drag| drag.photo_id == photo_id)
        {
            self.active = None;
        }
        Some(self.photos.remove(index))
    }

    pub fn clear_photos(&mut self) {
        self.photos.clear();
        self.active = None;
    }

    pub fn layout(&self) -> CollageLayout {
        select_layout(self.photos.len())
    }

    pub fn placed(&self) -> Vec<PlacedPhoto<'_>> {
        place_photos(&self.photos)
    }

    /// Feeds one gesture event for `photo_id`.
    ///
    /// Returns `true` when the event committed a new photo state. An `End`
    /// without a matching `Begin` still commits its displacement.
    pub fn handle_gesture(&mut self, photo_id: &str, event: GestureEvent) -> bool {
        let Some(index) = self.photos.iter().position(|photo| photo.id == photo_id) else {
            debug!("event=gesture_ignored module=layout status=ok reason=unknown_photo");
            return false;
        };

        match event.phase {
            GesturePhase::Begin => {
                self.active = Some(ActiveDrag {
                    photo_id: photo_id.to_string(),
                    latest: GestureDelta::default(),
                });
                false
            }
            GesturePhase::Update => {
                if let Some(drag) = self.active.as_mut().filter(|drag| drag.photo_id == photo_id) {
                    drag.latest = event.delta;
                }
                false
            }
            GesturePhase::End => {
                self.active = None;
                let next = reduce_gesture(self.session, &self.photos[index], event);
                self.photos[index] = next;
                true
            }
        }
    }

    /// Frame offset to draw for the photo being dragged, if any.
    pub fn drag_preview(&self) -> Option<(&str, FrameOffset)> {
        let drag = self.active.as_ref()?;
        let photo = self.photos.iter().find(|photo| photo.id == drag.photo_id)?;
        Some((
            drag.photo_id.as_str(),
            preview_frame(self.session, photo, drag.latest),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::CollageEditor;
    use crate::layout::gesture::{DragMode, GestureEvent};
    use crate::layout::template::LayoutKind;
    use crate::model::photo::{FrameOffset, PanOffset, Photo};

    fn photos(count: usize) -> Vec<Photo> {
        (0..count)
            .map(|idx| Photo::with_id(format!("p{idx}"), format!("u{idx}"), 0.0))
            .collect()
    }

    #[test]
    fn full_editor_accepts_no_more_photos() {
        let mut editor = CollageEditor::new(photos(6));
        assert_eq!(editor.add_photos(photos(3)), 0);
        assert_eq!(editor.photos().len(), 6);
    }

    #[test]
    fn add_photos_accepts_up_to_remaining_slots() {
        let mut editor = CollageEditor::new(photos(4));
        let incoming: Vec<Photo> = (10..13)
            .map(|idx| Photo::with_id(format!("p{idx}"), "u", 0.0))
            .collect();
        assert_eq!(editor.add_photos(incoming), 2);
        assert_eq!(editor.photos().len(), 6);
        assert_eq!(editor.photos()[5].id, "p11");
        assert_eq!(editor.layout().kind, LayoutKind::Hero);
    }

    #[test]
    fn mode_switch_leaves_offsets_untouched() {
        let mut editor = CollageEditor::new(photos(2));
        assert!(editor.handle_gesture("p0", GestureEvent::end(5.0, 5.0)));
        let before: Vec<Photo> = editor.photos().to_vec();
        editor.set_mode(DragMode::Crop);
        assert_eq!(editor.photos(), before.as_slice());
        editor.set_mode(DragMode::Move);
        assert_eq!(editor.photos(), before.as_slice());
    }

    #[test]
    fn drag_lifecycle_previews_then_commits() {
        let mut editor = CollageEditor::new(photos(1));
        assert!(!editor.handle_gesture("p0", GestureEvent::begin()));
        assert!(!editor.handle_gesture("p0", GestureEvent::update(8.0, 2.0)));
        assert_eq!(
            editor.drag_preview(),
            Some(("p0", FrameOffset::new(8.0, 2.0)))
        );
        assert_eq!(editor.photos()[0].frame(), FrameOffset::ORIGIN);

        assert!(editor.handle_gesture("p0", GestureEvent::end(10.0, 4.0)));
        assert_eq!(editor.drag_preview(), None);
        assert_eq!(editor.photos()[0].frame(), FrameOffset::new(10.0, 4.0));
        assert_eq!(editor.photos()[0].pan(), PanOffset::CENTERED);
    }

    #[test]
    fn crop_mode_commits_pan_only() {
        let mut editor = CollageEditor::new(photos(3));
        editor.set_mode(DragMode::Crop);
        assert!(editor.handle_gesture("p1", GestureEvent::end(20.0, -40.0)));
        let photo = &editor.photos()[1];
        assert_eq!(photo.pan(), PanOffset::new(40.0, 70.0));
        assert_eq!(photo.frame(), FrameOffset::ORIGIN);
    }

    #[test]
    fn unknown_photo_gesture_is_ignored() {
        let mut editor = CollageEditor::new(photos(1));
        assert!(!editor.handle_gesture("missing", GestureEvent::end(1.0, 1.0)));
    }

    #[test]
    fn remove_and_clear_drop_active_drag() {
        let mut editor = CollageEditor::new(photos(2));
        editor.handle_gesture("p1", GestureEvent::begin());
        assert!(editor.remove_photo("p1").is_some());
        assert_eq!(editor.drag_preview(), None);
        editor.clear_photos();
        assert_eq!(editor.layout().kind, LayoutKind::Empty);
    }
}
