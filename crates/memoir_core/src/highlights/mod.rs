//! Highlights export compositor.
//!
//! # Responsibility
//! - Sample the cover photo of up to `MAX_HIGHLIGHTS` entries that have
//!   photos and scatter them onto an export canvas.
//! - Delegate rasterization to an `ExportRenderer` collaborator.
//!
//! # Invariants
//! - Entries without photos are never selected.
//! - Each selected entry contributes exactly its first photo.
//! - Scatter values are drawn once per composition from a stored seed, so a
//!   composite can be re-rendered identically.

use crate::model::entry::Entry;
use crate::model::photo::Photo;
use chrono::NaiveDate;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Upper bound on scattered photos per composite.
pub const MAX_HIGHLIGHTS: usize = 30;
/// Scatter rotation is drawn from `[-MAX_SCATTER_DEGREES, MAX_SCATTER_DEGREES)`.
pub const MAX_SCATTER_DEGREES: f64 = 5.0;
pub const MIN_SCATTER_SCALE: f64 = 0.8;
pub const MAX_SCATTER_SCALE: f64 = 1.2;
/// Text shown instead of a canvas when nothing qualifies.
pub const EMPTY_MESSAGE: &str = "No photos found in this period to create a highlight.";

/// One photo placed on the highlights canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightItem {
    pub photo: Photo,
    pub entry_date: NaiveDate,
    /// Degrees.
    pub rotation: f64,
    pub scale: f64,
    /// Whether the item stretches to fill its wrap row.
    pub grow: bool,
}

impl HighlightItem {
    /// Short date caption, e.g. `Oct 5`.
    pub fn date_label(&self) -> String {
        self.entry_date.format("%b %-d").to_string()
    }
}

/// Composed highlights for one period.
#[derive(Debug, Clone, PartialEq)]
pub enum Highlights {
    /// No entry in the period had a photo.
    Empty { title: String },
    Populated {
        title: String,
        items: Vec<HighlightItem>,
        /// Seed the scatter values were drawn from.
        seed: u64,
    },
}

impl Highlights {
    pub fn title(&self) -> &str {
        match self {
            Self::Empty { title } | Self::Populated { title, .. } => title,
        }
    }

    pub fn items(&self) -> &[HighlightItem] {
        match self {
            Self::Empty { .. } => &[],
            Self::Populated { items, .. } => items,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Header line, e.g. `12 Memories captured`.
    pub fn summary(&self) -> String {
        format!("{} Memories captured", self.items().len())
    }

    /// Download name for the exported raster.
    pub fn export_file_name(&self) -> String {
        export_file_name(self.title())
    }
}

/// Produces highlight composites with a fixed scatter seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightsCompositor {
    seed: u64,
}

impl HighlightsCompositor {
    /// Compositor with a freshly drawn seed.
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().gen())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Selects and scatters photos from a caller-filtered entry set.
    ///
    /// Entries are considered in input order.
    pub fn compose<'a>(
        &self,
        title: impl Into<String>,
        entries: impl IntoIterator<Item = &'a Entry>,
    ) -> Highlights {
        let title = title.into();
        let selected = select_cover_photos(entries);
        if selected.is_empty() {
            info!("event=highlights_compose module=highlights status=ok items=0");
            return Highlights::Empty { title };
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let items: Vec<HighlightItem> = selected
            .into_iter()
            .map(|(entry, photo)| HighlightItem {
                photo: photo.clone(),
                entry_date: entry.date,
                rotation: rng.gen_range(-MAX_SCATTER_DEGREES..MAX_SCATTER_DEGREES),
                scale: rng.gen_range(MIN_SCATTER_SCALE..MAX_SCATTER_SCALE),
                grow: rng.gen_bool(0.5),
            })
            .collect();

        info!(
            "event=highlights_compose module=highlights status=ok items={} seed={}",
            items.len(),
            self.seed
        );
        Highlights::Populated {
            title,
            items,
            seed: self.seed,
        }
    }
}

impl Default for HighlightsCompositor {
    fn default() -> Self {
        Self::new()
    }
}

/// First photo of the first `MAX_HIGHLIGHTS` entries that have one.
pub fn select_cover_photos<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
) -> Vec<(&'a Entry, &'a Photo)> {
    entries
        .into_iter()
        .filter_map(|entry| entry.cover_photo().map(|photo| (entry, photo)))
        .take(MAX_HIGHLIGHTS)
        .collect()
}

/// `Highlights-<title>.png` with whitespace runs replaced by `-`.
pub fn export_file_name(title: &str) -> String {
    let slug = title.split_whitespace().collect::<Vec<_>>().join("-");
    format!("Highlights-{slug}.png")
}

/// Encoded raster produced by an export renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// PNG-encoded bytes.
    pub png: Vec<u8>,
}

/// Screenshot-to-image collaborator: renders a composite to a raster.
pub trait ExportRenderer {
    type Error: std::error::Error;

    fn render(&self, highlights: &Highlights) -> Result<RasterImage, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::{
        export_file_name, select_cover_photos, Highlights, HighlightsCompositor,
        MAX_SCATTER_DEGREES,
    };
    use crate::model::entry::Entry;
    use crate::model::photo::Photo;
    use chrono::{Duration, NaiveDate};

    fn entries_with_photos(count: usize, photos_each: usize) -> Vec<Entry> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        (0..count)
            .map(|idx| {
                let mut entry = Entry::new("u", start + Duration::days(idx as i64), 0);
                for p in 0..photos_each {
                    entry
                        .photos
                        .push(Photo::with_id(format!("e{idx}-p{p}"), "u", 0.0));
                }
                entry
            })
            .collect()
    }

    #[test]
    fn caps_at_thirty_and_uses_sole_photo() {
        let entries = entries_with_photos(35, 1);
        let highlights = HighlightsCompositor::with_seed(1).compose("January 2026", &entries);
        let items = highlights.items();
        assert_eq!(items.len(), 30);
        for (idx, item) in items.iter().enumerate() {
            assert_eq!(item.photo.id, format!("e{idx}-p0"));
            assert!(item.rotation >= -MAX_SCATTER_DEGREES && item.rotation < MAX_SCATTER_DEGREES);
        }
    }

    #[test]
    fn skips_entries_without_photos() {
        let mut entries = entries_with_photos(4, 2);
        entries[1].photos.clear();
        entries[3].photos.clear();
        let selected = select_cover_photos(&entries);
        let ids: Vec<&str> = selected.iter().map(|(_, photo)| photo.id.as_str()).collect();
        assert_eq!(ids, vec!["e0-p0", "e2-p0"]);
    }

    #[test]
    fn empty_state_is_distinct() {
        let entries = entries_with_photos(3, 0);
        let highlights = HighlightsCompositor::with_seed(9).compose("2026 Recap", &entries);
        assert!(highlights.is_empty());
        assert_eq!(
            highlights,
            Highlights::Empty {
                title: "2026 Recap".to_string()
            }
        );
        assert_eq!(highlights.summary(), "0 Memories captured");
    }

    #[test]
    fn same_seed_reproduces_scatter() {
        let entries = entries_with_photos(10, 1);
        let first = HighlightsCompositor::with_seed(42).compose("t", &entries);
        let second = HighlightsCompositor::with_seed(42).compose("t", &entries);
        assert_eq!(first, second);
    }

    #[test]
    fn file_name_and_date_label() {
        assert_eq!(
            export_file_name("October 2026"),
            "Highlights-October-2026.png"
        );
        let entries = entries_with_photos(5, 1);
        let highlights = HighlightsCompositor::with_seed(3).compose("x", &entries);
        assert_eq!(highlights.items()[4].date_label(), "Jan 5");
    }
}
