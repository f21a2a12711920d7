//! Slot templates keyed by photo count.
//!
//! Geometry is proportional: every rect is expressed as fractions of the
//! drawing area, so the drawing size is never an input.
//!
//! | count | template |
//! |---|---|
//! | 0 | empty placeholder |
//! | 1 | single centered slot (90%) |
//! | 2 | two overlapping 2/3 slots, second stacked above |
//! | 3 | tall slot spanning two rows + two stacked slots |
//! | 4 | uniform 2x2 grid |
//! | 5, 6 | 2x2 hero slot for photo 0, remaining photos flow into 1x1 cells |

use crate::model::entry::MAX_PHOTOS_PER_ENTRY;
use crate::model::photo::Photo;

const SINGLE_INSET: f64 = 0.05;
const SINGLE_EXTENT: f64 = 0.9;
const OVERLAP_EXTENT: f64 = 2.0 / 3.0;

/// Template family chosen for a photo count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Empty,
    Single,
    OverlapPair,
    TallSplit,
    Grid,
    Hero,
}

impl LayoutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Single => "single",
            Self::OverlapPair => "overlap_pair",
            Self::TallSplit => "tall_split",
            Self::Grid => "grid",
            Self::Hero => "hero",
        }
    }
}

/// Slot rectangle as fractions of the drawing area, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SlotRect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Grid placement for grid-based templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub col: u8,
    pub row: u8,
    pub col_span: u8,
    pub row_span: u8,
}

/// One photo position in a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub photo_index: usize,
    pub rect: SlotRect,
    /// Higher values stack above lower ones.
    pub z_order: u8,
    /// `None` for free-positioned templates (single, overlap pair).
    pub cell: Option<GridCell>,
}

/// Resolved template for one photo count.
#[derive(Debug, Clone, PartialEq)]
pub struct CollageLayout {
    pub kind: LayoutKind,
    pub slots: Vec<Slot>,
}

impl CollageLayout {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot_for(&self, photo_index: usize) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.photo_index == photo_index)
    }

    /// Index of the photo that receives the designated large slot.
    pub fn hero_index(&self) -> Option<usize> {
        match self.kind {
            LayoutKind::Single | LayoutKind::OverlapPair | LayoutKind::TallSplit | LayoutKind::Hero => {
                Some(0)
            }
            LayoutKind::Empty | LayoutKind::Grid => None,
        }
    }
}

/// A photo bound to its slot, ready for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedPhoto<'a> {
    pub photo: &'a Photo,
    pub slot: Slot,
}

/// Selects the slot template for `count` photos.
///
/// Counts above the per-entry cap reuse the six-photo template; photos
/// beyond it get no slot.
pub fn select_layout(count: usize) -> CollageLayout {
    let count = count.min(MAX_PHOTOS_PER_ENTRY);
    match count {
        0 => CollageLayout {
            kind: LayoutKind::Empty,
            slots: Vec::new(),
        },
        1 => CollageLayout {
            kind: LayoutKind::Single,
            slots: vec![Slot {
                photo_index: 0,
                rect: SlotRect {
                    x: SINGLE_INSET,
                    y: SINGLE_INSET,
                    width: SINGLE_EXTENT,
                    height: SINGLE_EXTENT,
                },
                z_order: 1,
                cell: None,
            }],
        },
        2 => CollageLayout {
            kind: LayoutKind::OverlapPair,
            slots: vec![
                Slot {
                    photo_index: 0,
                    rect: SlotRect {
                        x: 0.0,
                        y: 0.0,
                        width: OVERLAP_EXTENT,
                        height: OVERLAP_EXTENT,
                    },
                    z_order: 1,
                    cell: None,
                },
                Slot {
                    photo_index: 1,
                    rect: SlotRect {
                        x: 1.0 - OVERLAP_EXTENT,
                        y: 1.0 - OVERLAP_EXTENT,
                        width: OVERLAP_EXTENT,
                        height: OVERLAP_EXTENT,
                    },
                    z_order: 2,
                    cell: None,
                },
            ],
        },
        3 => grid_layout(
            LayoutKind::TallSplit,
            2,
            2,
            &[
                GridCell {
                    col: 0,
                    row: 0,
                    col_span: 1,
                    row_span: 2,
                },
                GridCell {
                    col: 1,
                    row: 0,
                    col_span: 1,
                    row_span: 1,
                },
                GridCell {
                    col: 1,
                    row: 1,
                    col_span: 1,
                    row_span: 1,
                },
            ],
        ),
        4 => grid_layout(LayoutKind::Grid, 2, 2, &flow_cells(2, 2, None, 4)),
        _ => {
            let hero = GridCell {
                col: 0,
                row: 0,
                col_span: 2,
                row_span: 2,
            };
            // Three columns; the fourth photo onward wraps onto a third row.
            grid_layout(
                LayoutKind::Hero,
                3,
                3,
                &flow_cells(3, 3, Some(hero), count),
            )
        }
    }
}

/// Pairs photos with the slots of their count's template.
pub fn place_photos(photos: &[Photo]) -> Vec<PlacedPhoto<'_>> {
    let layout = select_layout(photos.len());
    layout
        .slots
        .iter()
        .filter_map(|slot| {
            photos
                .get(slot.photo_index)
                .map(|photo| PlacedPhoto { photo, slot: *slot })
        })
        .collect()
}

fn grid_layout(kind: LayoutKind, columns: u8, rows: u8, cells: &[GridCell]) -> CollageLayout {
    let slots = cells
        .iter()
        .enumerate()
        .map(|(photo_index, cell)| Slot {
            photo_index,
            rect: SlotRect {
                x: f64::from(cell.col) / f64::from(columns),
                y: f64::from(cell.row) / f64::from(rows),
                width: f64::from(cell.col_span) / f64::from(columns),
                height: f64::from(cell.row_span) / f64::from(rows),
            },
            z_order: 1,
            cell: Some(*cell),
        })
        .collect();

    CollageLayout { kind, slots }
}

/// Row-major auto placement of 1x1 cells around an optional leading cell.
fn flow_cells(columns: u8, rows: u8, leading: Option<GridCell>, count: usize) -> Vec<GridCell> {
    let mut cells: Vec<GridCell> = leading.into_iter().collect();
    for row in 0..rows {
        for col in 0..columns {
            if cells.len() >= count {
                return cells;
            }
            let occupied = cells.iter().any(|cell| {
                col >= cell.col
                    && col < cell.col + cell.col_span
                    && row >= cell.row
                    && row < cell.row + cell.row_span
            });
            if !occupied {
                cells.push(GridCell {
                    col,
                    row,
                    col_span: 1,
                    row_span: 1,
                });
            }
        }
    }
    cells
}
