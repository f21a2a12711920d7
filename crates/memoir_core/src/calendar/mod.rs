//! Calendar navigation and day-grid render models.
//!
//! # Responsibility
//! - Move a month/year cursor by exactly one unit per navigation action.
//! - Build month and year grids that resolve each day to zero-or-one entry.
//!
//! # Invariants
//! - Month grids start with `leading_blanks` empty cells, where the count is
//!   the weekday of the 1st counted from Sunday.
//! - Cursor arithmetic wraps year boundaries through `chrono` date math.

pub mod cursor;
pub mod grid;

pub use cursor::{CalendarState, MonthCursor, ViewMode, WEEKDAY_LABELS};
pub use grid::{
    entries_in_month, entries_in_year, month_grid, resolve_day, year_grid, DayCell, DaySelection,
    MonthGrid, MonthSummary, YearGrid,
};
