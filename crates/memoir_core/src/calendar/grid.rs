//! Month/year render models built from an entry set.

use crate::calendar::cursor::MonthCursor;
use crate::model::entry::Entry;
use crate::model::mood::Mood;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// One cell of a Sunday-first month grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DayCell<'a> {
    Blank,
    Day {
        date: NaiveDate,
        entry: Option<&'a Entry>,
    },
}

/// Month view render model.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid<'a> {
    pub cursor: MonthCursor,
    /// Leading blanks followed by one cell per day; trailing cells are unused.
    pub cells: Vec<DayCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    /// Rows of seven cells; the last row may be shorter.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell<'a>]> {
        self.cells.chunks(7)
    }

    pub fn entry_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, DayCell::Day { entry: Some(_), .. }))
            .count()
    }
}

/// Mini-calendar summary for one month in year view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSummary {
    pub cursor: MonthCursor,
    pub leading_blanks: u32,
    pub days_in_month: u32,
    pub entry_count: usize,
    /// Index `d - 1` holds the mood of day `d`, when it has an entry.
    pub day_moods: Vec<Option<Mood>>,
}

/// Year view render model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGrid {
    pub year: i32,
    pub months: Vec<MonthSummary>,
}

/// Outcome of clicking a day cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DaySelection<'a> {
    /// Open the read view of the stored entry.
    Existing(&'a Entry),
    /// Open the create form for this date.
    New(NaiveDate),
}

/// Builds the month grid for `cursor`.
pub fn month_grid<'a>(cursor: MonthCursor, entries: &'a [Entry]) -> MonthGrid<'a> {
    let by_date = index_by_date(entries_in_month(cursor, entries));
    let mut cells = Vec::with_capacity((cursor.leading_blanks() + cursor.days_in_month()) as usize);
    cells.extend((0..cursor.leading_blanks()).map(|_| DayCell::Blank));
    cells.extend((1..=cursor.days_in_month()).filter_map(|day| {
        cursor.date(day).map(|date| DayCell::Day {
            date,
            entry: by_date.get(&date).copied(),
        })
    }));

    MonthGrid { cursor, cells }
}

/// Builds the twelve month summaries for `year`.
///
/// Returns `None` when the year is outside chrono's range.
pub fn year_grid(year: i32, entries: &[Entry]) -> Option<YearGrid> {
    let mut months = Vec::with_capacity(12);
    for month in 1..=12 {
        let cursor = MonthCursor::new(year, month)?;
        let month_entries = entries_in_month(cursor, entries);
        let by_date = index_by_date(month_entries.iter().copied());
        let day_moods = (1..=cursor.days_in_month())
            .map(|day| {
                cursor
                    .date(day)
                    .and_then(|date| by_date.get(&date).map(|entry| entry.mood))
            })
            .collect();

        months.push(MonthSummary {
            cursor,
            leading_blanks: cursor.leading_blanks(),
            days_in_month: cursor.days_in_month(),
            entry_count: month_entries.len(),
            day_moods,
        });
    }

    Some(YearGrid { year, months })
}

/// Resolves a clicked day (1-based) to an existing entry or a new date.
///
/// Returns `None` when `day` does not exist in the month.
pub fn resolve_day<'a>(
    cursor: MonthCursor,
    day: u32,
    entries: &'a [Entry],
) -> Option<DaySelection<'a>> {
    let date = cursor.date(day)?;
    Some(
        entries
            .iter()
            .find(|entry| entry.date == date)
            .map_or(DaySelection::New(date), DaySelection::Existing),
    )
}

/// Entries dated within the cursor's month, in input order.
pub fn entries_in_month(cursor: MonthCursor, entries: &[Entry]) -> Vec<&Entry> {
    entries
        .iter()
        .filter(|entry| cursor.contains(entry.date))
        .collect()
}

/// Entries dated within `year`, in input order.
pub fn entries_in_year(year: i32, entries: &[Entry]) -> Vec<&Entry> {
    entries
        .iter()
        .filter(|entry| entry.date.year() == year)
        .collect()
}

// First entry wins when a date repeats.
fn index_by_date<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> HashMap<NaiveDate, &'a Entry> {
    let mut by_date = HashMap::new();
    for entry in entries {
        by_date.entry(entry.date).or_insert(entry);
    }
    by_date
}

#[cfg(test)]
mod tests {
    use super::{month_grid, resolve_day, year_grid, DayCell, DaySelection};
    use crate::calendar::cursor::MonthCursor;
    use crate::model::entry::Entry;
    use crate::model::mood::Mood;
    use chrono::NaiveDate;

    fn entry_on(year: i32, month: u32, day: u32, mood: Mood) -> Entry {
        let mut entry = Entry::new("u", NaiveDate::from_ymd_opt(year, month, day).unwrap(), 0);
        entry.mood = mood;
        entry
    }

    #[test]
    fn month_grid_starts_with_weekday_blanks() {
        let entries = vec![entry_on(2026, 10, 5, Mood::Calm)];
        let cursor = MonthCursor::new(2026, 10).unwrap();
        let grid = month_grid(cursor, &entries);

        assert_eq!(grid.cells.len(), 4 + 31);
        assert!(grid.cells[..4].iter().all(|cell| *cell == DayCell::Blank));
        match grid.cells[4 + 4] {
            DayCell::Day { date, entry } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 5).unwrap());
                assert_eq!(entry.map(|e| e.mood), Some(Mood::Calm));
            }
            DayCell::Blank => panic!("expected a day cell"),
        }
        assert_eq!(grid.entry_count(), 1);
        assert_eq!(grid.weeks().count(), 5);
    }

    #[test]
    fn resolve_day_distinguishes_existing_and_new() {
        let entries = vec![entry_on(2026, 2, 14, Mood::Cozy)];
        let cursor = MonthCursor::new(2026, 2).unwrap();

        assert!(matches!(
            resolve_day(cursor, 14, &entries),
            Some(DaySelection::Existing(entry)) if entry.mood == Mood::Cozy
        ));
        assert_eq!(
            resolve_day(cursor, 15, &entries),
            Some(DaySelection::New(NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()))
        );
        assert_eq!(resolve_day(cursor, 30, &entries), None);
    }

    #[test]
    fn year_grid_counts_entries_per_month() {
        let entries = vec![
            entry_on(2026, 1, 1, Mood::Happy),
            entry_on(2026, 1, 31, Mood::Calm),
            entry_on(2026, 12, 25, Mood::Cozy),
            entry_on(2025, 12, 25, Mood::Cozy),
        ];
        let grid = year_grid(2026, &entries).unwrap();
        assert_eq!(grid.months.len(), 12);
        assert_eq!(grid.months[0].entry_count, 2);
        assert_eq!(grid.months[0].day_moods[30], Some(Mood::Calm));
        assert_eq!(grid.months[11].entry_count, 1);
        assert_eq!(grid.months[5].entry_count, 0);
        assert_eq!(grid.months[1].day_moods.len(), 28);
    }
}
