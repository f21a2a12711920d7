//! Month cursor and view navigation state.

use chrono::{Datelike, Months, NaiveDate};

/// Weekday column headers, Sunday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Calendar presentation granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Month,
    Year,
}

/// A `(year, month)` position, stored as the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    /// `month` is 1-based. Returns `None` outside chrono's supported range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Moves one month forward; December wraps to January of the next year.
    ///
    /// Saturates at the end of chrono's date range.
    pub fn next_month(self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(self)
    }

    /// Moves one month back; January wraps to December of the previous year.
    pub fn prev_month(self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(self)
    }

    /// January of the following year.
    pub fn next_year(self) -> Self {
        Self::new(self.year() + 1, 1).unwrap_or(self)
    }

    /// January of the preceding year.
    pub fn prev_year(self) -> Self {
        Self::new(self.year() - 1, 1).unwrap_or(self)
    }

    pub fn days_in_month(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|day| self.first.with_day(*day).is_some())
            .unwrap_or(28)
    }

    /// Empty cells before the 1st in a Sunday-first grid.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Date of `day` (1-based) in this month.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Full month name, e.g. `October`.
    pub fn month_name(&self) -> String {
        self.first.format("%B").to_string()
    }

    /// Month view heading, e.g. `October 2026`.
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

/// Navigation state of the calendar screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarState {
    pub view: ViewMode,
    pub cursor: MonthCursor,
}

impl CalendarState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            view: ViewMode::Month,
            cursor: MonthCursor::from_date(today),
        }
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    pub fn next(&mut self) {
        self.cursor = match self.view {
            ViewMode::Month => self.cursor.next_month(),
            ViewMode::Year => self.cursor.next_year(),
        };
    }

    pub fn prev(&mut self) {
        self.cursor = match self.view {
            ViewMode::Month => self.cursor.prev_month(),
            ViewMode::Year => self.cursor.prev_year(),
        };
    }

    /// Clicking a month in year view opens that month.
    pub fn open_month(&mut self, month: u32) {
        if let Some(cursor) = MonthCursor::new(self.cursor.year(), month) {
            self.cursor = cursor;
            self.view = ViewMode::Month;
        }
    }

    /// Label for the highlights export of the current view.
    pub fn highlights_title(&self) -> String {
        match self.view {
            ViewMode::Month => self.cursor.title(),
            ViewMode::Year => format!("{} Recap", self.cursor.year()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CalendarState, MonthCursor, ViewMode};
    use chrono::NaiveDate;

    #[test]
    fn december_advances_to_january_of_next_year() {
        let cursor = MonthCursor::new(2025, 12).unwrap().next_month();
        assert_eq!((cursor.year(), cursor.month()), (2026, 1));
    }

    #[test]
    fn january_retreats_to_december_of_previous_year() {
        let cursor = MonthCursor::new(2025, 1).unwrap().prev_month();
        assert_eq!((cursor.year(), cursor.month()), (2024, 12));
    }

    #[test]
    fn days_and_blanks_follow_calendar() {
        let feb_leap = MonthCursor::new(2024, 2).unwrap();
        assert_eq!(feb_leap.days_in_month(), 29);
        let feb = MonthCursor::new(2025, 2).unwrap();
        assert_eq!(feb.days_in_month(), 28);
        // 2026-10-01 is a Thursday.
        let october = MonthCursor::new(2026, 10).unwrap();
        assert_eq!(october.leading_blanks(), 4);
        assert_eq!(october.days_in_month(), 31);
        assert_eq!(october.title(), "October 2026");
    }

    #[test]
    fn year_view_navigation_lands_on_january() {
        let mut state = CalendarState::new(NaiveDate::from_ymd_opt(2026, 7, 19).unwrap());
        state.set_view(ViewMode::Year);
        state.next();
        assert_eq!((state.cursor.year(), state.cursor.month()), (2027, 1));
        state.prev();
        state.prev();
        assert_eq!((state.cursor.year(), state.cursor.month()), (2025, 1));
        assert_eq!(state.highlights_title(), "2025 Recap");

        state.open_month(3);
        assert_eq!(state.view, ViewMode::Month);
        assert_eq!(state.highlights_title(), "March 2025");
    }
}
