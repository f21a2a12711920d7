use chrono::NaiveDate;
use memoir_core::calendar::{
    month_grid, resolve_day, year_grid, DayCell, DaySelection, WEEKDAY_LABELS,
};
use memoir_core::db::open_db_in_memory;
use memoir_core::{
    CalendarState, Entry, EntryListQuery, EntryRepository, Mood, MonthCursor,
    SqliteEntryRepository, ViewMode,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stored_entries(days: &[(NaiveDate, Mood)]) -> Vec<Entry> {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    for (day, mood) in days {
        let mut entry = Entry::new("u1", *day, 0);
        entry.mood = *mood;
        repo.upsert_entry(&entry).unwrap();
    }
    repo.list_entries(&EntryListQuery::for_user("u1")).unwrap()
}

#[test]
fn month_navigation_wraps_year_boundaries_one_step_at_a_time() {
    let mut state = CalendarState::new(date(2026, 12, 18));
    state.next();
    assert_eq!((state.cursor.year(), state.cursor.month()), (2027, 1));
    state.prev();
    state.prev();
    assert_eq!((state.cursor.year(), state.cursor.month()), (2026, 11));

    let mut january = CalendarState::new(date(2026, 1, 31));
    january.prev();
    assert_eq!(january.cursor.title(), "December 2025");
}

#[test]
fn year_view_steps_whole_years_and_opens_months() {
    let mut state = CalendarState::new(date(2026, 10, 19));
    state.set_view(ViewMode::Year);
    assert_eq!(state.highlights_title(), "2026 Recap");

    state.next();
    assert_eq!((state.cursor.year(), state.cursor.month()), (2027, 1));
    state.prev();
    state.prev();
    assert_eq!(state.cursor.year(), 2025);

    state.open_month(3);
    assert_eq!(state.view, ViewMode::Month);
    assert_eq!(state.highlights_title(), "March 2025");

    state.open_month(13);
    assert_eq!(state.cursor.month(), 3);
}

#[test]
fn leading_blanks_and_lengths_follow_the_calendar() {
    let feb_2026 = MonthCursor::new(2026, 2).unwrap();
    assert_eq!(feb_2026.leading_blanks(), 0);
    assert_eq!(feb_2026.days_in_month(), 28);

    let feb_2024 = MonthCursor::new(2024, 2).unwrap();
    assert_eq!(feb_2024.days_in_month(), 29);

    let dec_2025 = MonthCursor::new(2025, 12).unwrap();
    assert_eq!(dec_2025.leading_blanks(), 1);
    assert_eq!(dec_2025.days_in_month(), 31);

    assert_eq!(WEEKDAY_LABELS[0], "Sun");
    assert_eq!(WEEKDAY_LABELS[6], "Sat");
}

#[test]
fn month_grid_resolves_each_day_to_at_most_one_stored_entry() {
    let entries = stored_entries(&[
        (date(2026, 10, 5), Mood::Calm),
        (date(2026, 10, 31), Mood::Cozy),
        (date(2026, 11, 1), Mood::Happy),
    ]);
    let cursor = MonthCursor::new(2026, 10).unwrap();
    let grid = month_grid(cursor, &entries);

    assert_eq!(grid.cells.len(), 4 + 31);
    assert_eq!(grid.entry_count(), 2);
    assert!(grid.cells[..4].iter().all(|cell| *cell == DayCell::Blank));
    match grid.cells[4 + 4] {
        DayCell::Day { date: day, entry } => {
            assert_eq!(day, date(2026, 10, 5));
            assert_eq!(entry.map(|entry| entry.mood), Some(Mood::Calm));
        }
        DayCell::Blank => panic!("expected day cell"),
    }
    assert_eq!(grid.weeks().count(), 5);
}

#[test]
fn clicking_a_day_opens_existing_or_new() {
    let entries = stored_entries(&[(date(2026, 10, 5), Mood::Happy)]);
    let cursor = MonthCursor::new(2026, 10).unwrap();

    assert!(matches!(
        resolve_day(cursor, 5, &entries),
        Some(DaySelection::Existing(entry)) if entry.date == date(2026, 10, 5)
    ));
    assert_eq!(
        resolve_day(cursor, 6, &entries),
        Some(DaySelection::New(date(2026, 10, 6)))
    );
    assert_eq!(resolve_day(cursor, 32, &entries), None);
}

#[test]
fn year_grid_summarizes_every_month() {
    let entries = stored_entries(&[
        (date(2026, 1, 1), Mood::Energetic),
        (date(2026, 1, 9), Mood::Calm),
        (date(2026, 7, 4), Mood::Happy),
        (date(2025, 7, 4), Mood::Happy),
    ]);
    let grid = year_grid(2026, &entries).unwrap();

    assert_eq!(grid.months.len(), 12);
    assert_eq!(grid.months[0].entry_count, 2);
    assert_eq!(grid.months[0].leading_blanks, 4);
    assert_eq!(grid.months[0].day_moods[0], Some(Mood::Energetic));
    assert_eq!(grid.months[0].day_moods[1], None);
    assert_eq!(grid.months[6].entry_count, 1);
    let total: usize = grid.months.iter().map(|month| month.entry_count).sum();
    assert_eq!(total, 3);
}
