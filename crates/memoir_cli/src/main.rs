//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `memoir_core` linkage.
//! - Print the current month grid as a quick calendar sanity check.

use chrono::{Datelike, Local};
use memoir_core::calendar::{month_grid, DayCell, WEEKDAY_LABELS};
use memoir_core::MonthCursor;

fn main() {
    println!("memoir_core ping={}", memoir_core::ping());
    println!("memoir_core version={}", memoir_core::core_version());

    let cursor = MonthCursor::from_date(Local::now().date_naive());
    let grid = month_grid(cursor, &[]);
    println!();
    println!("{:^27}", cursor.title());
    println!("{}", WEEKDAY_LABELS.join(" "));
    for week in grid.weeks() {
        let row: Vec<String> = week.iter().map(render_cell).collect();
        println!("{}", row.join(" "));
    }
}

fn render_cell(cell: &DayCell<'_>) -> String {
    match cell {
        DayCell::Blank => "   ".to_string(),
        DayCell::Day { date, .. } => format!("{:>3}", date.day()),
    }
}
