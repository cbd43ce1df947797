//! Holiday calendar grouped by month

use campus_api::Holiday;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct HolidayEntry {
    pub name: String,
    pub kind: String,
    pub date: NaiveDate,
}

impl HolidayEntry {
    /// e.g. `Oct 02`
    pub fn display_date(&self) -> String {
        self.date.format("%b %d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup {
    /// e.g. `October 2025`
    pub label: String,
    pub entries: Vec<HolidayEntry>,
}

/// Group holidays into months in calendar order, each month sorted by date
pub fn group_by_month(holidays: &[Holiday]) -> Vec<MonthGroup> {
    let mut months: BTreeMap<(i32, u32), Vec<HolidayEntry>> = BTreeMap::new();

    for holiday in holidays {
        months
            .entry((holiday.date.year(), holiday.date.month()))
            .or_default()
            .push(HolidayEntry {
                name: holiday.name.clone(),
                kind: holiday.kind.clone(),
                date: holiday.date,
            });
    }

    months
        .into_values()
        .map(|mut entries| {
            entries.sort_by_key(|e| e.date);
            MonthGroup {
                label: entries[0].date.format("%B %Y").to_string(),
                entries,
            }
        })
        .collect()
}
