//! Timetable grid

use campus_api::{Schedule, TimetableSlot, Weekday};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell<'a> {
    Class(&'a TimetableSlot),
    Free,
    /// The day has no entry at this time
    Empty,
}

/// Minutes since midnight of a label's start time, e.g. `9:00-10:00` is 540
fn start_minutes(label: &str) -> Option<u32> {
    let start = label.split(['-', ' ']).next()?.trim();
    let (hours, minutes) = start.split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().get(..2).unwrap_or(minutes).parse().ok()?;
    Some(hours * 60 + minutes)
}

/// Monday to Saturday against every time label, ordered by start time
#[derive(Debug, Clone)]
pub struct TimetableGrid {
    schedule: Schedule,
    times: Vec<String>,
}

impl TimetableGrid {
    pub fn new(schedule: Schedule) -> Self {
        let labels: BTreeSet<&String> = Weekday::TEACHING
            .iter()
            .filter_map(|day| schedule.get(day))
            .flat_map(|day| day.keys())
            .collect();

        let mut times: Vec<String> = labels.into_iter().cloned().collect();
        times.sort_by(|a, b| {
            start_minutes(a)
                .unwrap_or(u32::MAX)
                .cmp(&start_minutes(b).unwrap_or(u32::MAX))
                .then_with(|| a.cmp(b))
        });

        Self { schedule, times }
    }

    pub fn days(&self) -> &'static [Weekday] {
        &Weekday::TEACHING
    }

    pub fn times(&self) -> &[String] {
        &self.times
    }

    pub fn cell(&self, day: Weekday, time: &str) -> Cell<'_> {
        match self.schedule.get(&day).and_then(|d| d.get(time)) {
            Some(Some(slot)) => Cell::Class(slot),
            Some(None) => Cell::Free,
            None => Cell::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_api::DaySchedule;

    fn slot(subject: &str) -> Option<TimetableSlot> {
        Some(TimetableSlot {
            subject: subject.to_string(),
            teacher: "Rao".to_string(),
        })
    }

    #[test]
    fn test_start_minutes() {
        assert_eq!(start_minutes("9:00-10:00"), Some(540));
        assert_eq!(start_minutes("10:30 - 11:30"), Some(630));
        assert_eq!(start_minutes("Lunch"), None);
    }

    #[test]
    fn test_grid_orders_times_numerically() {
        let mut monday = DaySchedule::new();
        monday.insert("10:00-11:00".into(), slot("Maths"));
        monday.insert("9:00-10:00".into(), slot("DSA"));
        let mut tuesday = DaySchedule::new();
        tuesday.insert("11:00-12:00".into(), None);

        let mut schedule = Schedule::new();
        schedule.insert(Weekday::Monday, monday);
        schedule.insert(Weekday::Tuesday, tuesday);

        let grid = TimetableGrid::new(schedule);
        assert_eq!(grid.times(), &["9:00-10:00", "10:00-11:00", "11:00-12:00"]);
        assert!(matches!(
            grid.cell(Weekday::Monday, "9:00-10:00"),
            Cell::Class(s) if s.subject == "DSA"
        ));
        assert_eq!(grid.cell(Weekday::Tuesday, "11:00-12:00"), Cell::Free);
        assert_eq!(grid.cell(Weekday::Saturday, "9:00-10:00"), Cell::Empty);
        assert_eq!(grid.days().len(), 6);
    }
}
