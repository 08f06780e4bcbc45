//! Utilities to compare custom types
//!
//! These can be used to sort results, e.g. with `Vec::sort_by`

use std::cmp::Ordering;

use chrono::NaiveTime;

use crate::event::Event;

/// Compare times of day, where `None` ("all day") comes after every actual time
pub fn compare_optional_times(left: Option<NaiveTime>, right: Option<NaiveTime>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => l.cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare events by date, then by time (timeless events last)
pub fn compare_events_by_date_and_time(left: &Event, right: &Event) -> Ordering {
    left.date().cmp(&right.date())
        .then_with(|| compare_optional_times(left.time(), right.time()))
}

/// Compare events by date, then by time (timeless events last), then alphabetically
pub fn compare_events_chronologically(left: &Event, right: &Event) -> Ordering {
    compare_events_by_date_and_time(left, right)
        .then_with(|| Ord::cmp(&left.title().to_lowercase(), &right.title().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::event::{EventKind, SourceTag};

    fn event(title: &str, day: u32, time: Option<(u32, u32)>) -> Event {
        let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        Event::new(title.to_string(), date, EventKind::Study, SourceTag::Task)
            .with_time(time.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)))
    }

    #[test]
    fn chronological_order() {
        let mut events = vec![
            event("b, all day", 10, None),
            event("late", 10, Some((18, 0))),
            event("next day", 11, Some((7, 0))),
            event("a, all day", 10, None),
            event("early", 10, Some((8, 30))),
        ];
        events.sort_by(compare_events_chronologically);

        let titles: Vec<&str> = events.iter().map(|e| e.title()).collect();
        assert_eq!(titles, vec!["early", "late", "a, all day", "b, all day", "next day"]);
    }
}
