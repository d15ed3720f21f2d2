use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

use crate::{EventInstant, EventRecord, RawEvent};

pub const UNKNOWN_LOCATION: &str = "Unknown";

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

impl EventInstant {
    /// The calendar day and the full timestamp this value stands for.
    /// Date-only values are taken to mean midnight.
    #[must_use]
    pub fn resolve(&self) -> Option<(NaiveDate, NaiveDateTime)> {
        match self {
            Self::DateTime(instant) => Some((instant.date(), *instant)),
            Self::Date(date) => at_midnight(*date),
            Self::Text(text) => parse_text(text.trim()),
        }
    }
}

fn at_midnight(date: NaiveDate) -> Option<(NaiveDate, NaiveDateTime)> {
    Some((date, date.and_hms_opt(0, 0, 0)?))
}

fn parse_text(text: &str) -> Option<(NaiveDate, NaiveDateTime)> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|instant| (instant.date(), instant))
        .or_else(|| at_midnight(NaiveDate::parse_from_str(text, DATE_FORMAT).ok()?))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Turns a source row into an [`EventRecord`].
///
/// Returns `None` when the start value is missing or cannot be read as a
/// date. A missing or unreadable end falls back to the start.
pub fn normalize_event(raw: RawEvent) -> Option<EventRecord> {
    let Some((start, start_instant)) = raw.start.as_ref().and_then(EventInstant::resolve) else {
        debug!("Skipping event {:?} without a readable start", raw.name);
        return None;
    };

    let (end, end_instant) = raw
        .end
        .as_ref()
        .and_then(EventInstant::resolve)
        .unwrap_or((start, start_instant));

    Some(EventRecord {
        name: raw.name,
        start,
        end,
        start_instant,
        end_instant,
        location: non_empty(raw.location).unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        description: raw.description.unwrap_or_default(),
    })
}

pub fn normalize_events<I>(rows: I) -> Vec<EventRecord>
where
    I: IntoIterator<Item = RawEvent>,
{
    rows.into_iter().filter_map(normalize_event).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn raw(start: Option<EventInstant>, end: Option<EventInstant>) -> RawEvent {
        RawEvent {
            name: "Orientation".into(),
            start,
            end,
            location: Some("Hall".into()),
            description: None,
        }
    }

    #[test]
    fn date_start_means_midnight() {
        let event = normalize_event(raw(Some(EventInstant::Date(date(4))), None)).unwrap();

        assert_eq!(event.start, date(4));
        assert_eq!(event.start_instant, date(4).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(event.end, event.start);
        assert_eq!(event.end_instant, event.start_instant);
        assert_eq!(event.duration(), 1);
    }

    #[test]
    fn date_time_keeps_time_of_day() {
        let start = date(4).and_hms_opt(9, 30, 0).unwrap();
        let end = date(6).and_hms_opt(8, 0, 0).unwrap();
        let event = normalize_event(raw(
            Some(EventInstant::DateTime(start)),
            Some(EventInstant::DateTime(end)),
        ))
        .unwrap();

        assert_eq!(event.start_instant, start);
        assert_eq!(event.end_instant, end);
        assert_eq!(event.end, date(6));
        assert_eq!(event.duration(), 3);
    }

    #[test]
    fn mixed_date_and_date_time() {
        let start = date(1).and_hms_opt(23, 0, 0).unwrap();
        let event = normalize_event(raw(
            Some(EventInstant::DateTime(start)),
            Some(EventInstant::Date(date(2))),
        ))
        .unwrap();

        assert_eq!(event.duration(), 2);
        assert_eq!(event.end_instant, date(2).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn text_values_are_parsed() {
        let event = normalize_event(raw(
            Some(EventInstant::Text(" 2025-03-04 09:15:00 ".into())),
            Some(EventInstant::Text("2025-03-05".into())),
        ))
        .unwrap();

        assert_eq!(event.start_instant, date(4).and_hms_opt(9, 15, 0).unwrap());
        assert_eq!(event.end, date(5));

        let event = normalize_event(raw(Some(EventInstant::Text("2025-03-04T18:45".into())), None))
            .unwrap();
        assert_eq!(event.start_instant, date(4).and_hms_opt(18, 45, 0).unwrap());
    }

    #[test]
    fn unreadable_or_missing_start_is_skipped() {
        assert!(normalize_event(raw(None, None)).is_none());
        assert!(normalize_event(raw(Some(EventInstant::Text("next week".into())), None)).is_none());
        assert!(normalize_event(raw(Some(EventInstant::Text("2025-02-30".into())), None)).is_none());
    }

    #[test]
    fn unreadable_end_falls_back_to_start() {
        let event = normalize_event(raw(
            Some(EventInstant::Date(date(9))),
            Some(EventInstant::Text("tbd".into())),
        ))
        .unwrap();

        assert_eq!(event.end, date(9));
    }

    #[test]
    fn missing_location_and_description_get_defaults() {
        let mut row = raw(Some(EventInstant::Date(date(9))), None);
        row.location = None;
        assert_eq!(normalize_event(row.clone()).unwrap().location, UNKNOWN_LOCATION);

        row.location = Some(String::new());
        let event = normalize_event(row).unwrap();
        assert_eq!(event.location, UNKNOWN_LOCATION);
        assert_eq!(event.description, "");
    }

    #[test]
    fn bad_rows_do_not_abort_the_batch() {
        let rows = vec![
            raw(Some(EventInstant::Date(date(1))), None),
            raw(Some(EventInstant::Text("??".into())), None),
            raw(Some(EventInstant::Date(date(2))), None),
        ];

        let events = normalize_events(rows);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].start, date(2));
    }
}
