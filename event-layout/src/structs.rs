use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

#[cfg(feature = "serde")]
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::colors::FALLBACK_COLOR;

/// A start or end value as handed over by the event source, which may
/// carry only a date, a full timestamp, or text still to be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum EventInstant {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Text(String),
}

/// One approved event row from the event source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawEvent {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start: Option<EventInstant>,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "or_none"))]
    pub end: Option<EventInstant>,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "or_none"))]
    pub location: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "or_none"))]
    pub description: Option<String>,
}

/// Reads an optional field, turning a value of the wrong shape into `None`
/// instead of failing the whole row.
#[cfg(feature = "serde")]
fn or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Value(T),
        Other(IgnoredAny),
    }

    match Option::<Lenient<T>>::deserialize(deserializer)? {
        Some(Lenient::Value(value)) => Ok(Some(value)),
        Some(Lenient::Other(_)) | None => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventRecord {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub start_instant: NaiveDateTime,
    pub end_instant: NaiveDateTime,
    pub location: String,
    pub description: String,
}

impl EventRecord {
    /// Number of calendar days the event covers, counting both ends.
    ///
    /// An end date before the start date counts as a single day.
    #[must_use]
    pub fn duration(&self) -> i64 {
        (self.end - self.start).num_days().max(0) + 1
    }

    /// Every day of the inclusive span, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let span = usize::try_from(self.duration()).unwrap_or(1);
        self.start.iter_days().take(span)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SegmentKind {
    SingleDay,
    RangeStart,
    RangeMiddle,
    RangeEnd,
}

/// What a single lane of a single day shows for the event occupying it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OccupancySegment {
    pub color: &'static str,
    pub tooltip: String,
    pub kind: SegmentKind,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DaySlotMap(BTreeMap<NaiveDate, BTreeMap<usize, OccupancySegment>>);

impl DaySlotMap {
    /// Occupied lanes of `date` in lane order.
    pub fn segments_on(&self, date: NaiveDate) -> impl Iterator<Item = (usize, &OccupancySegment)> {
        self.0
            .get(&date)
            .into_iter()
            .flat_map(|lanes| lanes.iter().map(|(lane, segment)| (*lane, segment)))
    }

    #[must_use]
    pub fn segment(&self, date: NaiveDate, lane: usize) -> Option<&OccupancySegment> {
        self.0.get(&date)?.get(&lane)
    }

    #[must_use]
    pub fn is_occupied(&self, date: NaiveDate, lane: usize) -> bool {
        self.segment(date, lane).is_some()
    }

    /// One past the highest occupied lane of `date`, or zero for a free day.
    #[must_use]
    pub fn lane_count(&self, date: NaiveDate) -> usize {
        self.0
            .get(&date)
            .and_then(|lanes| lanes.keys().next_back())
            .map_or(0, |lane| lane + 1)
    }

    /// Lanes `0..lane_count(date)` of `date`, with `None` standing in for
    /// the free lanes below the highest occupied one.
    #[must_use]
    pub fn lanes_on(&self, date: NaiveDate) -> Vec<Option<&OccupancySegment>> {
        (0..self.lane_count(date))
            .map(|lane| self.segment(date, lane))
            .collect()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.keys().copied()
    }

    /// Number of days with at least one occupied lane.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn occupy(&mut self, date: NaiveDate, lane: usize, segment: OccupancySegment) {
        self.0.entry(date).or_default().insert(lane, segment);
    }
}

/// Location name to display color, iterated in alphabetical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LocationColorMap(BTreeMap<String, &'static str>);

impl LocationColorMap {
    #[must_use]
    pub fn get(&self, location: &str) -> Option<&'static str> {
        self.0.get(location).copied()
    }

    /// The assigned color of `location`, or [`FALLBACK_COLOR`] for a
    /// location that was not part of the computation.
    #[must_use]
    pub fn color_of(&self, location: &str) -> &'static str {
        self.get(location).unwrap_or(FALLBACK_COLOR)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.0
            .iter()
            .map(|(location, color)| (location.as_str(), *color))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, &'static str)> for LocationColorMap {
    fn from_iter<I: IntoIterator<Item = (String, &'static str)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of a layout computation.
///
/// `events` holds the normalized records in placement order, which is
/// chronological by start date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Layout {
    pub slots: DaySlotMap,
    pub colors: LocationColorMap,
    pub events: Vec<EventRecord>,
}
