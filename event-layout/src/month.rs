use chrono::{Datelike, Months, NaiveDate};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{EventRecord, Layout, LocationColorMap, OccupancySegment};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month, passed explicitly to whatever renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth(NaiveDate);

impl CalendarMonth {
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self(date - chrono::Days::new(u64::from(date.day0())))
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        MONTH_NAMES[self.0.month0() as usize]
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.0.checked_sub_months(Months::new(1)).map(Self)
    }

    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.days().last().unwrap_or(self.0)
    }

    #[must_use]
    pub fn len_days(self) -> u32 {
        self.last_day().day()
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let month = self.month();
        self.0.iter_days().take_while(move |day| day.month() == month)
    }

    /// Monday-first weeks covering the month. Days of the neighbouring
    /// months are `None`.
    #[must_use]
    pub fn weeks(self) -> Vec<[Option<NaiveDate>; 7]> {
        let mut weeks = Vec::new();
        let mut week = [None; 7];
        let mut column = self.0.weekday().num_days_from_monday() as usize;

        for day in self.days() {
            week[column] = Some(day);
            column += 1;
            if column == 7 {
                weeks.push(week);
                week = [None; 7];
                column = 0;
            }
        }

        if column > 0 {
            weeks.push(week);
        }

        weeks
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// Dense lanes from 0; `None` marks a spacer.
    pub lanes: Vec<Option<&'a OccupancySegment>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AgendaEntry<'a> {
    pub event: &'a EventRecord,
    pub color: &'static str,
}

/// Everything needed to draw one month of a [`Layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MonthView<'a> {
    pub year: i32,
    pub month: u32,
    pub name: &'static str,
    pub weeks: Vec<[Option<DayCell<'a>>; 7]>,
    pub legend: &'a LocationColorMap,
    /// Events starting in the month, by start time.
    pub agenda: Vec<AgendaEntry<'a>>,
}

impl<'a> MonthView<'a> {
    #[must_use]
    pub fn build(layout: &'a Layout, month: CalendarMonth) -> Self {
        let weeks = month
            .weeks()
            .into_iter()
            .map(|week| {
                week.map(|day| {
                    day.map(|date| DayCell {
                        date,
                        lanes: layout.slots.lanes_on(date),
                    })
                })
            })
            .collect();

        let mut agenda = layout
            .events
            .iter()
            .filter(|event| month.contains(event.start))
            .map(|event| AgendaEntry {
                event,
                color: layout.colors.color_of(&event.location),
            })
            .collect::<Vec<_>>();
        agenda.sort_by_key(|entry| entry.event.start_instant);

        Self {
            year: month.year(),
            month: month.month(),
            name: month.name(),
            weeks,
            legend: &layout.colors,
            agenda,
        }
    }
}
