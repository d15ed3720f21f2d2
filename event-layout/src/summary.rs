use chrono::{NaiveDateTime, TimeDelta};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{Booking, EventStatus};

const UPCOMING_DAYS: i64 = 7;

/// Event counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StatusSummary {
    pub total: usize,
    /// Events starting within the next seven days, any status.
    pub upcoming: usize,
    pub pending: usize,
    pub approved: usize,
    pub declined: usize,
}

impl StatusSummary {
    pub fn from_bookings<'a, I>(bookings: I, now: NaiveDateTime) -> Self
    where
        I: IntoIterator<Item = &'a Booking>,
    {
        let horizon = TimeDelta::try_days(UPCOMING_DAYS)
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(NaiveDateTime::MAX);

        bookings.into_iter().fold(Self::default(), |mut summary, booking| {
            summary.total += 1;
            if (now..=horizon).contains(&booking.start) {
                summary.upcoming += 1;
            }
            match booking.status {
                EventStatus::Pending => summary.pending += 1,
                EventStatus::Approved => summary.approved += 1,
                EventStatus::Declined => summary.declined += 1,
            }
            summary
        })
    }
}
