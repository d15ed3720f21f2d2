use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("End {end} is before start {start}")]
    EndBeforeStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("'{location}' is already booked for this time slot")]
    Conflict { location: String },

    #[error("Unknown event status: {0}")]
    UnknownStatus(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventStatus {
    Pending,
    Approved,
    Declined,
}

impl EventStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Declined => "Declined",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Pending, Self::Approved, Self::Declined]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BookingError::UnknownStatus(s.to_string()))
    }
}

/// An event already on the books, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Booking {
    pub location: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: EventStatus,
}

/// A new event request for a location, checked before it is filed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    location: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl BookingRequest {
    pub fn new(
        location: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, BookingError> {
        if end < start {
            return Err(BookingError::EndBeforeStart { start, end });
        }

        Ok(Self {
            location: location.into(),
            start,
            end,
        })
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Bookings of the same location that are not declined and overlap the
    /// requested interval. Intervals that only touch do not overlap.
    pub fn conflicts<'a>(&'a self, bookings: &'a [Booking]) -> impl Iterator<Item = &'a Booking> {
        bookings.iter().filter(move |booking| {
            booking.location == self.location
                && booking.status != EventStatus::Declined
                && booking.start < self.end
                && booking.end > self.start
        })
    }

    pub fn check(&self, bookings: &[Booking]) -> Result<(), BookingError> {
        match self.conflicts(bookings).next() {
            Some(_) => Err(BookingError::Conflict {
                location: self.location.clone(),
            }),
            None => Ok(()),
        }
    }
}
