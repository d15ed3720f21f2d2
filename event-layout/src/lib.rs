mod booking;
mod colors;
mod month;
mod normalize;
mod packing;
mod structs;
mod summary;

#[cfg(feature = "ics")]
mod ics;

pub use booking::{Booking, BookingError, BookingRequest, EventStatus};
pub use colors::{assign_colors, FALLBACK_COLOR, PALETTE};
pub use month::{AgendaEntry, CalendarMonth, DayCell, MonthView};
pub use normalize::{normalize_event, normalize_events, UNKNOWN_LOCATION};
pub use packing::{compute_layout, layout_records};
pub use structs::{
    DaySlotMap, EventInstant, EventRecord, Layout, LocationColorMap, OccupancySegment, RawEvent,
    SegmentKind,
};
pub use summary::StatusSummary;
