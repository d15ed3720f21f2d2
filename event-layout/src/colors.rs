use std::collections::BTreeSet;

use crate::{EventRecord, LocationColorMap};

pub const PALETTE: [&str; 7] = [
    "#3788d8", "#28a745", "#6f42c1", "#fd7e14", "#e83e8c", "#d9534f", "#008b8b",
];

/// Color for locations that are absent from a [`LocationColorMap`].
pub const FALLBACK_COLOR: &str = "#555";

/// Gives every distinct location a palette color by its position in
/// alphabetical order. Past seven locations the palette wraps around.
pub fn assign_colors<'a, I>(events: I) -> LocationColorMap
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    events
        .into_iter()
        .map(|event| event.location.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .zip(PALETTE.iter().cycle())
        .map(|(location, color)| (location.to_string(), *color))
        .collect()
}
