use std::cmp::Ordering;

use log::debug;

use crate::{
    assign_colors, normalize_events, DaySlotMap, EventRecord, Layout, OccupancySegment, RawEvent,
    SegmentKind,
};

/// Blank label that still takes up the width of a label.
const PLACEHOLDER_LABEL: &str = "\u{a0}";

/// Normalizes the source rows and lays them out. Rows without a readable
/// start are dropped.
pub fn compute_layout<I>(rows: I) -> Layout
where
    I: IntoIterator<Item = RawEvent>,
{
    layout_records(normalize_events(rows))
}

/// Assigns every event the lowest lane that is free on all days of its
/// span, in placement order.
pub fn layout_records(mut events: Vec<EventRecord>) -> Layout {
    let colors = assign_colors(&events);
    events.sort_by(placement_order);

    let mut slots = DaySlotMap::default();
    for event in &events {
        let lane = first_free_lane(&slots, event);
        let color = colors.color_of(&event.location);
        let tooltip = format!("{} @ {}", event.name, event.location);
        let span = event.days().count();

        for (index, day) in event.days().enumerate() {
            let kind = segment_kind(index, span);
            let label = match kind {
                SegmentKind::SingleDay | SegmentKind::RangeStart => event.location.clone(),
                SegmentKind::RangeMiddle => PLACEHOLDER_LABEL.to_string(),
                SegmentKind::RangeEnd => String::new(),
            };

            slots.occupy(
                day,
                lane,
                OccupancySegment {
                    color,
                    tooltip: tooltip.clone(),
                    kind,
                    label,
                },
            );
        }
    }

    debug!(
        "Laid out {} events over {} days with {} locations",
        events.len(),
        slots.len(),
        colors.len()
    );

    Layout {
        slots,
        colors,
        events,
    }
}

/// Earlier start first, then longer events first. Remaining ties are
/// broken on the record contents so that input order only matters for
/// identical records.
fn placement_order(a: &EventRecord, b: &EventRecord) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.duration().cmp(&a.duration()))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.location.cmp(&b.location))
        .then_with(|| a.start_instant.cmp(&b.start_instant))
        .then_with(|| a.end_instant.cmp(&b.end_instant))
        .then_with(|| a.description.cmp(&b.description))
}

fn first_free_lane(slots: &DaySlotMap, event: &EventRecord) -> usize {
    let mut lane = 0;
    while event.days().any(|day| slots.is_occupied(day, lane)) {
        lane += 1;
    }
    lane
}

fn segment_kind(index: usize, span: usize) -> SegmentKind {
    match index {
        _ if span == 1 => SegmentKind::SingleDay,
        0 => SegmentKind::RangeStart,
        i if i + 1 == span => SegmentKind::RangeEnd,
        _ => SegmentKind::RangeMiddle,
    }
}
