use ics::properties::{Description, DtEnd, DtStart, Location, Summary};

use crate::{EventRecord, Layout};

const ICS_TIMESTAMP: &str = "%Y%m%dT%H%M%S";

impl Layout {
    /// All laid out events as one calendar, in placement order.
    #[must_use]
    pub fn to_ics<'a>(&'a self, name: &'a str) -> ics::ICalendar<'a> {
        let mut icalendar = ics::ICalendar::new("2.0", name);

        for event in &self.events {
            icalendar.add_event(event.to_ics());
        }

        icalendar
    }
}

impl EventRecord {
    #[must_use]
    pub fn to_ics(&self) -> ics::Event<'_> {
        let start = self.start_instant.format(ICS_TIMESTAMP).to_string();
        let end = self.end_instant.format(ICS_TIMESTAMP).to_string();

        let id = format!("{}_{}", start, self.name.replace(' ', "-"));

        let mut ics_event = ics::Event::new(id, start.clone());

        ics_event.push(DtStart::new(start));
        ics_event.push(DtEnd::new(end));
        ics_event.push(Summary::new(&self.name));
        ics_event.push(Location::new(&self.location));

        if !self.description.is_empty() {
            ics_event.push(Description::new(&self.description));
        }

        ics_event
    }
}
