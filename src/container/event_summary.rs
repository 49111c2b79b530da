use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::QName;

use super::error::ParsedNameOrBytes;

use std::fmt;

/// Owned description of an xml event, kept for error messages after the read buffer is reused
#[derive(Debug)]
pub(crate) struct EventSummary {
    name: Option<ParsedNameOrBytes>,
    e_type: &'static str,
}

impl fmt::Display for EventSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "element {name} with type {}", self.e_type),
            None => write!(f, "unnamed event with type {}", self.e_type),
        }
    }
}

impl EventSummary {
    pub(crate) fn new(e: &Event) -> Self {
        Self {
            name: e.event_name(),
            e_type: event_type(e),
        }
    }

    pub(crate) fn eof() -> Self {
        Self {
            name: None,
            e_type: "eof",
        }
    }

    pub(crate) fn start(bytes: &BytesStart<'_>) -> Self {
        Self {
            name: Some(ParsedNameOrBytes::from(bytes.name())),
            e_type: "start",
        }
    }

    pub(crate) fn end(bytes: &BytesEnd<'_>) -> Self {
        Self {
            name: Some(ParsedNameOrBytes::from(bytes.name())),
            e_type: "end",
        }
    }
}

pub(crate) trait ElementName {
    fn event_name(&self) -> Option<ParsedNameOrBytes>;
    fn byte_name(&self) -> Option<QName<'_>>;
}

impl ElementName for Event<'_> {
    fn event_name(&self) -> Option<ParsedNameOrBytes> {
        self.byte_name().map(ParsedNameOrBytes::from)
    }

    fn byte_name(&self) -> Option<QName<'_>> {
        match &self {
            Event::Start(s) | Event::Empty(s) => Some(s.name()),
            Event::End(e) => Some(e.name()),
            _ => None,
        }
    }
}

fn event_type(event: &Event) -> &'static str {
    match event {
        Event::Start(_) => "start",
        Event::End(_) => "end",
        Event::Empty(_) => "empty",
        Event::Text(_) => "text",
        Event::Comment(_) => "comment",
        Event::CData(_) => "cdata",
        Event::Decl(_) => "decl",
        Event::PI(_) => "pi",
        Event::DocType(_) => "doctype",
        Event::Eof => "eof",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_names_start_elements() {
        let start = BytesStart::new("DataArray");
        let summary = EventSummary::new(&Event::Start(start));

        assert_eq!(summary.to_string(), "element DataArray with type start");
        assert_eq!(EventSummary::eof().to_string(), "unnamed event with type eof");
    }
}
