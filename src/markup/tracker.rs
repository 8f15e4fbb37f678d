use std::str::Utf8Error;

use super::document::MarkupDocument;
use super::parser::MarkupParser;

/// What changed between two parses of a streaming buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDelta {
    pub header_changed: bool,     // Title or subtitle differs from the last parse
    pub new_sections: Vec<usize>, // Indexes of sections not seen before
    pub changed_sections: Vec<usize>,
}

impl DocumentDelta {
    pub fn is_empty(&self) -> bool {
        !self.header_changed && self.new_sections.is_empty() && self.changed_sections.is_empty()
    }
}

/// Re-parses a growing buffer and reports what changed since the last call.
///
/// The parser stays stateless; this only remembers the previous result so a
/// renderer can redraw just the sections that are new.
#[derive(Debug, Clone, Default)]
pub struct DocumentTracker {
    parser: MarkupParser,
    last: Option<MarkupDocument>,
}

impl DocumentTracker {
    pub fn new(parser: MarkupParser) -> Self {
        Self { parser, last: None }
    }

    pub fn document(&self) -> Option<&MarkupDocument> {
        self.last.as_ref()
    }

    pub fn update(&mut self, buffer: &str) -> DocumentDelta {
        let next = self.parser.parse(buffer);
        let delta = diff(self.last.as_ref(), next.as_ref());
        self.last = next;
        delta
    }
}

/// Longest prefix of a growing byte buffer that is complete UTF-8.
///
/// A multi-byte character cut off at the end is held back for the next chunk.
/// A byte sequence that can never become valid is an error.
pub fn complete_utf8_prefix(bytes: &[u8]) -> Result<&str, Utf8Error> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) if e.error_len().is_some() => Err(e),
        Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]),
    }
}

fn diff(prev: Option<&MarkupDocument>, next: Option<&MarkupDocument>) -> DocumentDelta {
    let Some(next) = next else {
        return DocumentDelta {
            header_changed: prev.is_some(),
            ..Default::default()
        };
    };

    let prev_sections = prev.map(|p| p.sections.as_slice()).unwrap_or_default();
    let header_changed =
        prev.map_or(true, |p| p.title != next.title || p.subtitle != next.subtitle);

    let mut delta = DocumentDelta {
        header_changed,
        ..Default::default()
    };
    for (i, section) in next.sections.iter().enumerate() {
        match prev_sections.get(i) {
            None => delta.new_sections.push(i),
            Some(old) if old != section => delta.changed_sections.push(i),
            Some(_) => {}
        }
    }
    delta
}
