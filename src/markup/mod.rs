pub mod document;
pub mod parser;
pub mod scanner;
pub mod tracker;

pub use document::{MarkupDocument, Section};
pub use parser::{parse_markup_document, MarkupParser, DEFAULT_NAMESPACE};
pub use tracker::{complete_utf8_prefix, DocumentDelta, DocumentTracker};
