use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub paragraphs: Vec<String>, // Paragraphs and recommendations, in document order
}

/// A parsed report: always has a title and at least one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkupDocument {
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<Section>,
}

impl MarkupDocument {
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(|s| s.paragraphs.len()).sum()
    }
}
