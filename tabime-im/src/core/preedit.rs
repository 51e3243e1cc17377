//! Preedit string management
//!
//! Handles the composition string (preedit) that is displayed while the user
//! is typing and before text is committed.

/// Attribute type for preedit text styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    /// Normal underline for uncommitted preedit text
    Underline,
}

/// A text attribute with range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreeditAttribute {
    /// Start position (character index)
    pub start: usize,
    /// End position (character index, exclusive)
    pub end: usize,
    /// Attribute type
    pub attr_type: AttributeType,
}

impl PreeditAttribute {
    pub fn new(start: usize, end: usize, attr_type: AttributeType) -> Self {
        Self {
            start,
            end,
            attr_type,
        }
    }

    /// Create an underline attribute for the entire range
    pub fn underline(start: usize, end: usize) -> Self {
        Self::new(start, end, AttributeType::Underline)
    }
}

/// Preedit string with cursor position and attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preedit {
    /// The preedit text
    text: String,
    /// Caret (cursor) position in characters
    caret: usize,
    /// Text attributes for styling
    attributes: Vec<PreeditAttribute>,
}

impl Preedit {
    /// Create a new empty preedit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preedit with text and underline the entire text
    pub fn with_text_underlined(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            attributes: vec![PreeditAttribute::underline(0, len)],
            text,
            caret: len,
        }
    }

    /// Get the preedit text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the caret position (in characters)
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Get the text attributes
    pub fn attributes(&self) -> &[PreeditAttribute] {
        &self.attributes
    }

    /// Check if the preedit is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Get the length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }
}
