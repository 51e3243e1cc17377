//! Type definitions for the IME engine

use super::super::candidate::CandidatePage;
use super::super::keycode::{KeyEvent, Keysym};
use super::super::preedit::Preedit;

/// One page of candidates as handed to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateView {
    /// Candidate strings on the current page, in rank order
    pub texts: Vec<String>,
    /// Index of the page being shown (0-indexed)
    pub page_index: usize,
    /// Total candidates across all pages
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl CandidateView {
    /// Snapshot the current page of `page`
    pub fn from_page(page: &CandidatePage) -> Self {
        Self {
            texts: page
                .page_candidates()
                .iter()
                .map(|c| c.text.clone())
                .collect(),
            page_index: page.current_page(),
            total: page.len(),
            has_prev: page.has_prev_page(),
            has_next: page.has_next_page(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Action to be performed by the framework/UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAction {
    /// Update the preedit display
    UpdatePreedit(Preedit),
    /// Show the candidate window with one page of candidates
    ShowCandidates(CandidateView),
    /// Hide the candidate window
    HideCandidates,
    /// Commit text to the application
    Commit(String),
    /// Update auxiliary text (typed code, mode indicator)
    UpdateAuxText(String),
    /// Hide auxiliary text
    HideAuxText,
}

/// Result of processing a key event
#[derive(Debug, Clone, Default)]
pub struct EngineResult {
    /// Whether the key was consumed by the IME
    pub consumed: bool,
    /// Actions to perform
    pub actions: Vec<EngineAction>,
}

impl EngineResult {
    pub fn consumed() -> Self {
        Self {
            consumed: true,
            actions: Vec::new(),
        }
    }

    pub fn not_consumed() -> Self {
        Self {
            consumed: false,
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: EngineAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Text committed by this result, if any
    pub fn committed_text(&self) -> Option<&str> {
        self.actions.iter().find_map(|a| match a {
            EngineAction::Commit(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Input mode for the IME engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Keys are collected into the code buffer and looked up in the table
    #[default]
    Table,
    /// Every key passes through to the application
    Direct,
}

impl InputMode {
    /// Short indicator shown in the auxiliary text
    pub fn indicator(&self) -> &'static str {
        match self {
            InputMode::Table => "[中]",
            InputMode::Direct => "[A]",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            InputMode::Table => InputMode::Direct,
            InputMode::Direct => InputMode::Table,
        }
    }
}

/// Half- or full-width output for keys the table does not take
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CharWidth {
    #[default]
    Half,
    /// ASCII is committed as its U+FF01..U+FF5E form, space as U+3000
    Full,
}

impl CharWidth {
    pub fn toggled(&self) -> Self {
        match self {
            CharWidth::Half => CharWidth::Full,
            CharWidth::Full => CharWidth::Half,
        }
    }

    pub fn is_full(&self) -> bool {
        *self == CharWidth::Full
    }
}

/// Which kind of character a width mode applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthTarget {
    /// Letters, digits and space
    Letters,
    /// ASCII punctuation
    Punctuation,
}

impl WidthTarget {
    /// Indicator shown in the auxiliary text after a switch
    pub fn indicator(&self, width: CharWidth) -> &'static str {
        match (self, width) {
            (WidthTarget::Letters, CharWidth::Half) => "[半角]",
            (WidthTarget::Letters, CharWidth::Full) => "[全角]",
            (WidthTarget::Punctuation, CharWidth::Half) => "[,.]",
            (WidthTarget::Punctuation, CharWidth::Full) => "[，。]",
        }
    }

    /// The target `ch` belongs to, if any
    pub fn of(ch: char) -> Option<Self> {
        if ch == ' ' || ch.is_ascii_alphanumeric() {
            Some(WidthTarget::Letters)
        } else if ch.is_ascii_punctuation() {
            Some(WidthTarget::Punctuation)
        } else {
            None
        }
    }
}

/// Full-width form of a printable ASCII character
pub fn to_full_width(ch: char) -> Option<char> {
    match ch {
        ' ' => Some('\u{3000}'),
        '!'..='~' => char::from_u32(ch as u32 + 0xFEE0),
        _ => None,
    }
}

/// What a key press means to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyClass {
    /// A symbol for the code buffer (may still be outside the alphabet)
    Symbol(char),
    /// A digit selecting a candidate on the current page
    Select(u8),
    Backspace,
    /// Space or Enter: commit the first candidate on the page
    CommitFirst,
    Cancel,
    PagePrev,
    PageNext,
    /// Anything else, including keys held with Ctrl, Alt or Super
    Other,
}

impl KeyClass {
    /// Classify a key press. Symbols in `alphabet` win over digit selection.
    pub(crate) fn classify(key: &KeyEvent, alphabet: &str) -> Self {
        if key.modifiers.has_command() {
            return KeyClass::Other;
        }
        match key.keysym {
            Keysym::BACKSPACE => return KeyClass::Backspace,
            Keysym::ESCAPE => return KeyClass::Cancel,
            Keysym::SPACE | Keysym::RETURN | Keysym::KP_ENTER => return KeyClass::CommitFirst,
            Keysym::PAGE_UP | Keysym::UP | Keysym::LEFT => return KeyClass::PagePrev,
            Keysym::PAGE_DOWN | Keysym::DOWN | Keysym::RIGHT => return KeyClass::PageNext,
            _ => {}
        }
        let Some(ch) = key.to_char() else {
            return KeyClass::Other;
        };
        if alphabet.contains(ch) {
            KeyClass::Symbol(ch)
        } else if let Some(digit) = key.keysym.digit_value() {
            KeyClass::Select(digit)
        } else if ch.is_ascii_alphabetic() {
            KeyClass::Symbol(ch)
        } else {
            KeyClass::Other
        }
    }
}
