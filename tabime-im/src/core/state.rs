//! Input state machine
//!
//! Defines the states of the IME and transitions between them.

/// The current state of the IME
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputState {
    /// Empty code buffer, nothing to commit
    #[default]
    Idle,

    /// Code buffer is non-empty and candidates are shown
    Composing,
}

impl InputState {
    /// Check if the engine is in the Idle state
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_composing(&self) -> bool {
        matches!(self, Self::Composing)
    }
}
