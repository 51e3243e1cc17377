//! IME Engine - the core state machine and key dispatch
//!
//! `InputMethodEngine` owns the code buffer editor and decides, for each key
//! event, whether the key belongs to the IME and which UI actions follow.

mod display;
mod input;
mod mode;
mod types;

pub use types::*;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tabime_engine::PhraseTable;
use tracing::{debug, trace, warn};

use super::candidate::CandidatePage;
use super::editor::{Editor, EditorConfig};
use super::keycode::KeyEvent;
use super::preedit::Preedit;
use super::state::InputState;

/// The main IME engine
pub struct InputMethodEngine {
    /// Current input state
    state: InputState,
    /// Code buffer and candidate lookup
    editor: Editor,
    /// Current input mode (Table or Direct)
    input_mode: InputMode,
    letter_width: CharWidth,
    punct_width: CharWidth,
}

impl InputMethodEngine {
    /// Create an engine over `table`
    pub fn new(table: Arc<dyn PhraseTable>, config: EditorConfig) -> Self {
        Self {
            state: InputState::Idle,
            editor: Editor::new(table, config),
            input_mode: InputMode::Table,
            letter_width: CharWidth::Half,
            punct_width: CharWidth::Half,
        }
    }

    /// Get the current state
    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// The code typed since the last commit
    pub fn code(&self) -> &str {
        self.editor.code()
    }

    /// Preedit for the current code buffer
    pub fn preedit(&self) -> Preedit {
        if self.editor.is_empty() {
            Preedit::new()
        } else {
            Preedit::with_text_underlined(self.editor.code())
        }
    }

    /// Candidate page for the current code buffer
    pub fn candidates(&mut self) -> &CandidatePage {
        self.editor.page()
    }

    /// Drop the code buffer and return to Idle
    pub fn reset(&mut self) {
        self.editor.clear();
        self.state = InputState::Idle;
    }

    /// Process a key event
    pub fn process_key(&mut self, key: &KeyEvent) -> EngineResult {
        // Log modifier key events for debugging key mapping issues
        if key.keysym.is_modifier() {
            debug!(
                "modifier key: keysym=0x{:04x} press={} modifiers={:?}",
                key.keysym.0, key.is_press, key.modifiers
            );
        }

        // Right Alt/Super/Meta/Hyper: Table <-> Direct switch
        if let Some(result) = self.handle_mode_toggle_key(key) {
            return result;
        }

        // Modifier-only keys (Shift, Ctrl, Alt_L, Super_L, etc.): pass through
        if key.keysym.is_modifier() {
            return EngineResult::not_consumed();
        }

        // Only process key presses
        if !key.is_press {
            return EngineResult::not_consumed();
        }

        if self.input_mode == InputMode::Direct {
            return EngineResult::not_consumed();
        }

        // Shift+Space / Ctrl+period: half <-> full width
        if let Some(result) = self.handle_width_toggle_key(key) {
            return result;
        }

        let class = KeyClass::classify(key, &self.editor.config().alphabet);
        trace!(
            "Processing key: {} as {:?} in state: {:?}",
            key.keysym, class, self.state
        );

        let result = match self.state {
            InputState::Idle => self.process_key_idle(class),
            InputState::Composing => self.process_key_composing(class),
        };
        if !result.consumed
            && let Some(widened) = self.widen_passed_key(key)
        {
            return widened;
        }
        result
    }

    /// Commit the first candidate of the current page and return its text.
    /// Returns an empty string when nothing is composed.
    pub fn commit(&mut self) -> String {
        if self.state.is_idle() {
            return String::new();
        }
        self.select_candidate(0)
            .committed_text()
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Commit the candidate at `offset` on the current page.
    ///
    /// Consumed but inert when nothing is composed, the offset is past the
    /// page, or the last lookup failed.
    pub fn select_candidate(&mut self, offset: usize) -> EngineResult {
        if self.state.is_idle() {
            return EngineResult::consumed();
        }
        if self.editor.lookup_failed() {
            warn!("commit of \"{}\" skipped: lookup failed", self.editor.code());
            return EngineResult::consumed();
        }
        let Some(candidate) = self.editor.current_candidate(offset) else {
            trace!("no candidate at offset {}", offset);
            return EngineResult::consumed();
        };

        match self.editor.record_usage(&candidate) {
            Ok(rank) => debug!("committed {} ({}) rank={}", candidate.text, candidate.code, rank),
            Err(e) => warn!("rank update for {} skipped: {}", candidate.text, e),
        }

        self.reset();
        EngineResult::consumed()
            .with_action(EngineAction::Commit(candidate.text))
            .with_action(EngineAction::UpdatePreedit(Preedit::new()))
            .with_action(EngineAction::HideCandidates)
            .with_action(EngineAction::HideAuxText)
    }

    /// Focus gained. Re-shows any pending composition; never edits the buffer.
    pub fn focus_in(&mut self) -> EngineResult {
        debug!("focus_in: state={:?} mode={:?}", self.state, self.input_mode);
        if self.state.is_composing() {
            return self.composing_display();
        }
        EngineResult::consumed()
    }

    /// Focus lost. Drops the uncommitted code and persists rank changes.
    pub fn focus_out(&mut self) -> EngineResult {
        debug!("focus_out: dropping \"{}\"", self.editor.code());
        let was_composing = self.state.is_composing();
        self.reset();
        if let Err(e) = self.editor.flush_table() {
            warn!("failed to save table on focus out: {}", e);
        }
        if was_composing {
            return self.clear_display();
        }
        EngineResult::consumed()
    }
}
