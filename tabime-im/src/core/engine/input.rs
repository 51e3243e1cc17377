//! Key handling for the Idle and Composing states

use super::*;

impl InputMethodEngine {
    /// Idle: only a code symbol starts a composition; everything else is the
    /// application's.
    pub(super) fn process_key_idle(&mut self, class: KeyClass) -> EngineResult {
        match class {
            KeyClass::Symbol(ch) => {
                if !self.editor.append(ch) {
                    return EngineResult::not_consumed();
                }
                self.state = InputState::Composing;
                self.composing_display()
            }
            _ => EngineResult::not_consumed(),
        }
    }

    pub(super) fn process_key_composing(&mut self, class: KeyClass) -> EngineResult {
        match class {
            KeyClass::Symbol(ch) => {
                // Rejected symbols (outside the alphabet, buffer full) are swallowed
                if self.editor.append(ch) {
                    self.composing_display()
                } else {
                    EngineResult::consumed()
                }
            }
            KeyClass::Select(digit) => {
                // 1-9 pick offsets 0-8, 0 picks offset 9
                let offset = if digit == 0 { 9 } else { usize::from(digit) - 1 };
                self.select_candidate(offset)
            }
            KeyClass::CommitFirst => self.select_candidate(0),
            KeyClass::Backspace => {
                self.editor.backspace();
                if self.editor.is_empty() {
                    self.reset();
                    return self.clear_display();
                }
                self.composing_display()
            }
            KeyClass::Cancel => {
                debug!("cancel \"{}\"", self.editor.code());
                self.reset();
                self.clear_display()
            }
            KeyClass::PagePrev => {
                if self.editor.prev_page() {
                    EngineResult::consumed().with_action(self.candidates_action())
                } else {
                    EngineResult::consumed()
                }
            }
            KeyClass::PageNext => {
                if self.editor.next_page() {
                    EngineResult::consumed().with_action(self.candidates_action())
                } else {
                    EngineResult::consumed()
                }
            }
            KeyClass::Other => EngineResult::not_consumed(),
        }
    }
}
