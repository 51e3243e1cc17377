//! Table / Direct mode and character width switching

use super::*;
use crate::core::keycode::Keysym;

impl InputMethodEngine {
    /// Handle mode toggle keys (Right Alt/Super/Meta/Hyper).
    /// Returns `Some(result)` if the key was a toggle key, `None` otherwise.
    pub(super) fn handle_mode_toggle_key(&mut self, key: &KeyEvent) -> Option<EngineResult> {
        if !key.keysym.is_mode_toggle_key() {
            return None;
        }
        // Releases pass through so the system can track modifier state
        if !key.is_press || key.modifiers.control_key || key.modifiers.shift_key {
            return Some(EngineResult::not_consumed());
        }
        Some(self.set_input_mode(self.input_mode.toggled()))
    }

    /// Switch between Table and Direct input.
    ///
    /// Leaving Table mode mid-composition commits the typed code as-is.
    pub fn set_input_mode(&mut self, mode: InputMode) -> EngineResult {
        if mode == self.input_mode {
            return EngineResult::consumed();
        }
        debug!("input mode: {:?} -> {:?}", self.input_mode, mode);
        self.input_mode = mode;

        let mut result = EngineResult::consumed();
        if mode == InputMode::Direct && self.state.is_composing() {
            let code = self.editor.code().to_string();
            self.reset();
            result = result
                .with_action(EngineAction::Commit(code))
                .with_action(EngineAction::UpdatePreedit(Preedit::new()))
                .with_action(EngineAction::HideCandidates);
        }
        result.with_action(EngineAction::UpdateAuxText(mode.indicator().to_string()))
    }

    /// Shift+Space toggles letter width, Ctrl+period punctuation width.
    pub(super) fn handle_width_toggle_key(&mut self, key: &KeyEvent) -> Option<EngineResult> {
        let mods = key.modifiers;
        let target = match key.keysym {
            Keysym::SPACE if mods.shift_key && !mods.has_command() => WidthTarget::Letters,
            Keysym::PERIOD if mods.control_key && !mods.alt_key && !mods.super_key => {
                WidthTarget::Punctuation
            }
            _ => return None,
        };
        Some(self.set_width(target, self.width(target).toggled()))
    }

    pub fn width(&self, target: WidthTarget) -> CharWidth {
        match target {
            WidthTarget::Letters => self.letter_width,
            WidthTarget::Punctuation => self.punct_width,
        }
    }

    /// Set the width used for keys of `target` that the table passes on.
    pub fn set_width(&mut self, target: WidthTarget, width: CharWidth) -> EngineResult {
        let slot = match target {
            WidthTarget::Letters => &mut self.letter_width,
            WidthTarget::Punctuation => &mut self.punct_width,
        };
        if *slot == width {
            return EngineResult::consumed();
        }
        debug!("{:?} width: {:?} -> {:?}", target, *slot, width);
        *slot = width;
        EngineResult::consumed()
            .with_action(EngineAction::UpdateAuxText(target.indicator(width).to_string()))
    }

    /// Full-width commit for a printable key the table did not consume.
    pub(super) fn widen_passed_key(&self, key: &KeyEvent) -> Option<EngineResult> {
        let ch = key.to_char()?;
        if !self.width(WidthTarget::of(ch)?).is_full() {
            return None;
        }
        let wide = to_full_width(ch)?;
        trace!("widened {:?} -> {:?}", ch, wide);
        Some(EngineResult::consumed().with_action(EngineAction::Commit(wide.to_string())))
    }
}
