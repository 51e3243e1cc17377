//! UI action builders

use super::*;

impl InputMethodEngine {
    /// Show or hide the candidate window for the current page
    pub(super) fn candidates_action(&mut self) -> EngineAction {
        let view = CandidateView::from_page(self.editor.page());
        if view.is_empty() {
            EngineAction::HideCandidates
        } else {
            EngineAction::ShowCandidates(view)
        }
    }

    /// Auxiliary text: the raw code buffer
    pub(super) fn format_aux_composing(&self) -> String {
        self.editor.auxiliary_text()
    }

    /// Full display refresh while composing
    pub(super) fn composing_display(&mut self) -> EngineResult {
        let preedit = self.preedit();
        let candidates = self.candidates_action();
        EngineResult::consumed()
            .with_action(EngineAction::UpdatePreedit(preedit))
            .with_action(EngineAction::UpdateAuxText(self.format_aux_composing()))
            .with_action(candidates)
    }

    /// Clear preedit, candidates and aux text
    pub(super) fn clear_display(&self) -> EngineResult {
        EngineResult::consumed()
            .with_action(EngineAction::UpdatePreedit(Preedit::new()))
            .with_action(EngineAction::HideCandidates)
            .with_action(EngineAction::HideAuxText)
    }
}
