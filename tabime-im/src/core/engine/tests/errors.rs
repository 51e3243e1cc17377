use super::*;
use tabime_engine::{MatchMode, TableCandidate, TableError};

/// Table whose lookups or commits can be made to fail
struct FlakyTable {
    inner: Arc<TableDb>,
    fail_lookup: bool,
    fail_commit: bool,
}

impl PhraseTable for FlakyTable {
    fn lookup(
        &self,
        code: &str,
        mode: MatchMode,
        limit: usize,
    ) -> Result<Vec<TableCandidate>, TableError> {
        if self.fail_lookup {
            return Err(TableError::Unavailable("flaky".to_string()));
        }
        self.inner.lookup(code, mode, limit)
    }

    fn commit(&self, code: &str, phrase: &str) -> Result<u32, TableError> {
        if self.fail_commit {
            return Err(TableError::UnknownEntry {
                code: code.to_string(),
                phrase: phrase.to_string(),
            });
        }
        self.inner.commit(code, phrase)
    }
}

fn flaky_engine(fail_lookup: bool, fail_commit: bool) -> InputMethodEngine {
    let table = Arc::new(FlakyTable {
        inner: test_table(),
        fail_lookup,
        fail_commit,
    });
    InputMethodEngine::new(table, EditorConfig::default())
}

#[test]
fn test_full_buffer_swallows_symbol() {
    let (mut engine, _table) = make_engine();
    type_str(&mut engine, &"a".repeat(16));
    assert_eq!(engine.code().len(), 16);

    let result = engine.process_key(&press('b'));
    assert!(result.consumed);
    assert!(result.actions.is_empty());
    assert_eq!(engine.code(), "a".repeat(16));
}

#[test]
fn test_symbol_outside_alphabet_swallowed_while_composing() {
    let (mut engine, _table) = make_engine();
    type_str(&mut engine, "ha");
    let result = engine.process_key(&press('O'));
    assert!(result.consumed);
    assert_eq!(engine.code(), "ha");
}

#[test]
fn test_lookup_failure_blocks_commit() {
    let mut engine = flaky_engine(true, false);
    let result = type_str(&mut engine, "hao");
    assert!(result.consumed);
    assert_eq!(engine.code(), "hao");
    assert!(result.actions.contains(&EngineAction::HideCandidates));

    for key in [press('1'), press_key(Keysym::SPACE)] {
        let result = engine.process_key(&key);
        assert!(result.consumed);
        assert!(result.committed_text().is_none());
    }
    assert_eq!(engine.code(), "hao");
}

#[test]
fn test_failed_rank_update_still_commits() {
    let mut engine = flaky_engine(false, true);
    type_str(&mut engine, "hao");
    let result = engine.process_key(&press('2'));
    assert_eq!(result.committed_text(), Some("号"));
    assert_eq!(engine.state(), InputState::Idle);
}
