//! Engine session: one input context bound to one table.

use std::sync::Arc;

use tabime_engine::{TableDb, TableError, TableRegistry};
use tracing::info;

use super::editor::EditorConfig;
use super::engine::{EngineResult, InputMethodEngine};
use super::keycode::KeyEvent;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("table '{name}' is unavailable")]
    DatabaseUnavailable {
        name: String,
        #[source]
        source: TableError,
    },
}

/// An input context bound to a named table.
///
/// The table handle is shared with every other session on the same name
/// and is closed once the last of them is dropped.
pub struct Session {
    name: String,
    table: Arc<TableDb>,
    engine: InputMethodEngine,
}

impl Session {
    /// Open `name` through `registry` and start an idle session on it.
    pub fn open(
        registry: &TableRegistry,
        name: &str,
        config: EditorConfig,
    ) -> Result<Self, SessionError> {
        let table = registry
            .open(name)
            .map_err(|source| SessionError::DatabaseUnavailable {
                name: name.to_string(),
                source,
            })?;
        info!("session started on table '{}'", name);
        Ok(Self::with_table(name, table, config))
    }

    /// Start a session on an already open table
    pub fn with_table(name: impl Into<String>, table: Arc<TableDb>, config: EditorConfig) -> Self {
        let engine = InputMethodEngine::new(table.clone(), config);
        Self {
            name: name.into(),
            table,
            engine,
        }
    }

    /// Name of the table this session uses
    pub fn table_name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &Arc<TableDb> {
        &self.table
    }

    pub fn engine(&self) -> &InputMethodEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut InputMethodEngine {
        &mut self.engine
    }

    pub fn process_key(&mut self, key: &KeyEvent) -> EngineResult {
        self.engine.process_key(key)
    }

    pub fn focus_in(&mut self) -> EngineResult {
        self.engine.focus_in()
    }

    pub fn focus_out(&mut self) -> EngineResult {
        self.engine.focus_out()
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keycode::Keysym;
    use crate::core::state::InputState;
    use std::fs;
    use tabime_engine::TableLocations;

    const PINYIN_TSV: &str = "# tabime table v1\nhao\t好\t100\nhao\t号\t80\nha\t哈\t70\n";

    fn registry(dir: &std::path::Path) -> TableRegistry {
        fs::write(dir.join("pinyin.tsv"), PINYIN_TSV).unwrap();
        TableRegistry::new(TableLocations::new().with_dir(dir))
    }

    fn type_str(session: &mut Session, s: &str) {
        for ch in s.chars() {
            session.process_key(&KeyEvent::press(Keysym(ch as u32)));
        }
    }

    #[test]
    fn test_open_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());
        let err = Session::open(&registry, "wubi", EditorConfig::default())
            .err()
            .unwrap();
        let SessionError::DatabaseUnavailable { name, source } = err;
        assert_eq!(name, "wubi");
        assert!(matches!(source, TableError::NotFound(_)));
    }

    #[test]
    fn test_open_rejects_path_like_name() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());
        assert!(Session::open(&registry, "../pinyin", EditorConfig::default()).is_err());
    }

    #[test]
    fn test_sessions_share_table() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());
        let mut first = Session::open(&registry, "pinyin", EditorConfig::default()).unwrap();
        let mut second = Session::open(&registry, "pinyin", EditorConfig::default()).unwrap();
        assert!(Arc::ptr_eq(first.table(), second.table()));
        assert_eq!(registry.open_count(), 1);

        // Commits in one session reorder candidates in the other
        for _ in 0..21 {
            type_str(&mut first, "hao");
            first.process_key(&KeyEvent::press(Keysym('2' as u32)));
        }
        type_str(&mut second, "hao");
        let top = second.engine_mut().candidates().current(0).unwrap().text.clone();
        assert_eq!(top, "号");
        assert_eq!(second.engine().state(), InputState::Composing);
    }

    #[test]
    fn test_drop_last_session_flushes() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());
        {
            let mut session = Session::open(&registry, "pinyin", EditorConfig::default()).unwrap();
            assert_eq!(session.table_name(), "pinyin");
            type_str(&mut session, "ha");
            // 好 and 号 also match the "ha" prefix
            session.process_key(&KeyEvent::press(Keysym('3' as u32)));
        }
        assert_eq!(registry.open_count(), 0);
        let reopened = TableDb::open("pinyin", dir.path().join("pinyin.tsv")).unwrap();
        assert_eq!(reopened.rank_of("ha", "哈"), Some(71));
    }
}
