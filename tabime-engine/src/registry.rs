//! Shared table handles keyed by table name.
//!
//! Sessions that use the same table name share one `TableDb`. The registry
//! only keeps weak references, so a table is flushed and closed when the
//! last session holding it goes away.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, info};

use crate::error::{Result, TableError};
use crate::table::TableDb;

/// Resolution of table names to backing files.
///
/// Explicit `paths` entries win; otherwise `<dir>/<name>.tsv` is used.
#[derive(Debug, Clone, Default)]
pub struct TableLocations {
    dir: Option<PathBuf>,
    paths: HashMap<String, PathBuf>,
}

impl TableLocations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory searched for `<name>.tsv` files.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Map a table name to an explicit file.
    pub fn with_path(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(name.into(), path.into());
        self
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Resolve the backing file for `name`.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if let Some(path) = self.paths.get(name) {
            return Ok(path.clone());
        }
        // Names resolved through the directory must be plain file stems
        let plain = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        match &self.dir {
            Some(dir) if plain => Ok(dir.join(format!("{}.tsv", name))),
            _ => Err(TableError::UnknownTable(name.to_string())),
        }
    }
}

/// Opens tables by name and hands out shared handles.
#[derive(Debug)]
pub struct TableRegistry {
    locations: TableLocations,
    save_on_commit: bool,
    open: Mutex<HashMap<String, Weak<TableDb>>>,
}

impl TableRegistry {
    pub fn new(locations: TableLocations) -> Self {
        Self {
            locations,
            save_on_commit: false,
            open: Mutex::new(HashMap::new()),
        }
    }

    /// Persist commits immediately on tables opened from now on.
    pub fn with_save_on_commit(mut self, save_on_commit: bool) -> Self {
        self.save_on_commit = save_on_commit;
        self
    }

    pub fn locations(&self) -> &TableLocations {
        &self.locations
    }

    /// Get the shared handle for `name`, opening the table if no live session
    /// holds it.
    pub fn open(&self, name: &str) -> Result<Arc<TableDb>> {
        let mut open = self
            .open
            .lock()
            .map_err(|_| TableError::Unavailable(name.to_string()))?;

        if let Some(table) = open.get(name).and_then(Weak::upgrade) {
            debug!("reusing open table '{}'", name);
            return Ok(table);
        }

        let path = self.locations.resolve(name)?;
        let table = Arc::new(TableDb::open(name, &path)?.with_save_on_commit(self.save_on_commit));
        info!(
            "table '{}' opened from {:?} ({} entries)",
            name,
            path,
            table.entry_count()
        );
        open.insert(name.to_string(), Arc::downgrade(&table));
        // Forget tables whose sessions have all ended
        open.retain(|_, weak| weak.strong_count() > 0);
        Ok(table)
    }

    /// Number of tables currently held open by at least one session.
    pub fn open_count(&self) -> usize {
        self.open
            .lock()
            .map(|open| open.values().filter(|w| w.strong_count() > 0).count())
            .unwrap_or(0)
    }
}
