//! Settings configuration
//!
//! Manages user-configurable settings for the IME.
//! Default values are defined in `config/default.toml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tabime_engine::{MatchMode, TableLocations, TableRegistry};
use tracing::{debug, warn};

use crate::core::editor::EditorConfig;

/// Default configuration TOML embedded from config/default.toml
const DEFAULT_CONFIG_TOML: &str = include_str!("../../config/default.toml");

/// Configuration settings for the IME
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Code buffer and candidate settings
    pub editor: EditorSettings,
    /// Table file locations
    pub tables: TableSettings,
}

/// Code buffer and candidate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Symbols accepted into the code buffer
    pub alphabet: String,
    /// Maximum number of symbols in the code buffer
    pub max_code_len: usize,
    /// Candidates shown per page
    pub page_size: usize,
    /// Prefix or exact code matching
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Upper bound on candidates fetched per lookup
    pub lookup_limit: usize,
}

/// Table file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSettings {
    /// Directory searched for `<name>.tsv` (optional, defaults to data_dir/tables)
    pub dir: Option<String>,
    /// Persist rank changes on every commit
    pub save_on_commit: bool,
    /// Explicit table paths by name
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("embedded default.toml must be valid")
    }
}

/// Recursively merge `overlay` TOML values on top of `base`.
fn merge_toml(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(key) {
                    merge_toml(base_value, value);
                } else {
                    base_table.insert(key.clone(), value.clone());
                }
            }
        }
        (base, _) => {
            *base = overlay.clone();
        }
    }
}

/// Parse user TOML content merged on top of default.toml.
fn parse_with_defaults(user_content: &str) -> Result<Settings> {
    let mut base: toml::Value = toml::from_str(DEFAULT_CONFIG_TOML)?;
    let user: toml::Value = toml::from_str(user_content)?;
    merge_toml(&mut base, &user);
    let settings: Settings = base.try_into()?;
    settings.validate()?;
    Ok(settings)
}

/// Get the project directories for tabime.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "tabime", "tabime")
}

impl Settings {
    /// Get the data directory path
    pub fn data_dir() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Default table directory.
    ///
    /// Default: `~/.local/share/tabime/tables/`
    pub fn default_tables_dir() -> Option<PathBuf> {
        Self::data_dir().map(|dir| dir.join("tables"))
    }

    /// Load settings from the default configuration file.
    /// Falls back to embedded default.toml if the config file does not exist.
    pub fn load() -> Result<Self> {
        let Some(config_file) = Self::config_file() else {
            warn!("Could not determine config directory, using defaults");
            return Ok(Self::default());
        };

        if !config_file.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        debug!("Loading config from {:?}", config_file);
        let content = fs::read_to_string(&config_file)?;
        parse_with_defaults(&content)
    }

    /// Load settings from a specific file, merged on top of defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        parse_with_defaults(&content)
    }

    /// Save settings to the default configuration file
    pub fn save(&self) -> Result<()> {
        let Some(config_file) = Self::config_file() else {
            anyhow::bail!("Could not determine config directory");
        };
        debug!("Saving config to {:?}", config_file);
        self.save_to(&config_file)
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.editor.alphabet.is_empty() {
            anyhow::bail!("editor.alphabet must not be empty");
        }
        if self.editor.max_code_len == 0 {
            anyhow::bail!("editor.max_code_len must be at least 1");
        }
        if self.editor.page_size == 0 || self.editor.page_size > 10 {
            anyhow::bail!(
                "editor.page_size must be between 1 and 10, got {}",
                self.editor.page_size
            );
        }
        Ok(())
    }

    /// Editor configuration for new sessions
    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            alphabet: self.editor.alphabet.clone(),
            max_code_len: self.editor.max_code_len,
            page_size: self.editor.page_size,
            match_mode: self.editor.match_mode,
            lookup_limit: self.editor.lookup_limit,
        }
    }

    /// Where tables are looked up by name
    pub fn table_locations(&self) -> TableLocations {
        let dir = self
            .tables
            .dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(Self::default_tables_dir);
        let mut locations = TableLocations::new();
        if let Some(dir) = dir {
            locations = locations.with_dir(dir);
        }
        for (name, path) in &self.tables.paths {
            locations = locations.with_path(name.clone(), path);
        }
        locations
    }

    /// A table registry over [`Self::table_locations`]
    pub fn table_registry(&self) -> TableRegistry {
        TableRegistry::new(self.table_locations()).with_save_on_commit(self.tables.save_on_commit)
    }
}
