use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PartDbError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Defaults, then the global and project files (or one explicit file
    /// instead of both), then `PARTDB_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("PARTDB_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                PartDbError::MissingConfig(format!("config file {} not found", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("partdb/config.toml"))
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&root.join("config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| PartDbError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| PartDbError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.database {
            self.database.merge(patch);
        }
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("PARTDB_DB_PATH") {
            self.database.path = Some(value);
        }

        if let Some(value) = lookup("PARTDB_EMBEDDING_BACKEND") {
            self.embedding.backend = value;
        }
        if let Some(value) = lookup("PARTDB_EMBEDDING_MODEL") {
            self.embedding.model = value;
        }
        if let Some(value) = lookup("PARTDB_EMBEDDING_BASE_URL") {
            self.embedding.base_url = value;
        }
        if let Some(value) = lookup("PARTDB_EMBEDDING_API_KEY_ENV") {
            self.embedding.api_key_env = value;
        }
        if let Some(value) = lookup("PARTDB_EMBEDDING_TIMEOUT_SECS") {
            self.embedding.timeout_secs = parse_u64("PARTDB_EMBEDDING_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = lookup("PARTDB_SEARCH_STEMMING") {
            self.search.stemming = parse_bool(&value);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file; relative paths resolve against the data root. Defaults
    /// to `<root>/partdb.db`.
    #[serde(default)]
    pub path: Option<String>,
}

impl DatabaseConfig {
    fn merge(&mut self, patch: DatabasePatch) {
        if let Some(value) = patch.path {
            self.path = Some(value);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `openai` or `hash` (offline, deterministic).
    pub backend: String,
    pub model: String,
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingPatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.model {
            self.model = value;
        }
        if let Some(value) = patch.base_url {
            self.base_url = value;
        }
        if let Some(value) = patch.api_key_env {
            self.api_key_env = value;
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// English analysis: drop stop words and reduce words to their stem.
    pub stemming: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { stemming: true }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.stemming {
            self.stemming = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub database: Option<DatabasePatch>,
    pub embedding: Option<EmbeddingPatch>,
    pub search: Option<SearchPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DatabasePatch {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EmbeddingPatch {
    pub backend: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub stemming: Option<bool>,
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .map_err(|err| PartDbError::Config(format!("invalid {key} value {value}: {err}")))
}
