use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::embeddings::{EmbeddingProvider, build_embedder};
use crate::error::{PartDbError, Result};
use crate::search::PartSearch;
use crate::storage::Database;

pub struct AppContext {
    pub config: Config,
    pub db: Database,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = Self::find_root()?;
        let config = Config::load(cli.config.as_deref(), &root)?;
        Self::open(&root, config, cli.output_format())
    }

    /// Open the catalog database under `root` with an already loaded config.
    pub fn open(root: &Path, config: Config, output_format: OutputFormat) -> Result<Self> {
        let db_path = database_path(root, &config);
        debug!(target: "storage", path = %db_path.display(), "opening catalog");
        let db = Database::open(&db_path)?;

        Ok(Self {
            config,
            db,
            output_format,
        })
    }

    /// The embedding backend selected by configuration.
    pub fn embedder(&self) -> Result<Box<dyn EmbeddingProvider>> {
        build_embedder(&self.config.embedding)
    }

    pub fn search(&self) -> PartSearch<'_> {
        PartSearch::new(&self.db, &self.config.search)
    }

    pub const fn robot(&self) -> bool {
        self.output_format.is_robot()
    }

    fn find_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("PARTDB_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        if let Some(found) = find_upwards(&cwd, ".partdb") {
            return Ok(found);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| PartDbError::MissingConfig("data directory not found".to_string()))?;
        Ok(data_dir.join("partdb"))
    }
}

fn database_path(root: &Path, config: &Config) -> PathBuf {
    match config.database.path.as_deref() {
        Some(path) if Path::new(path).is_absolute() => PathBuf::from(path),
        Some(path) => root.join(path),
        None => root.join("partdb.db"),
    }
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_dir())
}
