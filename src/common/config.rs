use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Folder settings for one archive or restore run.
///
/// Built once at startup and handed to the archiver by reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Root holding the installed game directories
    pub source_folder: PathBuf,

    /// Archive root that stale directories are moved into
    pub destination_folder: PathBuf,

    /// A directory untouched for longer than this many days is stale
    #[serde(default = "default_number_of_days")]
    pub number_of_days: u32,

    /// Directory names (not paths) that are never archived
    #[serde(default)]
    pub folders_to_ignore: Vec<String>,

    /// Write a daily rolling log file here as well as to stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

fn default_number_of_days() -> u32 {
    30
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        Self {
            source_folder: home.join("Games"),
            destination_folder: home.join("GamesArchive"),
            number_of_days: default_number_of_days(),
            folders_to_ignore: Vec::new(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Directory holding gamearchive's config (~/.config/gamearchive on Linux)
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gamearchive")
    }

    /// Default config file path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Resolve which file to load: explicit `--config`, else the default
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path)
    }

    /// Load config from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Config file not found: {} (create one with `gamearchive config init`)",
                path.display()
            );
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save config to a TOML file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Check if a directory name is on the ignore list (exact match)
    pub fn is_ignored(&self, name: &str) -> bool {
        self.folders_to_ignore.iter().any(|f| f == name)
    }
}
