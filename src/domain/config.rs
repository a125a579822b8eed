use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The default name of the configuration file in the root directory.
pub const CONFIG_FILE: &str = "impound.toml";

/// What to do when the persisted store cannot be parsed at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Refuse to start.
    #[default]
    Fail,
    /// Log a warning and start with an empty store.
    ///
    /// The malformed file is replaced on the next save.
    Empty,
}

/// Configuration for the impound store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Path of the vehicle snapshot file.
    ///
    /// Relative paths are resolved against the root directory.
    store_file: PathBuf,

    /// Policy for a malformed snapshot file.
    pub on_corrupt: CorruptPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_file: default_store_file(),
            on_corrupt: CorruptPolicy::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration from `root`, falling back to the defaults if
    /// the file is missing or invalid.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring {}: {e}", path.display());
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The configured snapshot path, as written in the file.
    #[must_use]
    pub fn store_file(&self) -> &Path {
        &self.store_file
    }

    /// The snapshot path resolved against `root`.
    #[must_use]
    pub fn store_path(&self, root: &Path) -> PathBuf {
        root.join(&self.store_file)
    }

    /// Sets the snapshot path.
    pub fn set_store_file(&mut self, store_file: PathBuf) {
        self.store_file = store_file;
    }
}

fn default_store_file() -> PathBuf {
    PathBuf::from("vehicles.json")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_store_file")]
        store_file: PathBuf,

        #[serde(default)]
        on_corrupt: CorruptPolicy,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                store_file,
                on_corrupt,
            } => Self {
                store_file,
                on_corrupt,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            store_file: config.store_file,
            on_corrupt: config.on_corrupt,
        }
    }
}
