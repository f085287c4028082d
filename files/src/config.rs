//! Optional project configuration.
//!
//! A project may keep a `.envspec.yml` next to its schema to change the
//! default file names or the entries `protect` adds to `.gitignore`. Every
//! field is optional.
//!
//! # Example YAML
//!
//! ```yaml
//! schema_file: config/envspec.json
//! env_file: .env.development
//! protected_entries:
//!   - .env
//!   - .env.development
//!   - .env.*.backup
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::env_file::ENV_FILE;
use crate::error::Result;
use crate::gitignore::DEFAULT_PROTECTED_ENTRIES;
use crate::schema_file::SCHEMA_FILE;

/// Default project config file name.
pub const CONFIG_FILE: &str = ".envspec.yml";

/// Project-level settings for the `envspec` commands.
///
/// # Examples
///
/// ```
/// use envspec_files::ProjectConfig;
///
/// let config = ProjectConfig::default();
/// assert_eq!(config.schema_file.to_str(), Some("envspec.json"));
/// assert_eq!(config.env_file.to_str(), Some(".env"));
/// assert_eq!(config.protected_entries.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Schema file, relative to the project directory.
    pub schema_file: PathBuf,
    /// Environment file, relative to the project directory.
    pub env_file: PathBuf,
    /// Lines `protect` makes sure `.gitignore` contains.
    pub protected_entries: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            schema_file: PathBuf::from(SCHEMA_FILE),
            env_file: PathBuf::from(ENV_FILE),
            protected_entries: DEFAULT_PROTECTED_ENTRIES
                .iter()
                .map(|entry| entry.to_string())
                .collect(),
        }
    }
}

impl ProjectConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::FilesError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::FilesError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Loads `.envspec.yml` from `dir`, or the defaults if there is none.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load) when the file exists.
    pub fn load_or_default(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        debug!(path = %path.display(), "loading project config");
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            ProjectConfig::load_or_default(dir.path()).unwrap(),
            ProjectConfig::default()
        );
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "env_file: .env.local\n").unwrap();

        let config = ProjectConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.env_file, PathBuf::from(".env.local"));
        assert_eq!(config.schema_file, PathBuf::from(SCHEMA_FILE));
        assert_eq!(config.protected_entries, ProjectConfig::default().protected_entries);
    }

    #[test]
    fn test_bad_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "protected_entries: 5\n").unwrap();
        assert!(matches!(
            ProjectConfig::load_or_default(dir.path()).unwrap_err(),
            crate::FilesError::YamlError(_)
        ));
    }
}
