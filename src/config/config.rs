use crate::sequence_processor::collectors::summary::DEFAULT_NXX;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persistent defaults read from `config.toml`.
///
/// Command-line flags override anything set here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Worker threads; unset or 0 uses every available core
    pub threads: Option<usize>,
    /// Bound of each pipeline queue; unset uses twice the worker count
    pub channel_capacity: Option<usize>,
    pub keep_order: bool,
    #[serde(default = "default_nxx")]
    pub nxx: Vec<u8>,
}

fn default_nxx() -> Vec<u8> {
    DEFAULT_NXX.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: None,
            channel_capacity: None,
            keep_order: false,
            nxx: default_nxx(),
        }
    }
}

impl Config {
    /// `<config dir>/catseq/config.toml` for the current user
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "catseq", "catseq")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads `path` if given (it must exist), else the default location if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.nxx, vec![20, 50, 80]);
    }

    #[test]
    fn test_parse() {
        let config = Config::from_toml_str(
            "threads = 4\nchannel_capacity = 64\nkeep_order = true\nnxx = [50, 90]\n",
        )
        .unwrap();
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.channel_capacity, Some(64));
        assert!(config.keep_order);
        assert_eq!(config.nxx, vec![50, 90]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::from_toml_str("thread = 4\n").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "threads = 2").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.threads, Some(2));

        assert!(Config::load(Some(Path::new("/nonexistent/catseq.toml"))).is_err());
    }
}
