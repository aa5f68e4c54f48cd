//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::Config;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// At each directory level the search checks:
///   1. `<dir>/<name>`          (e.g. `logbook.yaml`)
///   2. `<dir>/.github/<name>`  (e.g. `.github/logbook.yaml`)
///
/// The first match wins. Parents are walked up to and including `root`;
/// nothing above it is consulted.
pub fn find_config(start_dir: &Path, root: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), root = %root.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.exists() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }

            let github_path = current.join(".github").join(name);
            if github_path.exists() {
                info!(path = %github_path.display(), "found config file in .github/");
                return Some(github_path);
            }
        }

        if current == root || !current.starts_with(root) || !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration found between `dir` and `root`, falling back to
/// defaults only when no file exists.
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_config_or_default(dir: &Path, root: &Path) -> Result<(Config, Option<PathBuf>)> {
    match find_config(dir, root) {
        Some(path) => {
            let config = load_config(&path)?;
            Ok((config, Some(path)))
        }
        None => {
            warn!(dir = %dir.display(), "no config found, using defaults");
            Ok((Config::default(), None))
        }
    }
}
