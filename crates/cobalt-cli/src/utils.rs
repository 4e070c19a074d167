use std::path::{Path, PathBuf};

use cobalt_source::CompilerConfig;

use crate::error::CliError;

/// Name of the configuration file picked up next to a manifest.
pub const CONFIG_FILE: &str = "cobalt.toml";

/// Finds the nearest `cobalt.toml` by searching upwards from `start_path`.
pub fn find_config(start_path: &Path) -> Option<PathBuf> {
    let mut current = if start_path.is_dir() {
        start_path.to_path_buf()
    } else {
        start_path.parent().map_or_else(|| start_path.to_path_buf(), |p| p.to_path_buf())
    };

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.is_file() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Loads the configuration named on the command line, else the nearest
/// `cobalt.toml` above `manifest`, else the defaults.
pub fn load_config(explicit: Option<&Path>, manifest: &Path) -> Result<CompilerConfig, CliError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let start = manifest.canonicalize().map_err(|e| CliError::IoError {
                path: manifest.to_path_buf(),
                operation: format!("locating manifest '{}'", manifest.display()),
                source: e,
            })?;
            find_config(&start)
        }
    };
    match path {
        Some(path) => {
            log::info!("Using configuration {}", path.display());
            Ok(CompilerConfig::load(&path)?)
        }
        None => {
            log::debug!("No {CONFIG_FILE} found, using defaults");
            Ok(CompilerConfig::default())
        }
    }
}
