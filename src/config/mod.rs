//! Configuration module
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "SOLR_OPENSEARCH_SETTINGS_PATH";

/// Load settings from an explicit path, the environment, a default location
/// or built-in defaults, in that order. Environment overrides are applied last.
///
/// Returns the settings and the file they came from, if any. Runs before
/// logging is set up, so it does not log.
pub fn load(explicit: Option<&Path>) -> Result<(Settings, Option<PathBuf>)> {
    let source = find_settings_file(explicit);
    let mut settings = match source {
        Some(ref path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    settings.merge_env();
    settings.validate()?;
    Ok((settings, source))
}

fn find_settings_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut candidates = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/solr-opensearch/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("solr-opensearch/settings.yml"));
    }

    candidates.into_iter().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_missing_file_fails() {
        let result = load(Some(Path::new("/nonexistent/solr-opensearch.yml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = Path::new("/tmp/explicit.yml");
        assert_eq!(find_settings_file(Some(path)), Some(path.to_path_buf()));
    }
}
