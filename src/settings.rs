use std::{
    env, fs,
    path::{Path, PathBuf},
};

use color_eyre::{Result, eyre::WrapErr};
use directories::ProjectDirs;
use querydeck_api::{client::DEFAULT_BASE_URL, history::DEFAULT_HISTORY_LIMIT};
use querydeck_ui::widgets::theme::ThemeMode;
use serde::Deserialize;

/// Overrides `api_base_url` from the settings file
pub const API_URL_ENV: &str = "QUERYDECK_API_URL";
pub const SETTINGS_FILE: &str = "settings.toml";
pub const STORE_FILE: &str = "querydeck.db";

/// User settings read from `settings.toml`; every key is optional
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub history_limit: usize,
    pub export_dir: PathBuf,
    pub export_file_name: String,
    pub theme: ThemeMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            export_dir: PathBuf::from("."),
            export_file_name: "query_result.csv".to_string(),
            theme: ThemeMode::default(),
        }
    }
}

impl Settings {
    /// Load the settings file if there is one, then apply the environment
    pub fn load(dirs: Option<&ProjectDirs>) -> Result<Self> {
        let mut settings = match dirs {
            Some(dirs) => {
                Self::from_file(&dirs.config_dir().join(SETTINGS_FILE))?
            }
            None => Self::default(),
        };
        settings.apply_env(env::var(API_URL_ENV).ok());
        Ok(settings)
    }

    /// Parse `path`, falling back to the defaults if it does not exist
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).wrap_err_with(|| {
            format!("Failed to read settings file {}", path.display())
        })?;
        toml::from_str(&content).wrap_err_with(|| {
            format!("Failed to parse settings file {}", path.display())
        })
    }

    fn apply_env(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url;
        }
    }

    /// Where CSV exports are written
    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(&self.export_file_name)
    }
}

/// Platform directories for settings, the local store and logs
#[must_use]
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "querydeck", "querydeck")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings =
            Settings::from_file(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.history_limit, 20);
        assert_eq!(
            settings.export_path(),
            PathBuf::from("./query_result.csv")
        );
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "history_limit = 5\ntheme = \"dark\"").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.history_limit, 5);
        assert_eq!(settings.theme, ThemeMode::Dark);
        assert_eq!(settings.api_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "history_limit = \"many\"").unwrap();
        assert!(Settings::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides_base_url() {
        let mut settings = Settings::default();
        settings.apply_env(Some("http://api.internal:9000".to_string()));
        assert_eq!(settings.api_base_url, "http://api.internal:9000");

        settings.apply_env(Some("  ".to_string()));
        assert_eq!(settings.api_base_url, "http://api.internal:9000");
    }
}
