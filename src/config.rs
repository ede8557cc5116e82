use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "achievement-explorer";
pub const BACKEND_URL_ENV: &str = "ACHIEVEMENT_EXPLORER_BACKEND_URL";

/// User settings. Every field has a default so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend_url: String,
    pub debounce_ms: u64,
    pub request_timeout_secs: u64,
    pub guide_search_url: String,
    pub detail_cache_ttl_secs: u64,
    pub probe_images: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8001".to_string(),
            debounce_ms: 500,
            request_timeout_secs: 10,
            guide_search_url: "https://www.google.com/search".to_string(),
            detail_cache_ttl_secs: 600,
            probe_images: true,
        }
    }
}

pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("settings.json"))
}

impl Settings {
    /// Read settings from `path`. A missing file yields defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| format!("Invalid settings file {}: {}", path.display(), e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(format!("Failed to read {}: {}", path.display(), e)),
        }
    }

    /// Resolve settings: file, then environment, then command-line override.
    pub fn resolve(config_path: Option<&Path>, backend_override: Option<&str>) -> Result<Self, String> {
        let mut settings = match config_path.map(Path::to_path_buf).or_else(default_settings_path) {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                settings.backend_url = url;
            }
        }
        if let Some(url) = backend_override {
            settings.backend_url = url.to_string();
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (label, url) in [
            ("backend_url", &self.backend_url),
            ("guide_search_url", &self.guide_search_url),
        ] {
            reqwest::Url::parse(url).map_err(|e| format!("Invalid {} '{}': {}", label, url, e))?;
        }
        if self.debounce_ms == 0 {
            return Err("debounce_ms must be greater than zero".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.debounce_ms, 500);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().expect("Should create temp file");
        file.write_all(br#"{"backend_url": "https://api.example.com", "probe_images": false}"#)
            .expect("Should write");

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.backend_url, "https://api.example.com");
        assert!(!settings.probe_images);
        assert_eq!(settings.guide_search_url, "https://www.google.com/search");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().expect("Should create temp file");
        file.write_all(b"{ not json").expect("Should write");
        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(err.contains("Invalid settings file"));
    }

    #[test]
    fn test_cli_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"backend_url": "https://file.example.com"}"#).unwrap();

        let settings = Settings::resolve(Some(&path), Some("https://cli.example.com")).unwrap();
        assert_eq!(settings.backend_url, "https://cli.example.com");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let settings = Settings {
            backend_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
