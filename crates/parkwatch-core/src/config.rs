//! Configuration module
//!
//! Client settings read from the environment: where the detection service
//! lives, how long to wait for it, and how large selected files may be.

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use crate::validation::{
    MediaValidator, DEFAULT_MAX_IMAGE_SIZE_BYTES, DEFAULT_MAX_VIDEO_SIZE_BYTES,
};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    /// 0 = wait for the response indefinitely
    pub request_timeout_secs: u64,
    pub max_image_size_bytes: usize,
    pub max_video_size_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: 0,
            max_image_size_bytes: DEFAULT_MAX_IMAGE_SIZE_BYTES,
            max_video_size_bytes: DEFAULT_MAX_VIDEO_SIZE_BYTES,
        }
    }
}

impl ClientConfig {
    /// Load from PARKWATCH_SERVER_URL (or API_URL), PARKWATCH_REQUEST_TIMEOUT_SECS,
    /// PARKWATCH_MAX_IMAGE_SIZE_BYTES and PARKWATCH_MAX_VIDEO_SIZE_BYTES.
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load from a dotenv-style file without touching the process environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let vars = dotenvy::from_path_iter(path)
            .with_context(|| format!("Failed to open {}", path.display()))?
            .collect::<Result<HashMap<String, String>, _>>()
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Self::from_vars(|key| vars.get(key).cloned())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| var(key).filter(|s| !s.trim().is_empty());

        let config = Self {
            server_url: var("PARKWATCH_SERVER_URL")
                .or_else(|| var("API_URL"))
                .unwrap_or(defaults.server_url),
            request_timeout_secs: parse_var(
                "PARKWATCH_REQUEST_TIMEOUT_SECS",
                var("PARKWATCH_REQUEST_TIMEOUT_SECS"),
                defaults.request_timeout_secs,
            )?,
            max_image_size_bytes: parse_var(
                "PARKWATCH_MAX_IMAGE_SIZE_BYTES",
                var("PARKWATCH_MAX_IMAGE_SIZE_BYTES"),
                defaults.max_image_size_bytes,
            )?,
            max_video_size_bytes: parse_var(
                "PARKWATCH_MAX_VIDEO_SIZE_BYTES",
                var("PARKWATCH_MAX_VIDEO_SIZE_BYTES"),
                defaults.max_video_size_bytes,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Replace the server URL (e.g. from a CLI flag) and re-validate.
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Result<Self, anyhow::Error> {
        self.server_url = server_url.into();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "PARKWATCH_SERVER_URL must start with http:// or https:// (got '{}')",
                self.server_url
            ));
        }

        if self.max_image_size_bytes == 0 || self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "PARKWATCH_MAX_IMAGE_SIZE_BYTES and PARKWATCH_MAX_VIDEO_SIZE_BYTES must be greater than 0"
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn validator(&self) -> MediaValidator {
        MediaValidator::new(self.max_image_size_bytes, self.max_video_size_bytes)
    }
}

fn parse_var<T: std::str::FromStr>(
    key: &str,
    value: Option<String>,
    default: T,
) -> Result<T, anyhow::Error> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer (got '{}')", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, anyhow::Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.server_url, "http://127.0.0.1:5000");
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_server_url_fallback() {
        let config = load(&[("API_URL", "http://detector:8080")]).unwrap();
        assert_eq!(config.server_url, "http://detector:8080");

        let config = load(&[
            ("API_URL", "http://detector:8080"),
            ("PARKWATCH_SERVER_URL", "https://parking.example.com"),
        ])
        .unwrap();
        assert_eq!(config.server_url, "https://parking.example.com");
    }

    #[test]
    fn test_numeric_overrides() {
        let config = load(&[
            ("PARKWATCH_REQUEST_TIMEOUT_SECS", "30"),
            ("PARKWATCH_MAX_IMAGE_SIZE_BYTES", "1024"),
        ])
        .unwrap();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.validator().max_size(crate::MediaKind::Image), 1024);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(load(&[("PARKWATCH_REQUEST_TIMEOUT_SECS", "soon")]).is_err());
        assert!(load(&[("PARKWATCH_SERVER_URL", "127.0.0.1:5000")]).is_err());
        assert!(load(&[("PARKWATCH_MAX_VIDEO_SIZE_BYTES", "0")]).is_err());
    }

    #[test]
    fn test_with_server_url() {
        let config = ClientConfig::default()
            .with_server_url("http://localhost:9000")
            .unwrap();
        assert_eq!(config.server_url, "http://localhost:9000");
        assert!(ClientConfig::default().with_server_url("ftp://x").is_err());
    }

    #[test]
    fn test_from_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "# detector on the lab box\nAPI_URL=http://lab:5000\nPARKWATCH_REQUEST_TIMEOUT_SECS=45\n",
        )
        .unwrap();

        let config = ClientConfig::from_env_file(&path).unwrap();
        assert_eq!(config.server_url, "http://lab:5000");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(45)));
        assert_eq!(config.max_video_size_bytes, DEFAULT_MAX_VIDEO_SIZE_BYTES);

        assert!(ClientConfig::from_env_file(dir.path().join("missing.env")).is_err());
    }
}
