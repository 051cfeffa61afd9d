use std::{fs, io, path::Path, time::Duration};

use anyhow::{ensure, Context};
use serde::Deserialize;
use url::Url;

use crate::list::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

pub const SETTINGS_FILE: &str = "directory.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".into(),
            request_timeout_secs: 10,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    pub fn api_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(&self.api_base_url)
            .with_context(|| format!("invalid api_base_url '{}'", self.api_base_url))?;
        ensure!(
            !url.cannot_be_a_base(),
            "api_base_url '{}' cannot be used as a base",
            self.api_base_url
        );
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.api_url()?;
        ensure!(
            self.request_timeout_secs > 0,
            "request_timeout_secs must be positive"
        );
        ensure!(
            PAGE_SIZE_OPTIONS.contains(&self.page_size),
            "page_size must be one of {PAGE_SIZE_OPTIONS:?}, got {}",
            self.page_size
        );
        Ok(())
    }
}

/// Reads `directory.toml` from the working directory if present, then
/// applies environment overrides.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => Settings::default(),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    apply_env_overrides(&mut settings, env)?;
    settings.validate()?;
    Ok(settings)
}

pub fn apply_env_overrides(
    settings: &mut Settings,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = env("DIRECTORY_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .parse()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
    }

    if let Some(v) = env("APP__PAGE_SIZE") {
        settings.page_size = v
            .parse()
            .with_context(|| format!("APP__PAGE_SIZE is not a number: '{v}'"))?;
    }

    Ok(())
}
