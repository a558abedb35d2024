use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use client_core::{ClientConfig, ImageUrls};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "ansang.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    /// Where uploaded images are served from. Defaults to `{api_url}/uploads`.
    pub image_base_url: Option<String>,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000".into(),
            image_base_url: None,
            api_token: None,
            request_timeout_secs: 15,
        }
    }
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub image_base_url: Option<String>,
    pub api_token: Option<String>,
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Reads `config_path` (an error if it is missing) or, without one, the
/// optional `ansang.toml` in the working directory.
pub fn load_settings(config_path: Option<&Path>, overrides: &Overrides) -> Result<Settings> {
    let file = match config_path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
    };
    let mut settings = resolve_settings(file.as_deref(), |key| std::env::var(key).ok());
    settings.apply(overrides);
    Ok(settings)
}

pub fn resolve_settings(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) {
            let text = |key: &str| {
                file_cfg
                    .get(key)
                    .and_then(toml::Value::as_str)
                    .map(str::to_string)
                    .and_then(non_blank)
            };
            if let Some(v) = text("api_url") {
                settings.api_url = v;
            }
            if let Some(v) = text("image_base_url") {
                settings.image_base_url = Some(v);
            }
            if let Some(v) = text("api_token") {
                settings.api_token = Some(v);
            }
            if let Some(v) = file_cfg
                .get("request_timeout_secs")
                .and_then(toml::Value::as_integer)
                .and_then(|secs| u64::try_from(secs).ok())
            {
                settings.request_timeout_secs = v;
            }
        }
    }

    let env = |key: &str| env(key).and_then(non_blank);

    if let Some(v) = env("ANSANG_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("ANSANG_IMAGE_BASE_URL") {
        settings.image_base_url = Some(v);
    }
    if let Some(v) = env("APP__IMAGE_BASE_URL") {
        settings.image_base_url = Some(v);
    }

    if let Some(v) = env("ANSANG_API_TOKEN") {
        settings.api_token = Some(v);
    }
    if let Some(v) = env("APP__API_TOKEN") {
        settings.api_token = Some(v);
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}

fn parse_http_url(raw: &str, what: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid {what} '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{what} must use http or https, got '{raw}'");
    }
    Ok(url)
}

impl Settings {
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(v) = overrides.api_url.clone().and_then(non_blank) {
            self.api_url = v;
        }
        if let Some(v) = overrides.image_base_url.clone().and_then(non_blank) {
            self.image_base_url = Some(v);
        }
        if let Some(v) = overrides.api_token.clone().and_then(non_blank) {
            self.api_token = Some(v);
        }
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        let api_url = parse_http_url(&self.api_url, "api url")?;
        let mut config = ClientConfig::new(api_url.as_str())?;
        config.api_token = self.api_token.clone();
        config.request_timeout = Duration::from_secs(self.request_timeout_secs.max(1));
        Ok(config)
    }

    pub fn image_urls(&self) -> Result<ImageUrls> {
        let base = match &self.image_base_url {
            Some(base) => base.clone(),
            None => format!("{}/uploads", self.api_url.trim_end_matches('/')),
        };
        parse_http_url(&base, "image base url")?;
        Ok(ImageUrls::new(base))
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
