// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use taxlens_attom::{AttomConfig, DEFAULT_BASE_URL};
use url::Url;

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "taxlens";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_LEVEL: &str = "warn";

pub const CONFIG_PATH_ENV: &str = "TAXLENS_CONFIG_PATH";
pub const API_KEY_ENV: &str = "TAXLENS_ATTOM_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub attom: Attom,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            attom: Attom::default(),
            logging: Logging::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Attom {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Attom {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    pub level: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    /// Does not create the directory; nothing is ever written there.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put settings under [attom] and [logging]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(timeout) = &self.attom.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "attom.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(base_url) = &self.attom.base_url {
            let parsed = Url::parse(base_url).with_context(|| {
                format!(
                    "attom.base_url in {} is not a valid URL: {base_url:?}",
                    path.display()
                )
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!(
                    "attom.base_url in {} must use http or https, got {:?}",
                    path.display(),
                    parsed.scheme()
                );
            }
        }

        if let Some(level) = &self.logging.level
            && level.trim().is_empty()
        {
            bail!("logging.level in {} must not be empty", path.display());
        }

        Ok(())
    }

    pub fn attom_base_url(&self) -> &str {
        self.attom
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn attom_timeout(&self) -> Result<Duration> {
        parse_duration(self.attom.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    /// The environment variable wins over the file when set and non-empty.
    pub fn attom_api_key(&self) -> Option<String> {
        env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                self.attom
                    .api_key
                    .clone()
                    .filter(|key| !key.trim().is_empty())
            })
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn attom_config(&self) -> Result<AttomConfig> {
        let api_key = self.attom_api_key().ok_or_else(|| {
            anyhow!("ATTOM API key not configured -- set attom.api_key or {API_KEY_ENV}")
        })?;
        Ok(AttomConfig {
            api_key,
            base_url: self.attom_base_url().to_owned(),
            timeout: self.attom_timeout()?,
        })
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# taxlens config\n# Place this file at: {}\n\nversion = 1\n\n[attom]\n# Optional here; {} overrides when set.\n# api_key = \"your-attom-api-key\"\nbase_url = \"{}\"\ntimeout = \"{}\"\n\n[logging]\n# Any tracing filter directive; RUST_LOG wins when set.\nlevel = \"{}\"\n",
            path.display(),
            API_KEY_ENV,
            DEFAULT_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
}
