//! Configuration file support for artifact-gate.
//!
//! Provides YAML-based configuration through `artifact-gate.config.yml` files,
//! including the raw file schema, file loading, and validation into
//! [`GateSettings`].

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, warn};

use crate::adapters::outbound::network::api_headers::with_trailing_slash;
use crate::adapters::outbound::network::DEFAULT_PACKAGIST_URL;
use crate::gate::domain::{Credentials, LicenseAllowList, PolicyConfig, Severity};
use crate::gate::services::ScanTtl;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "artifact-gate.config.yml";

pub const DEFAULT_API_URL: &str = "https://api-sca.checkmarx.net";
pub const DEFAULT_AUTHENTICATION_URL: &str = "https://platform.checkmarx.net/";

/// A scalar that may be written as a number or a string in YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Text(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Integer(value) => write!(f, "{}", value),
            Scalar::Text(value) => write!(f, "{}", value),
        }
    }
}

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub authentication_url: Option<String>,
    pub data_expiration_time: Option<Scalar>,
    pub security_risk_threshold: Option<String>,
    pub licenses_allowed: Option<String>,
    pub packagist_repository: Option<String>,
    pub private_packages_endpoint: Option<bool>,
    pub account: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Validated settings the composition root is built from.
#[derive(Debug, Clone)]
pub struct GateSettings {
    pub api_url: String,
    pub authentication_url: String,
    pub packagist_url: String,
    pub ttl: ScanTtl,
    pub policy: PolicyConfig,
    pub private_packages_endpoint: bool,
    /// `None` runs the gate in unauthenticated mode
    pub credentials: Option<Credentials>,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            api_url: with_trailing_slash(DEFAULT_API_URL),
            authentication_url: with_trailing_slash(DEFAULT_AUTHENTICATION_URL),
            packagist_url: DEFAULT_PACKAGIST_URL.to_string(),
            ttl: ScanTtl::default(),
            policy: PolicyConfig::default(),
            private_packages_endpoint: false,
            credentials: None,
        }
    }
}

impl GateSettings {
    /// Validates a config file, reading password indirections from the process environment.
    pub fn from_config(config: &ConfigFile) -> Result<Self> {
        Self::from_config_with_env(config, |name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_config`] with an explicit environment lookup.
    pub fn from_config_with_env<F>(config: &ConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let threshold = match config.security_risk_threshold.as_deref() {
            None => Severity::None,
            Some(raw) => raw.parse::<Severity>().map_err(|e| {
                anyhow::anyhow!(
                    "Invalid config: security_risk_threshold: {}\n\n\
                     💡 Hint: Use one of None, Low, Medium, High or Critical.",
                    e
                )
            })?,
        };

        let ttl = match &config.data_expiration_time {
            None => ScanTtl::default(),
            Some(raw) => ScanTtl::parse(&raw.to_string()),
        };

        let allowed_licenses =
            LicenseAllowList::parse(config.licenses_allowed.as_deref().unwrap_or_default());

        Ok(Self {
            api_url: with_trailing_slash(config.api_url.as_deref().unwrap_or(DEFAULT_API_URL)),
            authentication_url: with_trailing_slash(
                config
                    .authentication_url
                    .as_deref()
                    .unwrap_or(DEFAULT_AUTHENTICATION_URL),
            ),
            packagist_url: config
                .packagist_repository
                .as_deref()
                .unwrap_or(DEFAULT_PACKAGIST_URL)
                .trim_end_matches('/')
                .to_string(),
            ttl,
            policy: PolicyConfig::new(threshold, allowed_licenses),
            private_packages_endpoint: config.private_packages_endpoint.unwrap_or(false),
            credentials: resolve_credentials(config, env),
        })
    }
}

/// All three keys present yields credentials. A partial set is logged and ignored.
fn resolve_credentials<F>(config: &ConfigFile, env: F) -> Option<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
    let fields = [
        ("account", present(&config.account)),
        ("username", present(&config.username)),
        ("password", present(&config.password)),
    ];

    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, is_present)| !is_present)
        .map(|(name, _)| *name)
        .collect();

    if missing.len() == fields.len() {
        return None;
    }
    if !missing.is_empty() {
        error!(
            missing = ?missing,
            "Incomplete credentials in the configuration, running unauthenticated"
        );
        return None;
    }

    let (account, username, password) = (
        config.account.clone().unwrap_or_default(),
        config.username.clone().unwrap_or_default(),
        config.password.clone().unwrap_or_default(),
    );
    let password = env(&password).unwrap_or(password);
    Some(Credentials::new(account, username, password))
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    let urls = [
        ("api_url", &config.api_url),
        ("authentication_url", &config.authentication_url),
        ("packagist_repository", &config.packagist_repository),
    ];
    for (key, value) in urls {
        if let Some(url) = value {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!(
                    "Invalid config: {} must be an http(s) URL, got '{}'.\n\n\
                     💡 Hint: Include the scheme, e.g. \"https://api-sca.checkmarx.net\".",
                    key,
                    url
                );
            }
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        warn!(field = %key, "Unknown config field will be ignored");
    }
}
