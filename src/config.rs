use crate::{cli::Cli, error::PurgeError};
use serde::Deserialize;
use std::{fmt::Debug, path::Path};

pub const DEFAULT_DRY_RUN: bool = true;
pub const DEFAULT_MAX_AGE_DAYS: u32 = 90;
pub const DEFAULT_EXCLUSION_TAG: &str = "do-not-purge";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// When set, everything is evaluated and logged but nothing is deleted
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
    /// Items strictly older than this many days get purged
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,
    pub radarr: ServiceConfig,
    pub sonarr: ServiceConfig,
}

#[derive(Deserialize, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub api_key: String,
    /// Label of the tag protecting items from the purge
    #[serde(default = "default_exclusion_tag")]
    pub exclusion_tag: String,
}

impl Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("exclusion_tag", &self.exclusion_tag)
            .finish()
    }
}

fn default_dry_run() -> bool {
    DEFAULT_DRY_RUN
}

fn default_max_age_days() -> u32 {
    DEFAULT_MAX_AGE_DAYS
}

fn default_exclusion_tag() -> String {
    DEFAULT_EXCLUSION_TAG.to_string()
}

impl Config {
    /// Read settings from a TOML file.
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = tokio::fs::read_to_string(path).await?;
        Self::parse(&config)
    }

    fn parse(raw: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Build settings from command line arguments and their environment
    /// variable fallbacks.
    pub fn from_cli(cli: &Cli) -> Result<Self, PurgeError> {
        let radarr = ServiceConfig {
            base_url: required(&cli.radarr_base_uri, "RADARR_BASE_URI")?,
            api_key: required(&cli.radarr_api_key, "RADARR_API_KEY")?,
            exclusion_tag: optional(&cli.radarr_exclusion_tag, DEFAULT_EXCLUSION_TAG),
        };
        let sonarr = ServiceConfig {
            base_url: required(&cli.sonarr_base_uri, "SONARR_BASE_URI")?,
            api_key: required(&cli.sonarr_api_key, "SONARR_API_KEY")?,
            exclusion_tag: optional(&cli.sonarr_exclusion_tag, DEFAULT_EXCLUSION_TAG),
        };
        Ok(Self {
            dry_run: cli.dry_run,
            max_age_days: cli.max_age_days,
            radarr,
            sonarr,
        })
    }

    fn validate(&self) -> Result<(), PurgeError> {
        for (name, service) in [("radarr", &self.radarr), ("sonarr", &self.sonarr)] {
            let fields = [
                ("base_url", &service.base_url),
                ("api_key", &service.api_key),
                ("exclusion_tag", &service.exclusion_tag),
            ];
            for (field, value) in fields {
                if value.trim().is_empty() {
                    return Err(PurgeError::Configuration(format!(
                        "'{name}.{field}' must not be blank"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn required(value: &Option<String>, env_name: &str) -> Result<String, PurgeError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(PurgeError::Configuration(format!(
            "missing required environment variable: '{env_name}'"
        ))),
    }
}

fn optional(value: &Option<String>, default: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}
