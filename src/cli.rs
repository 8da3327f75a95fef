use crate::logging::LoggingSettings;
use clap::{ArgAction, Parser, builder::BoolishValueParser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "Purgarr",
    version,
    about = "Purgarr deletes movies and TV episodes older than a given age from your *arr stack."
)]
pub struct Cli {
    /// Only log what would be purged. Set to `false` to actually delete files
    #[clap(long, env = "DRY_RUN", default_value_t = true, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub dry_run: bool,
    /// Movies and episodes older than this many days are purged
    #[clap(long, env = "MAX_AGE_DAYS", default_value_t = 90)]
    pub max_age_days: u32,
    /// Radarr base address, e.g. http://localhost:7878
    #[clap(long, env = "RADARR_BASE_URI")]
    pub radarr_base_uri: Option<String>,
    /// Radarr API key
    #[clap(long, env = "RADARR_API_KEY", hide_env_values = true)]
    pub radarr_api_key: Option<String>,
    /// Radarr tag protecting movies from the purge [default: do-not-purge]
    #[clap(long, env = "RADARR_EXCLUSION_TAG_NAME")]
    pub radarr_exclusion_tag: Option<String>,
    /// Sonarr base address, e.g. http://localhost:8989
    #[clap(long, env = "SONARR_BASE_URI")]
    pub sonarr_base_uri: Option<String>,
    /// Sonarr API key
    #[clap(long, env = "SONARR_API_KEY", hide_env_values = true)]
    pub sonarr_api_key: Option<String>,
    /// Sonarr tag protecting series from the purge [default: do-not-purge]
    #[clap(long, env = "SONARR_EXCLUSION_TAG_NAME")]
    pub sonarr_exclusion_tag: Option<String>,
    /// Set the log level, optionally per target, e.g. `off,purgarr=debug`
    #[clap(short, long, default_value = "info", env = "LOG_LEVEL")]
    pub log_level: LoggingSettings,
    /// Path to a TOML config file. When given, it replaces all the settings
    /// above except the log level
    #[clap(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_boolish_dry_run() {
        for (raw, expected) in [("no", false), ("0", false), ("yes", true), ("true", true)] {
            let cli = Cli::try_parse_from(["purgarr", "--dry-run", raw]).unwrap();
            assert_eq!(cli.dry_run, expected, "{raw}");
        }
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::try_parse_from(["purgarr", "-c", "purgarr.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("purgarr.toml")));
    }
}
