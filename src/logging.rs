use log::LevelFilter;
use std::str::FromStr;

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// setup logging for the application including line format as well as the main
/// log level and per-target log levels (if provided)
pub fn setup_logging(settings: LoggingSettings) -> anyhow::Result<()> {
    let mut cfg = fern::Dispatch::new()
        .level(settings.root_level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{timestamp} [{level}] {message}",
                timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                level = record.level(),
                message = message,
            ))
        })
        .chain(std::io::stdout());

    for (log_target, level) in settings.other_levels {
        cfg = cfg.level_for(log_target, level);
    }
    cfg.apply()?;
    Ok(())
}

/// Log a banner line set apart from the regular output.
pub fn section(title: &str) {
    let rule = "=".repeat(title.len());
    log::info!("{rule}");
    log::info!("{title}");
    log::info!("{rule}");
}

#[derive(Debug, Clone)]
/// The root log level plus optional per-target overrides.
///
/// Examples:
///   - `info`
///   - `off,purgarr=debug,reqwest=info`
///   - `warn,purgarr::cleaners=info,purgarr::http=debug`
pub struct LoggingSettings {
    pub root_level: LevelFilter,
    pub other_levels: Vec<(String, LevelFilter)>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            root_level: DEFAULT_LEVEL,
            other_levels: Vec::new(),
        }
    }
}

impl FromStr for LoggingSettings {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let root_level = parts.next().unwrap_or("info");
        let root_level = LevelFilter::from_str(root_level.trim()).unwrap_or(DEFAULT_LEVEL);
        let other_levels = parts
            .filter_map(|s| {
                let (log_target, level) = s.split_once('=')?;
                let level = LevelFilter::from_str(level.trim()).unwrap_or(DEFAULT_LEVEL);
                Some((log_target.trim().to_string(), level))
            })
            .collect::<Vec<_>>();

        Ok(Self {
            root_level,
            other_levels,
        })
    }
}
