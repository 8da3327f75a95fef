use crate::{
    config::Config,
    error::PurgeError,
    http::{Episode, EpisodeFile, Series, SonarrClient},
    policy::{PurgePolicy, Purgeable, Verdict},
    services::SeriesService,
};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::fmt::Display;

/// An episode paired with the file backing it. The file's date decides the
/// episode's age.
struct EpisodeWithFile<'a> {
    series: &'a Series,
    episode: &'a Episode,
    file: &'a EpisodeFile,
}

impl Purgeable for EpisodeWithFile<'_> {
    fn id(&self) -> u64 {
        self.episode.id
    }

    fn name(&self) -> &str {
        &self.episode.title
    }

    fn tags(&self) -> &[u64] {
        &self.series.tags
    }

    fn added(&self) -> DateTime<Utc> {
        self.file.date_added
    }
}

impl Display for EpisodeWithFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(episodeFileId='{}') (series='{}') ({})",
            self.file.id, self.series.title, self.episode
        )
    }
}

/// The one file in `files` carrying `file_id`. No match and several matches
/// are both consistency errors.
fn episode_file<'a>(
    series: &Series,
    episode: &Episode,
    file_id: u64,
    files: &'a [EpisodeFile],
) -> Result<&'a EpisodeFile, PurgeError> {
    let mut matches = files.iter().filter(|f| f.id == file_id);
    let problem = match (matches.next(), matches.next()) {
        (Some(file), None) => return Ok(file),
        (None, _) => format!("could not find matching episode file with ID: {file_id}."),
        (Some(_), Some(_)) => format!("found more than one episode file with ID: {file_id}."),
    };
    Err(PurgeError::DataConsistency(format!(
        "{problem} (series='{}') (title='{}') (seasonNumber='{}') (episodeNumber='{}')",
        series.title, episode.title, episode.season_number, episode.episode_number
    )))
}

/// Pair each downloaded episode with its file, lazily and in episode order.
/// Episodes without a file are left out. A file id that cannot be resolved
/// yields an error in that episode's place, after the episodes before it.
fn episodes_with_files<'a>(
    series: &'a Series,
    episodes: &'a [Episode],
    files: &'a [EpisodeFile],
) -> impl Iterator<Item = Result<EpisodeWithFile<'a>, PurgeError>> + 'a {
    episodes
        .iter()
        .filter_map(|episode| episode.file_id().map(|file_id| (episode, file_id)))
        .map(move |(episode, file_id)| {
            let file = episode_file(series, episode, file_id, files)?;
            Ok::<_, PurgeError>(EpisodeWithFile {
                series,
                episode,
                file,
            })
        })
}

/// SeriesCleaner is responsible for deleting episode files from Sonarr once
/// they are older than the configured maximum age. Series themselves are kept.
pub struct SeriesCleaner {
    sonarr: Box<dyn SeriesService>,
    exclusion_tag: String,
    max_age_days: u32,
    dry_run: bool,
}

impl SeriesCleaner {
    pub fn new(sonarr: Box<dyn SeriesService>, config: &Config) -> Self {
        Self {
            sonarr,
            exclusion_tag: config.sonarr.exclusion_tag.clone(),
            max_age_days: config.max_age_days,
            dry_run: config.dry_run,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let sonarr = SonarrClient::new(&config.sonarr.base_url, &config.sonarr.api_key)?;
        Ok(Self::new(Box::new(sonarr), config))
    }

    /// Purge every episode file older than the maximum age, skipping series
    /// that carry the exclusion tag. Returns the number of purged episodes.
    pub async fn purge(&self) -> anyhow::Result<usize> {
        self.purge_at(Utc::now()).await
    }

    async fn purge_at(&self, now: DateTime<Utc>) -> anyhow::Result<usize> {
        let exclusion_tag = self.sonarr.tag(&self.exclusion_tag).await?;
        debug!(
            "exclusion tag '{}' resolved to id {}",
            exclusion_tag.label, exclusion_tag.id
        );
        let policy = PurgePolicy::new(exclusion_tag.id, self.max_age_days);

        let all_series = self.sonarr.series().await?;
        debug!("fetched {} series from Sonarr", all_series.len());

        let mut episode_ids = Vec::new();
        let mut episode_file_ids = Vec::new();

        for series in &all_series {
            info!("Processing TV series: \"{}\"...", series.title);

            if series.tags.contains(&exclusion_tag.id) {
                info!(
                    "Skipping TV series with tag '{}': \"{}\"",
                    self.exclusion_tag, series.title
                );
                continue;
            }

            let episodes = self.sonarr.episodes(series.id).await?;
            let files = self.sonarr.episode_files(series.id).await?;
            debug!(
                "{series:?}: {} episodes, {} files",
                episodes.len(),
                files.len()
            );

            for candidate in episodes_with_files(series, &episodes, &files) {
                let candidate = candidate?;
                let decision = policy.classify(&candidate, now);
                match decision.verdict {
                    Verdict::Purge => {
                        info!("PURGING TV episode: {decision} {candidate}");
                        episode_ids.push(candidate.episode.id);
                        episode_file_ids.push(candidate.file.id);
                    }
                    Verdict::Keep(_) => {
                        info!("Keeping TV episode: {decision} {candidate}");
                    }
                }
            }
        }

        info!("Deleted {} TV episodes", episode_ids.len());

        if self.dry_run {
            debug!("dry run, not unmonitoring episodes {episode_ids:?}");
            debug!("dry run, not deleting episode files {episode_file_ids:?}");
        } else {
            // unmonitor first so Sonarr does not grab the episodes again
            self.sonarr
                .set_episodes_monitored(&episode_ids, false)
                .await?;
            self.sonarr.delete_episode_files(&episode_file_ids).await?;
        }

        Ok(episode_ids.len())
    }
}
