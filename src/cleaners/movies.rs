use crate::{
    config::Config,
    http::{Movie, RadarrClient},
    policy::{KeepReason, Partition, PurgePolicy, Purgeable, Verdict},
    services::MovieService,
};
use chrono::{DateTime, Utc};
use log::{debug, info};

impl Purgeable for Movie {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.title
    }

    fn tags(&self) -> &[u64] {
        &self.tags
    }

    fn added(&self) -> DateTime<Utc> {
        self.added
    }
}

/// MoviesCleaner is responsible for deleting movies from Radarr once they are
/// older than the configured maximum age.
pub struct MoviesCleaner {
    radarr: Box<dyn MovieService>,
    exclusion_tag: String,
    max_age_days: u32,
    dry_run: bool,
}

impl MoviesCleaner {
    pub fn new(radarr: Box<dyn MovieService>, config: &Config) -> Self {
        Self {
            radarr,
            exclusion_tag: config.radarr.exclusion_tag.clone(),
            max_age_days: config.max_age_days,
            dry_run: config.dry_run,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let radarr = RadarrClient::new(&config.radarr.base_url, &config.radarr.api_key)?;
        Ok(Self::new(Box::new(radarr), config))
    }

    /// Purge every movie older than the maximum age unless it carries the
    /// exclusion tag. Returns the number of purged movies.
    pub async fn purge(&self) -> anyhow::Result<usize> {
        self.purge_at(Utc::now()).await
    }

    async fn purge_at(&self, now: DateTime<Utc>) -> anyhow::Result<usize> {
        let exclusion_tag = self.radarr.tag(&self.exclusion_tag).await?;
        debug!(
            "exclusion tag '{}' resolved to id {}",
            exclusion_tag.label, exclusion_tag.id
        );
        let policy = PurgePolicy::new(exclusion_tag.id, self.max_age_days);

        let movies = self.radarr.movies().await?;
        debug!("fetched {} movies from Radarr", movies.len());

        let decisions = policy.evaluate(&movies, now);
        for decision in &decisions {
            let movie = decision.item;
            match decision.verdict {
                Verdict::Keep(KeepReason::Excluded) => {
                    info!(
                        "Skipping movie with tag '{}': \"{}\"",
                        self.exclusion_tag, movie.title
                    );
                }
                Verdict::Keep(KeepReason::TooYoung) => {
                    info!("Keeping movie: {decision}");
                }
                Verdict::Purge => {
                    info!("PURGING movie: {decision}");
                    if self.dry_run {
                        debug!("dry run, not deleting {movie:?}");
                    } else {
                        self.radarr.delete_movie(movie.id).await?;
                    }
                }
            }
        }

        let Partition { keep, purge }: Partition<'_, Movie> = decisions.into_iter().collect();
        debug!("kept {} movies", keep.len());
        info!("Deleted {} movies", purge.len());
        Ok(purge.len())
    }
}
