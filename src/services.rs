//! The operations the cleaners need from Radarr and Sonarr.
//!
//! The HTTP clients in [`crate::http`] implement these traits; tests swap in
//! recording stubs.

use crate::http::{Episode, EpisodeFile, Movie, Series, Tag, find_tag};
use async_trait::async_trait;

#[async_trait]
pub trait MovieService: Send + Sync {
    async fn tags(&self) -> anyhow::Result<Vec<Tag>>;

    /// Look up a tag by its exact label.
    async fn tag(&self, label: &str) -> anyhow::Result<Tag> {
        let tags = self.tags().await?;
        Ok(find_tag(tags, label)?)
    }

    async fn movies(&self) -> anyhow::Result<Vec<Movie>>;

    /// Delete a movie together with its files, without adding it to the
    /// import exclusion list.
    async fn delete_movie(&self, movie_id: u64) -> anyhow::Result<()>;
}

#[async_trait]
pub trait SeriesService: Send + Sync {
    async fn tags(&self) -> anyhow::Result<Vec<Tag>>;

    /// Look up a tag by its exact label.
    async fn tag(&self, label: &str) -> anyhow::Result<Tag> {
        let tags = self.tags().await?;
        Ok(find_tag(tags, label)?)
    }

    async fn series(&self) -> anyhow::Result<Vec<Series>>;

    /// All catalog entries of a series, downloaded or not.
    async fn episodes(&self, series_id: u64) -> anyhow::Result<Vec<Episode>>;

    async fn episode_files(&self, series_id: u64) -> anyhow::Result<Vec<EpisodeFile>>;

    /// Must accept an empty id list.
    async fn set_episodes_monitored(
        &self,
        episode_ids: &[u64],
        monitored: bool,
    ) -> anyhow::Result<()>;

    /// Must accept an empty id list.
    async fn delete_episode_files(&self, episode_file_ids: &[u64]) -> anyhow::Result<()>;
}
