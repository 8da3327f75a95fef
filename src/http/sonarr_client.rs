use super::{ResponseExt, Tag, api_base_url, api_client};
use crate::services::SeriesService;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::fmt::Debug;

/// A client for interacting with Sonarr API.
/// https://sonarr.tv/docs/api/#v3
pub struct SonarrClient {
    client: Client,
    base_url: Url,
}

impl SonarrClient {
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let base_url = api_base_url(base_url)?;
        let client = api_client(api_key)?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl SeriesService for SonarrClient {
    /// Get all tags.
    /// https://sonarr.tv/docs/api/#v3/tag/tag/GET/api/v3/tag
    async fn tags(&self) -> anyhow::Result<Vec<Tag>> {
        let url = self.base_url.join("tag")?;
        self.client
            .get(url)
            .send()
            .await?
            .handle_error("failed to fetch tags from Sonarr")
            .await?
            .json_checked()
            .await
    }

    /// Get all series.
    /// https://sonarr.tv/docs/api/#v3/tag/series/GET/api/v3/series
    async fn series(&self) -> anyhow::Result<Vec<Series>> {
        let url = self.base_url.join("series")?;
        self.client
            .get(url)
            .send()
            .await?
            .handle_error("failed to fetch TV series from Sonarr")
            .await?
            .json_checked()
            .await
    }

    /// Get episodes for a given series ID
    /// https://sonarr.tv/docs/api/#v3/tag/episode/GET/api/v3/episode
    async fn episodes(&self, series_id: u64) -> anyhow::Result<Vec<Episode>> {
        let url = self.base_url.join("episode")?;
        self.client
            .get(url)
            .query(&[("seriesId", series_id)])
            .send()
            .await?
            .handle_error(&format!(
                "failed to get all episodes for series (id='{series_id}') from Sonarr"
            ))
            .await?
            .json_checked()
            .await
    }

    /// Get episode files for a given series ID
    /// https://sonarr.tv/docs/api/#v3/tag/episodefile/GET/api/v3/episodefile
    async fn episode_files(&self, series_id: u64) -> anyhow::Result<Vec<EpisodeFile>> {
        let url = self.base_url.join("episodefile")?;
        self.client
            .get(url)
            .query(&[("seriesId", series_id)])
            .send()
            .await?
            .handle_error(&format!(
                "failed to get all episode files for series (id='{series_id}') from Sonarr"
            ))
            .await?
            .json_checked()
            .await
    }

    /// Set the monitored flag through the episodes monitor API
    /// https://sonarr.tv/docs/api/#v3/tag/episode/PUT/api/v3/episode/monitor
    async fn set_episodes_monitored(
        &self,
        episode_ids: &[u64],
        monitored: bool,
    ) -> anyhow::Result<()> {
        if episode_ids.is_empty() {
            debug!("no episodes to update, skipping monitor request");
            return Ok(());
        }
        let url = self.base_url.join("episode/monitor")?;
        let request = serde_json::json!({
            "episodeIds": episode_ids,
            "monitored": monitored,
        });
        self.client
            .put(url)
            .json(&request)
            .send()
            .await?
            .handle_error("failed to set monitored status for episodes")
            .await?;
        Ok(())
    }

    /// Delete episode files from disk in one go
    /// https://sonarr.tv/docs/api/#v3/tag/episodefile/DELETE/api/v3/episodefile/bulk
    async fn delete_episode_files(&self, episode_file_ids: &[u64]) -> anyhow::Result<()> {
        if episode_file_ids.is_empty() {
            debug!("no episode files to delete, skipping bulk delete request");
            return Ok(());
        }
        let url = self.base_url.join("episodefile/bulk")?;
        let request = serde_json::json!({
            "episodeFileIds": episode_file_ids,
        });
        self.client
            .delete(url)
            .json(&request)
            .send()
            .await?
            .handle_error("failed to delete episode files")
            .await?;
        Ok(())
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: u64,
    pub title: String,
    pub tags: Vec<u64>,
}

impl Debug for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.title, self.id)
    }
}

/// An episode as Sonarr catalogs it, not the file on disk.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: u64,
    pub episode_file_id: Option<u64>,
    pub season_number: u32,
    pub episode_number: u32,
    pub title: String,
}

impl Episode {
    /// The backing file, if the episode has been downloaded. Sonarr reports
    /// a missing file as `0`.
    pub fn file_id(&self) -> Option<u64> {
        self.episode_file_id.filter(|id| *id != 0)
    }
}

impl std::fmt::Display for Episode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{:02}e{:02}", self.season_number, self.episode_number)
    }
}

/// The physical file on disk for an episode.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeFile {
    pub id: u64,
    pub date_added: DateTime<Utc>,
}
