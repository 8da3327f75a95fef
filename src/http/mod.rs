pub mod radarr_client;
pub mod sonarr_client;

pub use radarr_client::{Movie, RadarrClient};
pub use sonarr_client::{Episode, EpisodeFile, Series, SonarrClient};

use crate::error::PurgeError;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

trait ResponseExt {
    /// Pass a successful response through, or turn a failed one into
    /// [`PurgeError::Http`] carrying `context`, the status and the body.
    async fn handle_error(self, context: &str) -> anyhow::Result<Response>;

    /// Decode the body, reporting a shape mismatch as
    /// [`PurgeError::DataConsistency`].
    async fn json_checked<T: DeserializeOwned>(self) -> anyhow::Result<T>;
}

impl ResponseExt for Response {
    async fn handle_error(self, context: &str) -> anyhow::Result<Response> {
        let url = self.url().clone();
        let status = self.status();
        if status.is_success() {
            debug!("request to {url} succeeded");
            Ok(self)
        } else {
            let body = self.text().await?;
            debug!("request to {url} failed with status {status}");
            Err(PurgeError::Http {
                context: context.to_string(),
                status: status.to_string(),
                body,
            }
            .into())
        }
    }

    async fn json_checked<T: DeserializeOwned>(self) -> anyhow::Result<T> {
        let url = self.url().clone();
        let body = self.text().await?;
        let value = serde_json::from_str(&body).map_err(|e| {
            PurgeError::DataConsistency(format!("unexpected response from {url}: {e}"))
        })?;
        Ok(value)
    }
}

/// A tag as both Radarr and Sonarr expose it.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub label: String,
    pub id: u64,
}

/// Pick the tag with the given label. Duplicate labels resolve to the first
/// one in the order the service returned them.
pub fn find_tag(tags: Vec<Tag>, label: &str) -> Result<Tag, PurgeError> {
    tags.into_iter()
        .find(|t| t.label == label)
        .ok_or_else(|| PurgeError::NotFound(label.to_string()))
}

/// Resolve the v3 API root under `base_url`, keeping any path prefix the
/// service may be mounted on (e.g. behind a reverse proxy). Only plain `http`
/// is supported, the client is built without a TLS backend.
fn api_base_url(base_url: &str) -> Result<Url, PurgeError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| PurgeError::Configuration(format!("invalid base url '{base_url}': {e}")))?;
    if url.scheme() != "http" {
        return Err(PurgeError::Configuration(format!(
            "unsupported scheme '{}' in base url '{base_url}', only http is supported",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.join("api/v3/")
        .map_err(|e| PurgeError::Configuration(format!("invalid base url '{base_url}': {e}")))
}

fn auth_headers(api_key: &str) -> anyhow::Result<HeaderMap> {
    let mut default_headers = HeaderMap::new();
    let mut header_value = HeaderValue::from_str(api_key)?;
    header_value.set_sensitive(true);
    default_headers.insert("x-api-key", header_value);
    Ok(default_headers)
}

fn api_client(api_key: &str) -> anyhow::Result<Client> {
    let client = ClientBuilder::new()
        .default_headers(auth_headers(api_key)?)
        .build()?;
    Ok(client)
}
