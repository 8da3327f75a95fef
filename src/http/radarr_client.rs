use super::{ResponseExt, Tag, api_base_url, api_client};
use crate::services::MovieService;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::fmt::Debug;

/// A client for interacting with Radarr API.
/// https://radarr.video/docs/api/
pub struct RadarrClient {
    client: Client,
    base_url: Url,
}

impl RadarrClient {
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let base_url = api_base_url(base_url)?;
        let client = api_client(api_key)?;
        Ok(Self { client, base_url })
    }

    fn movie_url(&self, movie_id: u64) -> anyhow::Result<Url> {
        let url = self.base_url.join("movie/")?.join(&movie_id.to_string())?;
        Ok(url)
    }
}

#[async_trait]
impl MovieService for RadarrClient {
    /// Get all tags.
    /// https://radarr.video/docs/api/#/Tag/get_api_v3_tag
    async fn tags(&self) -> anyhow::Result<Vec<Tag>> {
        let url = self.base_url.join("tag")?;
        self.client
            .get(url)
            .send()
            .await?
            .handle_error("failed to fetch tags from Radarr")
            .await?
            .json_checked()
            .await
    }

    /// Get the whole movie catalog.
    /// https://radarr.video/docs/api/#/Movie/get_api_v3_movie
    async fn movies(&self) -> anyhow::Result<Vec<Movie>> {
        let url = self.base_url.join("movie")?;
        self.client
            .get(url)
            .send()
            .await?
            .handle_error("failed to fetch movies from Radarr")
            .await?
            .json_checked()
            .await
    }

    /// Delete a movie by its ID and all associated files.
    /// https://radarr.video/docs/api/#/Movie/delete_api_v3_movie__id_
    async fn delete_movie(&self, movie_id: u64) -> anyhow::Result<()> {
        let url = self.movie_url(movie_id)?;
        self.client
            .delete(url)
            .query(&[("deleteFiles", "true"), ("addImportExclusion", "false")])
            .send()
            .await?
            .handle_error(&format!("failed to delete movie (id: {movie_id})"))
            .await?;
        Ok(())
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub added: DateTime<Utc>,
    pub tags: Vec<u64>,
}

impl Debug for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.title, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::PurgeError, http::test_server::serve_once};

    #[test]
    fn test_movie_url() {
        let client = RadarrClient::new("http://localhost:7878", "abc-key").unwrap();
        let url = client.movie_url(42).unwrap();
        assert_eq!(url.as_str(), "http://localhost:7878/api/v3/movie/42");
    }

    #[tokio::test]
    async fn test_delete_movie_request() -> anyhow::Result<()> {
        let (base_url, server) = serve_once("200 OK", "").await;
        let client = RadarrClient::new(&base_url, "abc-key")?;

        client.delete_movie(42).await?;

        let request = server.await?;
        assert_eq!(request.method, "DELETE");
        assert_eq!(
            request.target,
            "/api/v3/movie/42?deleteFiles=true&addImportExclusion=false"
        );
        assert_eq!(request.header("x-api-key"), Some("abc-key"));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_movie_failure() {
        let (base_url, server) =
            serve_once("404 Not Found", r#"{"message":"NotFound"}"#).await;
        let client = RadarrClient::new(&base_url, "abc-key").unwrap();

        let err = client.delete_movie(42).await.unwrap_err();

        server.await.unwrap();
        assert!(matches!(
            err.downcast_ref::<PurgeError>(),
            Some(PurgeError::Http { context, status, body })
                if context == "failed to delete movie (id: 42)"
                    && status == "404 Not Found"
                    && body == r#"{"message":"NotFound"}"#
        ));
    }

    #[tokio::test]
    async fn test_tag_lookup_request() -> anyhow::Result<()> {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"id":1,"label":"4k"},{"id":2,"label":"do-not-purge"}]"#,
        )
        .await;
        let client = RadarrClient::new(&base_url, "abc-key")?;

        let tag = client.tag("do-not-purge").await?;

        let request = server.await?;
        assert_eq!(request.method, "GET");
        assert_eq!(request.target, "/api/v3/tag");
        assert_eq!(tag.id, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_movies_bad_shape() {
        let (base_url, server) =
            serve_once("200 OK", r#"[{"id":1,"title":"Heat","tags":[]}]"#).await;
        let client = RadarrClient::new(&base_url, "abc-key").unwrap();

        let err = client.movies().await.unwrap_err();

        let request = server.await.unwrap();
        assert_eq!(request.target, "/api/v3/movie");
        assert!(matches!(
            err.downcast_ref::<PurgeError>(),
            Some(PurgeError::DataConsistency(msg))
                if msg.contains("/api/v3/movie") && msg.contains("missing field `added`")
        ));
    }

    #[test]
    fn test_movie_deser() {
        let raw = r#"[{
            "id": 3,
            "title": "Heat",
            "added": "2024-01-05T10:20:30Z",
            "tags": [1, 4],
            "monitored": true,
            "hasFile": true
        }]"#;
        let movies: Vec<Movie> = serde_json::from_str(raw).unwrap();
        assert_eq!(movies.len(), 1);
        let movie = &movies[0];
        assert_eq!(movie.id, 3);
        assert_eq!(movie.tags, vec![1, 4]);
        assert_eq!(movie.added.to_rfc3339(), "2024-01-05T10:20:30+00:00");
        assert_eq!(format!("{movie:?}"), "Heat(3)");
    }

    #[test]
    fn test_movie_deser_missing_added() {
        let raw = r#"{"id": 3, "title": "Heat", "tags": []}"#;
        assert!(serde_json::from_str::<Movie>(raw).is_err());
    }
}
