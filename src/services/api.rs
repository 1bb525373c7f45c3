//! KeepWatching API client.
//!
//! [`RemoteSource`] is the seam the sync engine talks through; [`HttpRemote`]
//! implements it over `reqwest`.

use crate::models::config::ApiConfig;
use crate::models::{
    AccountNotification, Episode, Movie, MovieWatchStatus, Profile, Show, ShowWatchStatus,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The server answered with a structured error.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// No structured answer: connection failure, timeout, or garbage body.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl RemoteError {
    pub fn api<S: Into<String>>(status: u16, message: S) -> Self {
        RemoteError::Api {
            status,
            message: message.into(),
        }
    }

    pub fn transport<S: Into<String>>(detail: S) -> Self {
        RemoteError::Transport(detail.into())
    }
}

/// Result of a remote call.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Profile image upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Guess the content type from the file extension.
    pub fn from_file_name<S: Into<String>>(file_name: S, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let ext = file_name
            .rsplit('.')
            .next()
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let content_type = match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
        .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }
}

/// Shows of a profile together with their episodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowsPayload {
    pub shows: Vec<Show>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// A newly favorited show and its episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoritedShow {
    pub show: Show,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// Remote source of truth.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch_profiles(&self, account_id: &str) -> RemoteResult<Vec<Profile>>;

    async fn add_profile(&self, account_id: &str, name: &str) -> RemoteResult<Profile>;

    async fn edit_profile(&self, account_id: &str, profile_id: &str, name: &str)
        -> RemoteResult<Profile>;

    async fn update_profile_image(
        &self,
        account_id: &str,
        profile_id: &str,
        upload: ImageUpload,
    ) -> RemoteResult<Profile>;

    async fn delete_profile(&self, account_id: &str, profile_id: &str) -> RemoteResult<()>;

    async fn fetch_shows(&self, account_id: &str, profile_id: &str) -> RemoteResult<ShowsPayload>;

    async fn add_show_favorite(
        &self,
        account_id: &str,
        profile_id: &str,
        tmdb_id: u64,
    ) -> RemoteResult<FavoritedShow>;

    async fn remove_show_favorite(
        &self,
        account_id: &str,
        profile_id: &str,
        show_id: u64,
    ) -> RemoteResult<()>;

    async fn update_show_status(
        &self,
        account_id: &str,
        profile_id: &str,
        show_id: u64,
        status: ShowWatchStatus,
    ) -> RemoteResult<Show>;

    async fn fetch_movies(&self, account_id: &str, profile_id: &str) -> RemoteResult<Vec<Movie>>;

    async fn add_movie_favorite(
        &self,
        account_id: &str,
        profile_id: &str,
        tmdb_id: u64,
    ) -> RemoteResult<Movie>;

    async fn remove_movie_favorite(
        &self,
        account_id: &str,
        profile_id: &str,
        movie_id: u64,
    ) -> RemoteResult<()>;

    async fn update_movie_status(
        &self,
        account_id: &str,
        profile_id: &str,
        movie_id: u64,
        status: MovieWatchStatus,
    ) -> RemoteResult<Movie>;

    async fn fetch_system_notifications(
        &self,
        account_id: &str,
    ) -> RemoteResult<Vec<AccountNotification>>;

    /// Returns the account's remaining notifications.
    async fn dismiss_system_notification(
        &self,
        account_id: &str,
        notification_id: u64,
    ) -> RemoteResult<Vec<AccountNotification>>;
}

/// Single-record success body.
#[derive(Debug, Deserialize)]
struct ResultBody<T> {
    result: T,
}

/// Collection success body.
#[derive(Debug, Deserialize)]
struct ResultsBody<T> {
    results: T,
}

/// Account notifications body.
#[derive(Debug, Deserialize)]
struct NotificationsBody {
    notifications: Vec<AccountNotification>,
}

/// Error body; only `message` is required.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP implementation of [`RemoteSource`].
pub struct HttpRemote {
    config: ApiConfig,
    client: reqwest::Client,
}

impl HttpRemote {
    /// Create a new API client.
    pub fn new(config: ApiConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("keepwatching/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Build `/accounts/{a}/profiles[/{p}]...` style URLs with encoded segments.
    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url().to_string();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// Attach bearer authentication when a token is configured.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and sort the outcome into success, API error or transport failure.
    async fn execute(&self, request: reqwest::RequestBuilder) -> RemoteResult<reqwest::Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| RemoteError::transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!("{} {}", status.as_u16(), response.url());
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => Err(RemoteError::api(status.as_u16(), error.message)),
            Err(_) => Err(RemoteError::transport(format!("HTTP {} without error body", status))),
        }
    }

    async fn json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> RemoteResult<T> {
        self.execute(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| RemoteError::transport(format!("unexpected response body: {}", e)))
    }

    async fn result<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> RemoteResult<T> {
        Ok(self.json::<ResultBody<T>>(request).await?.result)
    }

    async fn results<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> RemoteResult<T> {
        Ok(self.json::<ResultsBody<T>>(request).await?.results)
    }

    /// Check that the API answers and accepts our credentials.
    pub async fn verify_connection(&self) -> crate::Result<bool> {
        let response = self.authorize(self.client.get(self.base_url())).send().await?;
        let status = response.status().as_u16();
        Ok(status != 401 && status != 403)
    }
}

#[async_trait]
impl RemoteSource for HttpRemote {
    async fn fetch_profiles(&self, account_id: &str) -> RemoteResult<Vec<Profile>> {
        let url = self.url(&["accounts", account_id, "profiles"]);
        self.results(self.client.get(url)).await
    }

    async fn add_profile(&self, account_id: &str, name: &str) -> RemoteResult<Profile> {
        let url = self.url(&["accounts", account_id, "profiles"]);
        let body = serde_json::json!({ "name": name });
        self.result(self.client.post(url).json(&body)).await
    }

    async fn edit_profile(
        &self,
        account_id: &str,
        profile_id: &str,
        name: &str,
    ) -> RemoteResult<Profile> {
        let url = self.url(&["accounts", account_id, "profiles", profile_id]);
        let body = serde_json::json!({ "name": name });
        self.result(self.client.put(url).json(&body)).await
    }

    async fn update_profile_image(
        &self,
        account_id: &str,
        profile_id: &str,
        upload: ImageUpload,
    ) -> RemoteResult<Profile> {
        let url = self.url(&["upload", "accounts", account_id, "profiles", profile_id]);
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(|e| RemoteError::transport(format!("invalid content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);
        self.result(self.client.post(url).multipart(form)).await
    }

    async fn delete_profile(&self, account_id: &str, profile_id: &str) -> RemoteResult<()> {
        let url = self.url(&["accounts", account_id, "profiles", profile_id]);
        self.execute(self.client.delete(url)).await?;
        Ok(())
    }

    async fn fetch_shows(&self, account_id: &str, profile_id: &str) -> RemoteResult<ShowsPayload> {
        let url = self.url(&["accounts", account_id, "profiles", profile_id, "shows"]);
        self.results(self.client.get(url)).await
    }

    async fn add_show_favorite(
        &self,
        account_id: &str,
        profile_id: &str,
        tmdb_id: u64,
    ) -> RemoteResult<FavoritedShow> {
        let url = self.url(&["accounts", account_id, "profiles", profile_id, "shows", "favorites"]);
        let body = serde_json::json!({ "showTMDBId": tmdb_id });
        self.result(self.client.post(url).json(&body)).await
    }

    async fn remove_show_favorite(
        &self,
        account_id: &str,
        profile_id: &str,
        show_id: u64,
    ) -> RemoteResult<()> {
        let id = show_id.to_string();
        let url = self.url(&["accounts", account_id, "profiles", profile_id, "shows", "favorites", &id]);
        self.execute(self.client.delete(url)).await?;
        Ok(())
    }

    async fn update_show_status(
        &self,
        account_id: &str,
        profile_id: &str,
        show_id: u64,
        status: ShowWatchStatus,
    ) -> RemoteResult<Show> {
        let url = self.url(&["accounts", account_id, "profiles", profile_id, "shows", "watchstatus"]);
        let body = serde_json::json!({ "showId": show_id, "status": status });
        self.result(self.client.put(url).json(&body)).await
    }

    async fn fetch_movies(&self, account_id: &str, profile_id: &str) -> RemoteResult<Vec<Movie>> {
        let url = self.url(&["accounts", account_id, "profiles", profile_id, "movies"]);
        self.results(self.client.get(url)).await
    }

    async fn add_movie_favorite(
        &self,
        account_id: &str,
        profile_id: &str,
        tmdb_id: u64,
    ) -> RemoteResult<Movie> {
        let url = self.url(&["accounts", account_id, "profiles", profile_id, "movies", "favorites"]);
        let body = serde_json::json!({ "movieTMDBId": tmdb_id });
        self.result(self.client.post(url).json(&body)).await
    }

    async fn remove_movie_favorite(
        &self,
        account_id: &str,
        profile_id: &str,
        movie_id: u64,
    ) -> RemoteResult<()> {
        let id = movie_id.to_string();
        let url = self.url(&["accounts", account_id, "profiles", profile_id, "movies", "favorites", &id]);
        self.execute(self.client.delete(url)).await?;
        Ok(())
    }

    async fn update_movie_status(
        &self,
        account_id: &str,
        profile_id: &str,
        movie_id: u64,
        status: MovieWatchStatus,
    ) -> RemoteResult<Movie> {
        let url = self.url(&["accounts", account_id, "profiles", profile_id, "movies", "watchstatus"]);
        let body = serde_json::json!({ "movieId": movie_id, "status": status });
        self.result(self.client.put(url).json(&body)).await
    }

    async fn fetch_system_notifications(
        &self,
        account_id: &str,
    ) -> RemoteResult<Vec<AccountNotification>> {
        let url = self.url(&["accounts", account_id, "notifications"]);
        Ok(self.json::<NotificationsBody>(self.client.get(url)).await?.notifications)
    }

    async fn dismiss_system_notification(
        &self,
        account_id: &str,
        notification_id: u64,
    ) -> RemoteResult<Vec<AccountNotification>> {
        let id = notification_id.to_string();
        let url = self.url(&["accounts", account_id, "notifications", "dismiss", &id]);
        Ok(self.json::<NotificationsBody>(self.client.post(url)).await?.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(base_url: &str) -> HttpRemote {
        HttpRemote::new(ApiConfig {
            base_url: base_url.to_string(),
            token: None,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_url_encodes_segments() {
        let api = remote("http://localhost:3033/api/v1/");
        assert_eq!(
            api.url(&["accounts", "a b", "profiles"]),
            "http://localhost:3033/api/v1/accounts/a%20b/profiles"
        );
    }

    #[test]
    fn test_upload_content_type() {
        assert_eq!(ImageUpload::from_file_name("me.PNG", vec![]).content_type, "image/png");
        assert_eq!(ImageUpload::from_file_name("me.jpeg", vec![]).content_type, "image/jpeg");
        assert_eq!(
            ImageUpload::from_file_name("me", vec![]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_result_body_decodes() {
        let body: ResultsBody<Vec<Profile>> =
            serde_json::from_str(r#"{"message":"ok","results":[{"id":"1","name":"Adam"}]}"#).unwrap();
        assert_eq!(body.results.len(), 1);
    }

    #[test]
    fn test_notifications_body_decodes() {
        let body: NotificationsBody = serde_json::from_str(
            r#"{"message":"ok","notifications":[{"notification_id":1,"message":"Welcome"}]}"#,
        )
        .unwrap();
        assert_eq!(body.notifications[0].message, "Welcome");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let api = remote("http://127.0.0.1:9");
        let err = api.fetch_profiles("1").await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
    }
}
