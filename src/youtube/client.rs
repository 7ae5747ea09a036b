//! InnerTube client authenticated with a browser cookie.
//!
//! Speaks the handful of `youtubei/v1` endpoints the web client uses to list,
//! create and edit playlists.

use crate::config::Config;
use crate::error::{MigrateError, Result};
use crate::youtube::api::{Authenticator, PlaylistApi, WatchLaterListing};
use crate::youtube::models::{
    CreatePlaylistResponse, EditPlaylistResponse, PlaylistVideo, SessionResponse, WatchLaterPage,
};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, COOKIE, ORIGIN};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use sha1::{Digest, Sha1};
use std::collections::HashSet;

/// Playlist ID of Watch Later.
pub const WATCH_LATER_ID: &str = "WL";
const WATCH_LATER_BROWSE_ID: &str = "VLWL";
const YOUTUBE_ORIGIN: &str = "https://www.youtube.com";

/// Cookie-derived credentials for signed requests.
#[derive(Clone)]
pub struct Credentials {
    cookie_header: String,
    sapisid: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

impl Credentials {
    /// Parse a `name=value; name=value` cookie string as copied from a browser.
    ///
    /// # Errors
    /// Returns `MigrateError::Authentication` if neither `SAPISID` nor
    /// `__Secure-3PAPISID` is present, since requests cannot be signed without it.
    pub fn from_cookie_string(cookie: &str) -> Result<Self> {
        let pairs: Vec<(&str, &str)> = cookie
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .map(|(name, value)| (name.trim(), value.trim()))
            .collect();

        let find = |wanted: &str| {
            pairs
                .iter()
                .find(|(name, value)| *name == wanted && !value.is_empty())
                .map(|(_, value)| value.to_string())
        };

        let sapisid = find("SAPISID")
            .or_else(|| find("__Secure-3PAPISID"))
            .ok_or_else(|| {
                MigrateError::Authentication(
                    "cookie has no SAPISID value; copy the full cookie of a signed-in youtube.com tab"
                        .to_string(),
                )
            })?;

        Ok(Self {
            cookie_header: cookie.trim().to_string(),
            sapisid,
        })
    }

    /// `Authorization` header value for a request made at `timestamp` (unix seconds).
    pub fn authorization(&self, timestamp: i64) -> String {
        let digest = Sha1::digest(format!("{} {} {}", timestamp, self.sapisid, YOUTUBE_ORIGIN));
        let hex: String = digest.iter().map(|byte| format!("{:02x}", byte)).collect();
        format!("SAPISIDHASH {}_{}", timestamp, hex)
    }
}

/// InnerTube web client bound to one signed-in account.
#[derive(Debug, Clone)]
pub struct InnerTubeClient {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the InnerTube API
    base_url: String,
    /// Cookie and SAPISID used to sign requests
    credentials: Credentials,
    /// `context` object sent with every request
    context: Value,
}

impl InnerTubeClient {
    /// Create a client from configuration and parsed credentials.
    ///
    /// No request is made; see [`InnerTubeClient::verify_session`].
    pub fn new(config: &Config, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/youtubei/v1", YOUTUBE_ORIGIN),
            credentials,
            context: json!({
                "client": {
                    "clientName": "WEB",
                    "clientVersion": config.client_version,
                    "hl": config.hl,
                    "gl": config.gl,
                }
            }),
        })
    }

    /// POST `body` (plus the client context) to an InnerTube endpoint.
    ///
    /// Errors are returned as a human-readable reason so each caller can
    /// attach its own stage.
    async fn post<T: DeserializeOwned>(&self, endpoint: &str, mut body: Value) -> Result<T, String> {
        body["context"] = self.context.clone();
        let url = format!("{}/{}", self.base_url, endpoint);
        let timestamp = chrono::Utc::now().timestamp();

        tracing::debug!(%endpoint, "innertube request");

        let response = self
            .client
            .post(&url)
            .query(&[("prettyPrint", "false")])
            .header(COOKIE, &self.credentials.cookie_header)
            .header(AUTHORIZATION, self.credentials.authorization(timestamp))
            .header(ORIGIN, YOUTUBE_ORIGIN)
            .header("X-Origin", YOUTUBE_ORIGIN)
            .header(CACHE_CONTROL, "no-cache")
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request to {} failed: {}", endpoint, e))?;

        let status = response.status();
        tracing::debug!(%endpoint, %status, "innertube response");
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("YouTube API error ({}): {}", status, error_text));
        }

        response
            .json()
            .await
            .map_err(|e| format!("failed to parse {} response: {}", endpoint, e))
    }

    /// Check that the cookie establishes a signed-in session.
    pub async fn verify_session(&self) -> Result<()> {
        let session: SessionResponse = self
            .post("account/account_menu", json!({}))
            .await
            .map_err(MigrateError::Authentication)?;

        if session.logged_out() {
            return Err(MigrateError::Authentication(
                "YouTube reports the cookie as signed out; it may have expired".to_string(),
            ));
        }
        Ok(())
    }

    /// Fetch one page of Watch Later, starting over when `continuation` is None.
    pub async fn fetch_watch_later(&self, continuation: Option<&str>) -> Result<WatchLaterPage> {
        let body = match continuation {
            Some(token) => json!({ "continuation": token }),
            None => json!({ "browseId": WATCH_LATER_BROWSE_ID }),
        };

        let response: Value = self.post("browse", body).await.map_err(MigrateError::Fetch)?;
        Ok(WatchLaterPage::from_browse_response(&response))
    }
}

#[async_trait]
impl PlaylistApi for InnerTubeClient {
    async fn create_playlist(&self, name: &str, video_ids: &[String]) -> Result<String> {
        let body = json!({
            "title": name,
            "privacyStatus": "PRIVATE",
            "videoIds": video_ids,
        });

        let created: CreatePlaylistResponse = self
            .post("playlist/create", body)
            .await
            .map_err(MigrateError::PlaylistCreation)?;

        created.playlist_id.ok_or_else(|| {
            MigrateError::PlaylistCreation("response did not include a playlist ID".to_string())
        })
    }

    async fn fetch_watch_later_page(&self) -> Result<Vec<String>> {
        Ok(self.fetch_watch_later(None).await?.video_ids())
    }

    async fn remove_from_watch_later(&self, video_ids: &[String]) -> Result<()> {
        let body = json!({
            "playlistId": WATCH_LATER_ID,
            "actions": removal_actions(video_ids),
        });

        let edited: EditPlaylistResponse = self
            .post("browse/edit_playlist", body)
            .await
            .map_err(MigrateError::Removal)?;

        if !edited.succeeded() {
            return Err(MigrateError::Removal(format!(
                "edit_playlist returned status {}",
                edited.status.as_deref().unwrap_or("<none>")
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl WatchLaterListing for InnerTubeClient {
    async fn fetch_watch_later_all(&self) -> Result<Vec<PlaylistVideo>> {
        let mut videos = Vec::new();
        let mut guard = ContinuationGuard::default();
        let mut page = self.fetch_watch_later(None).await?;

        loop {
            tracing::debug!(count = page.videos.len(), "watch later page");
            let added = page.videos.len();
            videos.extend(page.videos);
            match guard.follow(page.continuation, added) {
                Some(token) => page = self.fetch_watch_later(Some(&token)).await?,
                None => break,
            }
        }

        Ok(videos)
    }
}

/// Decides whether a continuation token is worth following.
///
/// Pagination stops on a page that added no videos or on a token that was
/// already followed.
#[derive(Debug, Default)]
struct ContinuationGuard {
    seen: HashSet<String>,
}

impl ContinuationGuard {
    /// Returns the token to request next, or `None` to stop paginating.
    fn follow(&mut self, token: Option<String>, added: usize) -> Option<String> {
        let token = token?;
        if added == 0 {
            tracing::warn!("continuation page added no videos, stopping");
            return None;
        }
        if !self.seen.insert(token.clone()) {
            tracing::warn!("continuation token repeated, stopping");
            return None;
        }
        Some(token)
    }
}

fn removal_actions(video_ids: &[String]) -> Vec<Value> {
    video_ids
        .iter()
        .map(|id| {
            json!({
                "action": "ACTION_REMOVE_VIDEO_BY_VIDEO_ID",
                "removedVideoId": id,
            })
        })
        .collect()
}

/// Authenticates cookies against the live InnerTube API.
#[derive(Debug, Clone, Default)]
pub struct InnerTubeAuthenticator {
    config: Config,
}

impl InnerTubeAuthenticator {
    /// Create an authenticator whose sessions use `config` for the request
    /// context and timeouts.
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Authenticator for InnerTubeAuthenticator {
    type Session = InnerTubeClient;

    async fn authenticate(&self, cookie: &str) -> Result<InnerTubeClient> {
        let credentials = Credentials::from_cookie_string(cookie)?;
        let client = InnerTubeClient::new(&self.config, credentials)?;
        client.verify_session().await?;
        Ok(client)
    }
}
