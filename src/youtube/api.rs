//! Capabilities the migration needs from a YouTube client.

use crate::error::Result;
use crate::youtube::models::PlaylistVideo;
use async_trait::async_trait;

/// Turns a browser cookie string into an authenticated session.
#[async_trait]
pub trait Authenticator {
    type Session: PlaylistApi + Send + Sync;

    async fn authenticate(&self, cookie: &str) -> Result<Self::Session>;
}

/// Playlist operations performed on behalf of a signed-in account.
#[async_trait]
pub trait PlaylistApi {
    /// Create a private playlist holding `video_ids` in order; returns its ID.
    async fn create_playlist(&self, name: &str, video_ids: &[String]) -> Result<String>;

    /// IDs on the first page of Watch Later, fetched fresh on every call.
    async fn fetch_watch_later_page(&self) -> Result<Vec<String>>;

    /// Remove `video_ids` from Watch Later in a single request.
    async fn remove_from_watch_later(&self, video_ids: &[String]) -> Result<()>;
}

/// Full read access to Watch Later, used when exporting it.
#[async_trait]
pub trait WatchLaterListing {
    /// Every entry in playlist order, following continuations to the end.
    async fn fetch_watch_later_all(&self) -> Result<Vec<PlaylistVideo>>;
}
