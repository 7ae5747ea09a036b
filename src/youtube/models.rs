//! InnerTube response models and listing extraction.
//!
//! Browse responses are deeply nested and their layout shifts between client
//! versions, so playlist entries are located by renderer name rather than by
//! a fixed path.

use serde::Deserialize;
use serde_json::Value;

/// Title YouTube shows for videos the account can no longer see.
pub const PRIVATE_VIDEO_TITLE: &str = "[Private video]";

/// One entry of a playlist listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistVideo {
    /// YouTube video ID (empty if the renderer carried none)
    pub id: String,
    /// Display title (empty if the renderer carried none)
    pub title: String,
}

impl PlaylistVideo {
    /// Create a video entry from its ID and display title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Whether YouTube reports this entry as a private video.
    pub fn is_private(&self) -> bool {
        self.title == PRIVATE_VIDEO_TITLE
    }

    fn from_renderer(renderer: &Value) -> Self {
        let id = renderer
            .get("videoId")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Self::new(id, renderer.get("title").map(text_of).unwrap_or_default())
    }
}

/// One page of the Watch Later listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchLaterPage {
    /// Entries in playlist order
    pub videos: Vec<PlaylistVideo>,
    /// Token for the next page, if any
    pub continuation: Option<String>,
}

impl WatchLaterPage {
    /// Extract entries and the continuation token from a `browse` response.
    ///
    /// Works for both the initial `VLWL` browse and continuation requests.
    pub fn from_browse_response(response: &Value) -> Self {
        let mut renderers = Vec::new();
        collect_renderers(response, "playlistVideoRenderer", &mut renderers);

        let mut continuations = Vec::new();
        collect_renderers(response, "continuationItemRenderer", &mut continuations);
        let continuation = continuations.into_iter().find_map(|item| {
            item.pointer("/continuationEndpoint/continuationCommand/token")
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        Self {
            videos: renderers.into_iter().map(PlaylistVideo::from_renderer).collect(),
            continuation,
        }
    }

    /// IDs of all entries that carry one.
    pub fn video_ids(&self) -> Vec<String> {
        self.videos
            .iter()
            .filter(|video| !video.id.is_empty())
            .map(|video| video.id.clone())
            .collect()
    }
}

/// Depth-first search for every object stored under `key`.
fn collect_renderers<'a>(value: &'a Value, key: &str, found: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                if name == key {
                    found.push(child);
                } else {
                    collect_renderers(child, key, found);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_renderers(item, key, found);
            }
        }
        _ => {}
    }
}

/// Flatten an InnerTube text object (`simpleText` or `runs`).
fn text_of(value: &Value) -> String {
    if let Some(text) = value.get("simpleText").and_then(Value::as_str) {
        return text.to_string();
    }
    value
        .get("runs")
        .and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter_map(|run| run.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Response of `playlist/create`.
#[derive(Debug, Deserialize)]
pub struct CreatePlaylistResponse {
    /// ID of the new playlist
    #[serde(rename = "playlistId")]
    pub playlist_id: Option<String>,
}

/// Response of `browse/edit_playlist`.
#[derive(Debug, Deserialize)]
pub struct EditPlaylistResponse {
    /// `STATUS_SUCCEEDED` when every action was applied
    pub status: Option<String>,
}

impl EditPlaylistResponse {
    /// Whether YouTube reported `STATUS_SUCCEEDED` for the edit.
    pub fn succeeded(&self) -> bool {
        self.status.as_deref() == Some("STATUS_SUCCEEDED")
    }
}

/// Response envelope carrying the session state.
#[derive(Debug, Default, Deserialize)]
pub struct SessionResponse {
    #[serde(rename = "responseContext", default)]
    pub response_context: ApiResponseContext,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiResponseContext {
    #[serde(rename = "mainAppWebResponseContext")]
    pub main_app_web: Option<ApiMainAppWebContext>,
}

#[derive(Debug, Deserialize)]
pub struct ApiMainAppWebContext {
    /// True when the cookie did not establish a signed-in session
    #[serde(rename = "loggedOut")]
    pub logged_out: Option<bool>,
}

impl SessionResponse {
    /// Whether the session check says the cookie is not signed in.
    ///
    /// # Details
    /// A missing `loggedOut` flag counts as signed in.
    pub fn logged_out(&self) -> bool {
        self.response_context
            .main_app_web
            .as_ref()
            .and_then(|ctx| ctx.logged_out)
            .unwrap_or(false)
    }
}
