//! YouTube InnerTube integration module.
//!
//! Provides the cookie-authenticated client and the playlist capabilities
//! the migration depends on.

pub mod api;
pub mod client;
pub mod models;

pub use api::{Authenticator, PlaylistApi, WatchLaterListing};
pub use client::InnerTubeAuthenticator;
pub use models::PlaylistVideo;
