//! Watch Later migration flow.
//!
//! Loads the exported IDs, copies them into a dated private playlist and,
//! once the user confirms, empties Watch Later page by page.

use crate::error::Result;
use crate::ingest::read_video_ids;
use crate::prompt::Prompter;
use crate::youtube::{Authenticator, PlaylistApi};
use chrono::NaiveDate;
use std::path::Path;
use std::time::Duration;

/// Answers (compared case-insensitively) that confirm clearing Watch Later.
pub const AFFIRMATIVE_ANSWERS: [&str; 2] = ["yes", "y"];

pub(crate) const COOKIE_PROMPT: &str = "\nPlease paste your YouTube cookie string and press Enter:\n> ";
const CONFIRM_PROMPT: &str =
    "\nDo you want to clear your ENTIRE 'Watch Later' playlist now? (y/n): ";

/// Name of the playlist created on `date`, e.g. `WL_2024-03-05`.
pub fn playlist_name(date: NaiveDate) -> String {
    format!("WL_{}", date.format("%Y-%m-%d"))
}

/// Public URL of a playlist.
///
/// # Arguments
/// * `playlist_id` - ID returned by `playlist/create`
///
/// # Returns
/// * `String` - `https://www.youtube.com/playlist?list=<id>`
pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={}", playlist_id)
}

/// Whether a confirmation answer means "yes".
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.to_lowercase();
    AFFIRMATIVE_ANSWERS.contains(&answer.as_str())
}

/// Why the clearing loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A fetch returned no videos
    Emptied,
    /// Fetching a page failed
    FetchFailed(String),
    /// Removing a fetched page failed
    RemovalFailed(String),
}

/// Progress of one clearing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalSummary {
    /// Videos removed by successful batches
    pub total_removed: usize,
    /// Iteration the loop stopped in; the terminating empty fetch counts
    pub iterations: u32,
    pub stop: StopReason,
}

impl RemovalSummary {
    fn report(&self) {
        println!("\n\n--- FINAL SUMMARY ---");
        println!("- Total videos successfully removed: {}", self.total_removed);
        if self.total_removed == 0 && self.iterations > 1 {
            println!("- It seems no videos were removed, despite multiple attempts.");
        }
        match &self.stop {
            StopReason::Emptied => {}
            StopReason::FetchFailed(reason) | StopReason::RemovalFailed(reason) => {
                println!("- Stopped early in iteration {}: {}", self.iterations, reason);
            }
        }
    }
}

/// Empty Watch Later by repeatedly fetching its first page and removing it.
///
/// # Details
/// Each iteration fetches a fresh page; an empty page ends the loop. Every
/// non-empty page is removed in one batch, followed by a pause of `delay`.
/// A failed fetch or removal stops the loop without retrying and the
/// progress so far is kept in the summary.
pub async fn clear_watch_later<A>(api: &A, delay: Duration) -> RemovalSummary
where
    A: PlaylistApi + ?Sized,
{
    let mut total_removed = 0;
    let mut iteration = 1;

    let stop = loop {
        println!(
            "\n--- Iteration {}: Fetching the next page of videos... ---",
            iteration
        );

        let video_ids = match api.fetch_watch_later_page().await {
            Ok(ids) => ids,
            Err(e) => {
                eprintln!("\n❌ CRITICAL ERROR during fetch in iteration {}.", iteration);
                eprintln!("Reason: {}", e);
                tracing::warn!(iteration, error = %e, "watch later fetch failed");
                break StopReason::FetchFailed(e.to_string());
            }
        };

        if video_ids.is_empty() {
            println!("\n'Watch Later' is now empty. Process complete.");
            break StopReason::Emptied;
        }

        println!("Found {} videos. Attempting removal...", video_ids.len());

        if let Err(e) = api.remove_from_watch_later(&video_ids).await {
            eprintln!("❌ Failed to remove page of videos | Reason: {}", e);
            eprintln!("Aborting to prevent further issues.");
            tracing::warn!(iteration, error = %e, "watch later removal failed");
            break StopReason::RemovalFailed(e.to_string());
        }

        total_removed += video_ids.len();
        println!("✅ Successfully removed {} videos.", video_ids.len());

        tokio::time::sleep(delay).await;
        iteration += 1;
    };

    let summary = RemovalSummary {
        total_removed,
        iterations: iteration,
        stop,
    };
    summary.report();
    summary
}

/// Create the dated private playlist from CSV-ordered `video_ids`.
///
/// The IDs are added in reverse so the oldest export entry ends up last,
/// matching the order Watch Later showed them in.
pub async fn create_migration_playlist<A>(
    api: &A,
    video_ids: &[String],
    date: NaiveDate,
) -> Result<String>
where
    A: PlaylistApi + ?Sized,
{
    let name = playlist_name(date);
    let reversed: Vec<String> = video_ids.iter().rev().cloned().collect();

    println!("\nCreating new private playlist named: \"{}\"...", name);
    let playlist_id = api.create_playlist(&name, &reversed).await?;

    println!("Playlist \"{}\" created successfully.", name);
    println!("Added {} videos to the new playlist.", reversed.len());
    println!("View it here: {}", playlist_url(&playlist_id));
    Ok(playlist_id)
}

/// Terminal state of a migration that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No cookie was entered; nothing touched the network
    AbortedNoCookie,
    /// The user declined clearing Watch Later
    AbortedByUser,
    /// Watch Later clearing ran (possibly stopping early)
    Done(RemovalSummary),
}

/// Inputs fixed for one migration run.
#[derive(Debug, Clone)]
pub struct MigrationPlan<'a> {
    /// CSV export to migrate
    pub csv_path: &'a Path,
    /// Date used to name the new playlist
    pub date: NaiveDate,
    /// Pause between removal batches
    pub removal_delay: Duration,
}

/// Load IDs for migration, treating any CSV failure as an empty export.
fn load_video_ids(csv_path: &Path) -> Vec<String> {
    match read_video_ids(csv_path) {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("Warning: could not read '{}': {}", csv_path.display(), e);
            if e.is_file_not_found() {
                eprintln!("Run `wl-migrate export` first to create it.");
            }
            Vec::new()
        }
    }
}

/// Run the full migration.
///
/// # Returns
/// * `Result<Outcome>` - How the run ended, or the error that stopped it
///
/// # Details
/// Authentication and playlist creation failures are fatal and returned as
/// errors. Clearing failures are captured in the returned summary.
pub async fn run<P, Au>(plan: &MigrationPlan<'_>, prompter: &mut P, authenticator: &Au) -> Result<Outcome>
where
    P: Prompter,
    Au: Authenticator,
{
    let video_ids = load_video_ids(plan.csv_path);
    if video_ids.is_empty() {
        println!("No videos found in '{}' to migrate.", plan.csv_path.display());
        println!("You can still proceed to clear your Watch Later if you wish.");
    }

    let cookie = prompter.prompt(COOKIE_PROMPT)?;
    if cookie.is_empty() {
        eprintln!("A cookie is required to proceed. Exiting.");
        return Ok(Outcome::AbortedNoCookie);
    }

    println!("\nAuthenticating with YouTube...");
    let session = authenticator.authenticate(&cookie).await?;
    println!("Authentication successful.");

    if !video_ids.is_empty() {
        create_migration_playlist(&session, &video_ids, plan.date).await?;
    }

    let confirmation = prompter.prompt(CONFIRM_PROMPT)?;
    if !is_affirmative(&confirmation) {
        println!("Aborting. No changes will be made to your 'Watch Later' playlist.");
        return Ok(Outcome::AbortedByUser);
    }

    let summary = clear_watch_later(&session, plan.removal_delay).await;
    tracing::info!(?summary, "watch later clearing finished");
    Ok(Outcome::Done(summary))
}
