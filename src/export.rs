//! Exporting Watch Later to CSV.
//!
//! Produces the files the migration reads: public videos go to one CSV and
//! private ones to another, both oldest first.

use crate::error::{MigrateError, Result};
use crate::ingest::{ID_COLUMN, MISSING_SENTINEL};
use crate::migrate::COOKIE_PROMPT;
use crate::prompt::Prompter;
use crate::youtube::{Authenticator, PlaylistVideo, WatchLaterListing};
use std::path::Path;

const TITLE_COLUMN: &str = "Title";

/// Where each half of the export goes.
#[derive(Debug, Clone)]
pub struct ExportTargets<'a> {
    pub public_csv: &'a Path,
    pub private_csv: &'a Path,
}

/// Number of videos written to each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportReport {
    pub public: usize,
    pub private: usize,
}

/// Split entries into (public, private), each reversed so the oldest comes first.
pub fn partition_videos(videos: Vec<PlaylistVideo>) -> (Vec<PlaylistVideo>, Vec<PlaylistVideo>) {
    let (mut private, mut public): (Vec<_>, Vec<_>) =
        videos.into_iter().partition(PlaylistVideo::is_private);
    public.reverse();
    private.reverse();
    (public, private)
}

/// Write an `ID,Title` CSV, replacing any existing file.
///
/// Missing IDs or titles are written as `N/A`.
pub fn write_videos(path: &Path, videos: &[PlaylistVideo]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|err| MigrateError::from_csv(err, path))?;

    let or_missing = |value: &str| {
        if value.is_empty() {
            MISSING_SENTINEL.to_string()
        } else {
            value.to_string()
        }
    };

    writer
        .write_record([ID_COLUMN, TITLE_COLUMN])
        .map_err(|err| MigrateError::from_csv(err, path))?;
    for video in videos {
        writer
            .write_record([or_missing(&video.id), or_missing(&video.title)])
            .map_err(|err| MigrateError::from_csv(err, path))?;
    }
    writer.flush().map_err(|source| MigrateError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(count = videos.len(), path = %path.display(), "wrote csv");
    Ok(())
}

fn write_partition(label: &str, path: &Path, videos: &[PlaylistVideo]) -> Result<()> {
    if videos.is_empty() {
        println!("\nNo {} videos found.", label);
        return Ok(());
    }
    println!(
        "\nWriting {} {} videos to '{}'...",
        videos.len(),
        label,
        path.display()
    );
    write_videos(path, videos)
}

/// Export Watch Later into the target CSV files.
///
/// # Returns
/// * `Result<Option<ExportReport>>` - Counts written, or None if no cookie was entered
pub async fn run<P, Au>(
    targets: &ExportTargets<'_>,
    prompter: &mut P,
    authenticator: &Au,
) -> Result<Option<ExportReport>>
where
    P: Prompter,
    Au: Authenticator,
    Au::Session: WatchLaterListing,
{
    let cookie = prompter.prompt(COOKIE_PROMPT)?;
    if cookie.is_empty() {
        eprintln!("A cookie is required to proceed. Exiting.");
        return Ok(None);
    }

    println!("\nAuthenticating with YouTube...");
    let session = authenticator.authenticate(&cookie).await?;
    println!("Authentication successful.");

    println!("\nFetching the list of 'Watch Later' videos...");
    let videos = session.fetch_watch_later_all().await?;
    let (public, private) = partition_videos(videos);
    if !private.is_empty() {
        println!("Found and separated {} private videos.", private.len());
    }

    write_partition("public", targets.public_csv, &public)?;
    write_partition("private", targets.private_csv, &private)?;

    println!("\nProcessing complete.");
    Ok(Some(ExportReport {
        public: public.len(),
        private: private.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::read_video_ids;
    use crate::youtube::PlaylistApi;
    use crate::youtube::models::PRIVATE_VIDEO_TITLE;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Clone)]
    struct FakeListing(Vec<PlaylistVideo>);

    #[async_trait]
    impl PlaylistApi for FakeListing {
        async fn create_playlist(&self, _name: &str, _video_ids: &[String]) -> Result<String> {
            unreachable!("export never creates playlists")
        }

        async fn fetch_watch_later_page(&self) -> Result<Vec<String>> {
            unreachable!("export reads the full listing")
        }

        async fn remove_from_watch_later(&self, _video_ids: &[String]) -> Result<()> {
            unreachable!("export never removes videos")
        }
    }

    #[async_trait]
    impl WatchLaterListing for FakeListing {
        async fn fetch_watch_later_all(&self) -> Result<Vec<PlaylistVideo>> {
            Ok(self.0.clone())
        }
    }

    struct FakeAuthenticator(FakeListing);

    #[async_trait]
    impl Authenticator for FakeAuthenticator {
        type Session = FakeListing;

        async fn authenticate(&self, _cookie: &str) -> Result<FakeListing> {
            Ok(self.0.clone())
        }
    }

    struct Answers(Vec<&'static str>);

    impl Prompter for Answers {
        fn prompt(&mut self, _question: &str) -> Result<String> {
            Ok(if self.0.is_empty() {
                String::new()
            } else {
                self.0.remove(0).to_string()
            })
        }
    }

    fn sample_listing() -> Vec<PlaylistVideo> {
        vec![
            PlaylistVideo::new("newest", "Newest"),
            PlaylistVideo::new("gone", PRIVATE_VIDEO_TITLE),
            PlaylistVideo::new("middle", ""),
            PlaylistVideo::new("oldest", "Oldest"),
        ]
    }

    #[test]
    fn test_partition_videos_reverses_each_half() {
        let (public, private) = partition_videos(sample_listing());
        let ids: Vec<&str> = public.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["oldest", "middle", "newest"]);
        assert_eq!(private, vec![PlaylistVideo::new("gone", PRIVATE_VIDEO_TITLE)]);
    }

    #[test]
    fn test_write_videos_fills_missing_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");

        write_videos(
            &path,
            &[
                PlaylistVideo::new("abc", "Title, with comma"),
                PlaylistVideo::new("", "No id"),
                PlaylistVideo::new("def", ""),
            ],
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "ID,Title\nabc,\"Title, with comma\"\nN/A,No id\ndef,N/A\n"
        );
        assert_eq!(read_video_ids(&path).unwrap(), vec!["abc", "def"]);
    }

    #[test]
    fn test_write_videos_into_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("out.csv");
        let err = write_videos(&path, &[]).unwrap_err();
        assert!(matches!(err, MigrateError::FileAccess { .. }));
    }

    #[tokio::test]
    async fn test_run_writes_both_files() {
        let temp_dir = TempDir::new().unwrap();
        let public_csv = temp_dir.path().join("public.csv");
        let private_csv = temp_dir.path().join("private.csv");
        let targets = ExportTargets {
            public_csv: &public_csv,
            private_csv: &private_csv,
        };

        let report = run(
            &targets,
            &mut Answers(vec!["SAPISID=abc"]),
            &FakeAuthenticator(FakeListing(sample_listing())),
        )
        .await
        .unwrap();

        assert_eq!(report, Some(ExportReport { public: 3, private: 1 }));
        assert_eq!(
            read_video_ids(&public_csv).unwrap(),
            vec!["oldest", "middle", "newest"]
        );
        assert_eq!(read_video_ids(&private_csv).unwrap(), vec!["gone"]);
    }

    #[tokio::test]
    async fn test_run_without_private_videos_skips_private_file() {
        let temp_dir = TempDir::new().unwrap();
        let public_csv = temp_dir.path().join("public.csv");
        let private_csv = temp_dir.path().join("private.csv");
        let targets = ExportTargets {
            public_csv: &public_csv,
            private_csv: &private_csv,
        };
        let listing = FakeListing(vec![PlaylistVideo::new("only", "Only")]);

        let report = run(&targets, &mut Answers(vec!["SAPISID=abc"]), &FakeAuthenticator(listing))
            .await
            .unwrap();

        assert_eq!(report, Some(ExportReport { public: 1, private: 0 }));
        assert!(public_csv.exists());
        assert!(!private_csv.exists());
    }

    #[tokio::test]
    async fn test_run_empty_cookie_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let public_csv = temp_dir.path().join("public.csv");
        let private_csv = temp_dir.path().join("private.csv");
        let targets = ExportTargets {
            public_csv: &public_csv,
            private_csv: &private_csv,
        };

        let report = run(
            &targets,
            &mut Answers(vec![]),
            &FakeAuthenticator(FakeListing(sample_listing())),
        )
        .await
        .unwrap();

        assert_eq!(report, None);
        assert!(!public_csv.exists());
    }
}
