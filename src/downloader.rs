use std::path::{Path, PathBuf};

use log::debug;

use crate::clients::{
    Catalog,
    entities::SearchResult,
    errors::{Error, Result},
};
use crate::tracks::track_file_name;

/// What happened to a single track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    AlreadyExists(PathBuf),
    Downloaded(PathBuf),
    NotFound,
    Unavailable,
    TooLong { duration_ms: u64 },
    UnknownDuration,
}

pub struct TrackDownloader {
    music_dir: PathBuf,
    max_duration_ms: u64,
}

impl TrackDownloader {
    pub fn new(music_dir: impl Into<PathBuf>, max_duration_ms: u64) -> Self {
        TrackDownloader {
            music_dir: music_dir.into(),
            max_duration_ms,
        }
    }

    pub fn destination(&self, track: &str) -> PathBuf {
        self.music_dir.join(track_file_name(track))
    }

    /// Searches `track` in the catalog and downloads the best match unless
    /// the destination file already exists or the match is too long.
    pub async fn download_track<C: Catalog + ?Sized>(
        &self,
        catalog: &C,
        track: &str,
    ) -> Result<DownloadOutcome> {
        let dest = self.destination(track);
        if tokio::fs::try_exists(&dest).await? {
            debug!("{dest:?} already exists, skipping");
            return Ok(DownloadOutcome::AlreadyExists(dest));
        }

        let best = match catalog.search(track).await? {
            SearchResult::Match(best) => best,
            SearchResult::NoMatch => return Ok(DownloadOutcome::NotFound),
        };
        debug!("Best match for {track}: {best:?}");

        match best.duration_ms {
            Some(duration_ms) if duration_ms < self.max_duration_ms => {
                let part = part_path(&dest);
                if let Err(e) = catalog.download(&best, &part).await {
                    remove_partial(&part).await;
                    return match e {
                        Error::DownloadUnavailable(_) => Ok(DownloadOutcome::Unavailable),
                        e => Err(e),
                    };
                }
                tokio::fs::rename(&part, &dest).await?;
                Ok(DownloadOutcome::Downloaded(dest))
            }
            Some(duration_ms) => Ok(DownloadOutcome::TooLong { duration_ms }),
            None => Ok(DownloadOutcome::UnknownDuration),
        }
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

async fn remove_partial(part: &Path) {
    if let Err(e) = tokio::fs::remove_file(part).await {
        debug!("Could not remove partial download {part:?}: {e}");
    }
}
