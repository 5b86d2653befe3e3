use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use std::path::PathBuf;

use crate::clients::{
    Catalog, PageCache, PlaylistClient,
    errors::{Error, Result},
};
use crate::downloader::{DownloadOutcome, TrackDownloader};
use crate::tracks::filter_tracks;

pub const PLAYLIST_HOST: &str = "www.radiorecord.fm";
pub const TOKEN_ENV_VAR: &str = "YA_KEY";
pub const MAX_DURATION_MS: u64 = 1000 * 60 * 4;
pub const EXCLUDED_WORDS: [&str; 2] = ["Record Club", "Солнце Монако"];

const MUSIC_FOLDER: &str = "music";
const CACHE_FOLDER: &str = ".cache";

/// Settings of a single run, built once at start up
#[derive(Debug, Clone)]
pub struct Config {
    pub playlist_url: String,
    pub music_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub token: String,
    pub excluded_words: Vec<String>,
    pub max_duration_ms: u64,
}

#[derive(Default)]
pub struct ConfigBuilder {
    base_dir: Option<PathBuf>,
    date: Option<NaiveDate>,
    token: Option<String>,
    excluded_words: Option<Vec<String>>,
    max_duration_ms: Option<u64>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folder `music/` and `.cache/` live in. Defaults to the executable's folder.
    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Playlist day. Defaults to today in local time.
    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn excluded_words(mut self, words: Vec<String>) -> Self {
        self.excluded_words = Some(words);
        self
    }

    #[must_use]
    pub fn max_duration_ms(mut self, max_duration_ms: u64) -> Self {
        self.max_duration_ms = Some(max_duration_ms);
        self
    }

    pub fn build(self) -> Result<Config> {
        self.build_with(|key| std::env::var(key))
    }

    fn build_with<F>(self, env: F) -> Result<Config>
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let base_dir = match self.base_dir {
            Some(dir) => dir,
            None => executable_dir()?,
        };
        let token = match self.token {
            Some(t) => t,
            None => env(TOKEN_ENV_VAR).map_err(|e| {
                Error::ConfigurationError(format!("{TOKEN_ENV_VAR}: {e}. Set it in the environment or in a .env file"))
            })?,
        };
        if token.trim().is_empty() {
            return Err(Error::ConfigurationError(format!("{TOKEN_ENV_VAR} is empty")));
        }
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());

        Ok(Config {
            playlist_url: playlist_url(date),
            music_dir: base_dir.join(MUSIC_FOLDER),
            cache_dir: base_dir.join(CACHE_FOLDER),
            token,
            excluded_words: self
                .excluded_words
                .unwrap_or_else(|| EXCLUDED_WORDS.iter().map(ToString::to_string).collect()),
            max_duration_ms: self.max_duration_ms.unwrap_or(MAX_DURATION_MS),
        })
    }
}

pub fn playlist_url(date: NaiveDate) -> String {
    format!(
        "https://{PLAYLIST_HOST}/playlist.php?date={}&limit=1000",
        date.format("%Y-%m-%d")
    )
}

fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(PathBuf::from)
        .ok_or_else(|| Error::ConfigurationError(format!("{exe:?} has no parent folder")))
}

/// Per-outcome counters of a run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    pub already_present: usize,
    pub not_found: usize,
    pub too_long: usize,
    pub unknown_duration: usize,
}

impl RunSummary {
    fn record(&mut self, track: &str, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded(path) => {
                info!("Downloaded {track} into {path:?}");
                self.downloaded += 1;
            }
            DownloadOutcome::AlreadyExists(_) => self.already_present += 1,
            DownloadOutcome::NotFound | DownloadOutcome::Unavailable => {
                warn!("Error - {track}");
                self.not_found += 1;
            }
            DownloadOutcome::TooLong { duration_ms } => {
                debug!("{track} lasts {duration_ms} ms");
                warn!("AAAAA - {track}");
                self.too_long += 1;
            }
            DownloadOutcome::UnknownDuration => {
                warn!("Unknown duration - {track}");
                self.unknown_duration += 1;
            }
        }
    }
}

// Runs the whole fetch, filter and download pipeline once
pub struct Ripper<C: Catalog> {
    config: Config,
    playlist: PlaylistClient,
    catalog: C,
    downloader: TrackDownloader,
}

impl<C: Catalog> Ripper<C> {
    pub fn new(config: Config, catalog: C) -> Result<Self> {
        let playlist = PlaylistClient::try_default(PageCache::new(&config.cache_dir))?;
        let downloader = TrackDownloader::new(&config.music_dir, config.max_duration_ms);
        Ok(Ripper {
            config,
            playlist,
            catalog,
            downloader,
        })
    }

    pub async fn run(&self) -> Result<RunSummary> {
        info!("Starting download of {} ...", self.config.playlist_url);
        tokio::fs::create_dir_all(&self.config.music_dir).await?;

        let tracks = self.playlist.get_tracks(&self.config.playlist_url).await?;
        let tracks = filter_tracks(&tracks, self.config.excluded_words.as_slice());
        info!("{} tracks left after filtering", tracks.len());

        info!("Authorizing catalog client ...");
        self.catalog.authorize().await?;

        let mut summary = RunSummary::default();
        for track in &tracks {
            let outcome = self.downloader.download_track(&self.catalog, track).await?;
            summary.record(track, &outcome);
        }

        info!(
            "Run completed. Downloaded: {}, already present: {}, not found: {}, too long: {}, unknown duration: {}",
            summary.downloaded,
            summary.already_present,
            summary.not_found,
            summary.too_long,
            summary.unknown_duration
        );
        Ok(summary)
    }
}
