use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use rrecord::clients::{
    Catalog, CatalogTrack, PageCache, SearchResult,
    errors::{Error, Result},
};
use rrecord::ripper::{ConfigBuilder, Ripper, RunSummary};

const PLAYLIST: &str = r#"
<html><body>
  <div class="artist">DJ A - Song</div>
  <div class="artist">DJ A - Song</div>
  <div class="artist">Record Club Live</div>
  <div class="artist">DJ B - Track"</div>
  <div class="artist">AC/DC - Long One</div>
  <div class="artist">Nobody - Nothing</div>
  <div class="artist">Old - Hit</div>
</body></html>
"#;

// Every track lasts 3 minutes except the ones named below
struct FakeCatalog;

#[async_trait]
impl Catalog for FakeCatalog {
    async fn search(&self, text: &str) -> Result<SearchResult> {
        let duration_ms = match text {
            "Nobody - Nothing" => return Ok(SearchResult::NoMatch),
            "AC/DC - Long One" => 240_000,
            _ => 180_000,
        };
        Ok(SearchResult::Match(CatalogTrack {
            id: text.len().to_string(),
            title: text.to_string(),
            artists: vec![],
            duration_ms: Some(duration_ms),
        }))
    }

    async fn download(&self, track: &CatalogTrack, dest: &Path) -> Result<()> {
        tokio::fs::write(dest, track.title.as_bytes()).await?;
        Ok(())
    }
}

struct RejectingCatalog;

#[async_trait]
impl Catalog for RejectingCatalog {
    async fn authorize(&self) -> Result<()> {
        Err(Error::YandexMusicUnauthorized(401))
    }

    async fn search(&self, _text: &str) -> Result<SearchResult> {
        panic!("search must not run without authorization");
    }

    async fn download(&self, _track: &CatalogTrack, _dest: &Path) -> Result<()> {
        panic!("download must not run without authorization");
    }
}

async fn seeded_config(base: &Path) -> rrecord::ripper::Config {
    let config = ConfigBuilder::new()
        .base_dir(base)
        .date(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap())
        .token("test-token")
        .excluded_words(vec!["Record Club".to_string()])
        .build()
        .unwrap();
    PageCache::new(&config.cache_dir)
        .set(&config.playlist_url, PLAYLIST.as_bytes())
        .await
        .unwrap();
    config
}

#[tokio::test]
async fn test_run_downloads_filtered_playlist() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded_config(dir.path()).await;
    let music = config.music_dir.clone();
    std::fs::create_dir_all(&music).unwrap();
    std::fs::write(music.join("Old - Hit.mp3"), b"kept").unwrap();

    let ripper = Ripper::new(config, FakeCatalog).unwrap();
    let summary = ripper.run().await.unwrap();

    assert_eq!(
        summary,
        RunSummary {
            downloaded: 2,
            already_present: 1,
            not_found: 1,
            too_long: 1,
            unknown_duration: 0,
        }
    );
    assert_eq!(std::fs::read(music.join("DJ A - Song.mp3")).unwrap(), b"DJ A - Song");
    assert_eq!(std::fs::read(music.join("DJ B - Track.mp3")).unwrap(), b"DJ B - Track");
    assert_eq!(std::fs::read(music.join("Old - Hit.mp3")).unwrap(), b"kept");
    assert!(!music.join("AC-DC - Long One.mp3").exists());
    assert!(!music.join("Nobody - Nothing.mp3").exists());
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded_config(dir.path()).await;

    let first = Ripper::new(config.clone(), FakeCatalog).unwrap();
    first.run().await.unwrap();

    let ripper = Ripper::new(config, FakeCatalog).unwrap();
    let summary = ripper.run().await.unwrap();

    assert_eq!(summary.downloaded, 0);
    assert_eq!(summary.already_present, 3);
}

#[tokio::test]
async fn test_rejected_token_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded_config(dir.path()).await;
    let music = config.music_dir.clone();

    let ripper = Ripper::new(config, RejectingCatalog).unwrap();
    let result = ripper.run().await;

    assert!(matches!(result, Err(Error::YandexMusicUnauthorized(401))));
    // The music folder is created before the catalog is contacted
    assert!(music.is_dir());
    assert_eq!(std::fs::read_dir(&music).unwrap().count(), 0);
}
