use log::{debug, info};
use scraper::{Html, Selector};

use crate::clients::{
    errors::{Error, Result},
    page_cache::PageCache,
};

// Marker of a track entry on the playlist page, class value must match exactly
const TRACK_SELECTOR: &str = r#"div[class="artist"]"#;

/// Fetches playlist pages through the page cache and extracts track names
pub struct PlaylistClient {
    http: reqwest::Client,
    cache: PageCache,
}

impl PlaylistClient {
    pub fn new(http: reqwest::Client, cache: PageCache) -> Self {
        PlaylistClient { http, cache }
    }

    pub fn try_default(cache: PageCache) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rrecord/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(PlaylistClient::new(http, cache))
    }

    // A cached page is returned without touching the network
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(body) = self.cache.get(url).await? {
            return Ok(body);
        }

        debug!("Fetching {url} ...");
        let response = self.http.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?.to_vec();
        self.cache.set(url, &body).await?;
        Ok(body)
    }

    pub async fn get_tracks(&self, url: &str) -> Result<Vec<String>> {
        let html = self.fetch(url).await?;
        let tracks = extract_tracks(&html)?;
        info!("Found {} tracks on {url}", tracks.len());
        Ok(tracks)
    }
}

/// Text of every track entry in document order, trimmed
pub fn extract_tracks(html: &[u8]) -> Result<Vec<String>> {
    let selector = Selector::parse(TRACK_SELECTOR).map_err(|e| Error::ParseError(e.to_string()))?;
    let document = Html::parse_document(&String::from_utf8_lossy(html));

    Ok(document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect())
}
