use std::path::Path;

use async_trait::async_trait;

/// Data entities for catalog tracks and search results
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Disk-backed page cache
pub mod page_cache;
/// Radio Record playlist page client
pub mod playlist;
/// Yandex Music API client
pub mod yandex;

pub use entities::{CatalogTrack, SearchResult};
pub use page_cache::PageCache;
pub use playlist::PlaylistClient;
pub use yandex::YandexMusicClient;

/// Music catalog able to find a track by free text and download it
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn authorize(&self) -> errors::Result<()> {
        Ok(())
    }

    async fn search(&self, text: &str) -> errors::Result<SearchResult>;

    async fn download(&self, track: &CatalogTrack, dest: &Path) -> errors::Result<()>;
}
