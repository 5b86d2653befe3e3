use log::debug;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::clients::errors::Error;

/// Disk-backed URL → bytes store.
///
/// Entries never expire: once a URL is stored its bytes are served for as long
/// as the cache directory exists. Clearing the directory is the only way to
/// invalidate an entry.
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        PageCache { dir: dir.into() }
    }

    pub async fn init(&self) -> Result<(), Error> {
        tokio::fs::create_dir_all(&self.dir).await?;
        debug!("Initialized page cache in {:?}", self.dir);
        Ok(())
    }

    pub async fn get(&self, url: &str) -> Result<Option<Vec<u8>>, Error> {
        let path = self.entry_path(url);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!("Page cache hit for {url}");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Page cache miss for {url}");
                Ok(None)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    // Written to a sibling file first so a crash never leaves a truncated entry
    pub async fn set(&self, url: &str, body: &[u8]) -> Result<(), Error> {
        self.init().await?;
        let path = self.entry_path(url);
        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, body).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        debug!("Stored {} bytes for {url} in {path:?}", body.len());
        Ok(())
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        self.dir.join(hex::encode(hasher.finalize()))
    }
}
