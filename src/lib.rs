//! Rrecord - Download today's Radio Record playlist from Yandex Music
//!
//! This library fetches the daily playlist page of the station, filters the
//! track names and downloads the best Yandex Music match of every track that
//! is not in the music folder yet.

/// Client modules for interacting with external services and local storage
pub mod clients;
/// Per-track search and download
pub mod downloader;
/// Configuration and the run pipeline
pub mod ripper;
/// Track name filtering and file naming
pub mod tracks;
