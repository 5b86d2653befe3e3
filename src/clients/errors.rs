use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse transmit data, error: {0}")]
    ParseError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Yandex Music rejected the token, check YA_KEY (HTTP {0})")]
    YandexMusicUnauthorized(u16),

    #[error("Yandex Music deserialization error: {0}")]
    YandexMusicDeserializationError(#[from] serde_json::Error),

    #[error("Yandex Music API unexpected response: {0}")]
    YandexMusicUnexpectedResponse(String),

    #[error("No mp3 download available for track {0}")]
    DownloadUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
