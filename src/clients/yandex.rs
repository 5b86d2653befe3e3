use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use async_trait::async_trait;
use futures::stream::StreamExt;
use log::debug;
use regex::Regex;
use reqwest::{
    StatusCode,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::clients::{
    Catalog,
    entities::{CatalogTrack, SearchResult},
    errors::{Error, Result},
};

const API_URL: &str = "https://api.music.yandex.net";
const CLIENT_HEADER: &str = "YandexMusicAndroid/24023621";
// Salt of the direct link signature
const SIGN_SALT: &str = "XGRlBW9FXlekgbPrRHuSiA";
const PREFERRED_BITRATE_KBPS: u32 = 192;

static XML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(host|path|ts|s)>([^<]*)</(?:host|path|ts|s)>").unwrap());

#[derive(Deserialize, Debug)]
struct ApiResponse<T> {
    result: T,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ApiId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ApiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiId::Number(n) => write!(f, "{n}"),
            ApiId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Deserialize, Debug)]
struct ApiArtist {
    name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ApiTrack {
    id: ApiId,
    #[serde(default)]
    title: String,
    duration_ms: Option<u64>,
    #[serde(default)]
    artists: Vec<ApiArtist>,
}

impl From<ApiTrack> for CatalogTrack {
    fn from(t: ApiTrack) -> CatalogTrack {
        CatalogTrack {
            id: t.id.to_string(),
            title: t.title,
            artists: t.artists.into_iter().map(|a| a.name).collect(),
            duration_ms: t.duration_ms,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct ApiDownloadInfo {
    codec: String,
    bitrate_in_kbps: u32,
    download_info_url: String,
}

/// Yandex Music API client authenticated with an OAuth token
pub struct YandexMusicClient {
    http: reqwest::Client,
    api_url: String,
}

impl YandexMusicClient {
    pub fn new(http: reqwest::Client) -> Self {
        YandexMusicClient {
            http,
            api_url: API_URL.to_string(),
        }
    }

    pub fn try_new(token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("OAuth {token}"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("x-yandex-music-client", HeaderValue::from_static(CLIENT_HEADER));

        let http = reqwest::Client::builder()
            .user_agent("Yandex-Music-API")
            .default_headers(headers)
            .build()?;
        Ok(YandexMusicClient::new(http))
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}{}", self.api_url, path);
        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::YandexMusicUnauthorized(status.as_u16()));
        }
        let body = response.error_for_status()?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn direct_link(&self, track_id: &str) -> Result<String> {
        let value = self
            .get_json(&format!("/tracks/{track_id}/download-info"), &[])
            .await?;
        let infos: ApiResponse<Vec<ApiDownloadInfo>> = serde_json::from_value(value)?;
        let info = pick_download_info(&infos.result)
            .ok_or_else(|| Error::DownloadUnavailable(track_id.to_string()))?;
        debug!(
            "Using {} {} kbps for track {track_id}",
            info.codec, info.bitrate_in_kbps
        );

        let xml = self
            .http
            .get(&info.download_info_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        direct_link_from_xml(&xml)
    }
}

#[async_trait]
impl Catalog for YandexMusicClient {
    async fn authorize(&self) -> Result<()> {
        let value = self.get_json("/account/status", &[]).await?;
        let uid = value.pointer("/result/account/uid").cloned();
        match uid {
            Some(uid) => debug!("Authenticated as Yandex Music user {uid}"),
            None => {
                return Err(Error::YandexMusicUnexpectedResponse(
                    "account status without uid".into(),
                ));
            }
        }
        Ok(())
    }

    async fn search(&self, text: &str) -> Result<SearchResult> {
        let value = self
            .get_json(
                "/search",
                &[
                    ("text", text),
                    ("type", "all"),
                    ("page", "0"),
                    ("nocorrect", "false"),
                ],
            )
            .await?;
        Ok(best_match(&value))
    }

    async fn download(&self, track: &CatalogTrack, dest: &Path) -> Result<()> {
        let link = self.direct_link(&track.id).await?;
        let response = self.http.get(&link).send().await?.error_for_status()?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        debug!("Wrote track {} into {dest:?}", track.id);
        Ok(())
    }
}

// Anything but a best result of type `track` is treated as no match
fn best_match(response: &Value) -> SearchResult {
    let Some(best) = response.pointer("/result/best") else {
        return SearchResult::NoMatch;
    };
    if best.get("type").and_then(Value::as_str) != Some("track") {
        return SearchResult::NoMatch;
    }
    match best.get("result").cloned().map(serde_json::from_value::<ApiTrack>) {
        Some(Ok(track)) => SearchResult::Match(track.into()),
        Some(Err(e)) => {
            debug!("Unexpected best match shape: {e}");
            SearchResult::NoMatch
        }
        None => SearchResult::NoMatch,
    }
}

fn pick_download_info(infos: &[ApiDownloadInfo]) -> Option<&ApiDownloadInfo> {
    let mp3 = infos.iter().filter(|i| i.codec == "mp3");
    let preferred = mp3
        .clone()
        .find(|i| i.bitrate_in_kbps == PREFERRED_BITRATE_KBPS);
    preferred.or_else(|| mp3.max_by_key(|i| i.bitrate_in_kbps))
}

fn direct_link_from_xml(xml: &str) -> Result<String> {
    let (mut host, mut path, mut ts, mut s) = (None, None, None, None);
    for caps in XML_TAG.captures_iter(xml) {
        let value = caps.get(2).map(|m| m.as_str());
        match &caps[1] {
            "host" => host = value,
            "path" => path = value,
            "ts" => ts = value,
            "s" => s = value,
            _ => {}
        }
    }

    match (host, path, ts, s) {
        (Some(host), Some(path), Some(ts), Some(s)) => {
            let sign = sign(path, s);
            Ok(format!("https://{host}/get-mp3/{sign}/{ts}{path}"))
        }
        _ => Err(Error::ParseError(format!(
            "incomplete download descriptor: {xml}"
        ))),
    }
}

fn sign(path: &str, s: &str) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{:x}", md5::compute(format!("{SIGN_SALT}{path}{s}")))
}
