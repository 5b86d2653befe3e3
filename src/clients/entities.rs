#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTrack {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>, // may be empty for some catalog entries
    pub duration_ms: Option<u64>,
}

/// Outcome of a free-text catalog search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    NoMatch,
    Match(CatalogTrack),
}
