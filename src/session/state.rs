use crate::models::{Achievement, CatalogEntry, DetailEntry};
use serde::Serialize;

/// Minimum trimmed query length before a search is issued.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Error,
}

/// Everything the views render from. Created empty at session start, never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    pub query: String,
    pub results: Vec<CatalogEntry>,
    pub selected: Option<DetailEntry>,
    pub achievements: Vec<Achievement>,
    pub search_status: Status,
    pub detail_status: Status,
    pub error_message: Option<String>,
}

impl SessionState {
    pub fn query_is_searchable(&self) -> bool {
        is_searchable(&self.query)
    }
}

pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}
