use super::state::{SessionState, Status};
use crate::error_classifier::FetchError;
use crate::models::CatalogEntry;

pub const SEARCH_FALLBACK_MESSAGE: &str = "Error searching games";

/// A search the caller must perform; its completion is reported back with `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
}

/// Owns `results` and `search_status`. Every issued request gets a new generation and only
/// the latest generation may land, so a slow earlier search can never overwrite a later one.
#[derive(Debug, Default)]
pub struct SearchController {
    generation: u64,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, state: &mut SessionState, query: &str) -> SearchRequest {
        self.generation += 1;
        state.search_status = Status::Loading;
        state.error_message = None;

        SearchRequest {
            generation: self.generation,
            query: query.to_string(),
        }
    }

    /// Apply a completed search. Returns false when the response was stale and discarded.
    pub fn finish(
        &mut self,
        state: &mut SessionState,
        generation: u64,
        result: Result<Vec<CatalogEntry>, FetchError>,
    ) -> bool {
        if generation != self.generation {
            log::debug!(
                "Discarding stale search response (generation {}, current {})",
                generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(entries) => {
                log::info!("Search returned {} entries", entries.len());
                state.results = entries;
                state.search_status = Status::Idle;
            }
            Err(e) => {
                log::warn!("Search failed: {}", e);
                state.results.clear();
                state.search_status = Status::Error;
                state.error_message = Some(e.user_message(SEARCH_FALLBACK_MESSAGE));
            }
        }
        true
    }

    /// Empty the result list for a query too short to search. In-flight searches are
    /// invalidated so they cannot repopulate the list afterwards.
    pub fn clear_results(&mut self, state: &mut SessionState) {
        self.generation += 1;
        state.results.clear();
        state.search_status = Status::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_classifier::FetchErrorKind;

    fn entry(id: u64, name: &str) -> CatalogEntry {
        CatalogEntry {
            id,
            name: name.to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_begin_sets_loading_and_clears_error() {
        let mut state = SessionState {
            error_message: Some("old".to_string()),
            ..Default::default()
        };
        let mut search = SearchController::new();
        let req = search.begin(&mut state, "portal");

        assert_eq!(req.query, "portal");
        assert_eq!(state.search_status, Status::Loading);
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn test_success_preserves_backend_order() {
        let mut state = SessionState::default();
        let mut search = SearchController::new();
        let req = search.begin(&mut state, "portal");

        let entries = vec![entry(620, "Portal 2"), entry(400, "Portal"), entry(10, "Zeta")];
        assert!(search.finish(&mut state, req.generation, Ok(entries.clone())));
        assert_eq!(state.results, entries);
        assert_eq!(state.search_status, Status::Idle);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = SessionState::default();
        let mut search = SearchController::new();
        let first = search.begin(&mut state, "po");
        let second = search.begin(&mut state, "portal");

        assert!(search.finish(&mut state, second.generation, Ok(vec![entry(400, "Portal")])));
        assert!(!search.finish(&mut state, first.generation, Ok(vec![entry(1, "Pong")])));
        assert_eq!(state.results, vec![entry(400, "Portal")]);

        // A stale failure must not clobber the state either.
        let err = FetchError::with_detail(FetchErrorKind::Server, "boom");
        assert!(!search.finish(&mut state, first.generation, Err(err)));
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn test_failure_uses_backend_detail() {
        let mut state = SessionState {
            results: vec![entry(1, "Old")],
            ..Default::default()
        };
        let mut search = SearchController::new();
        let req = search.begin(&mut state, "portal");
        let err = FetchError::from_status(429, r#"{"detail": "Rate limited"}"#);

        assert!(search.finish(&mut state, req.generation, Err(err)));
        assert_eq!(state.error_message.as_deref(), Some("Rate limited"));
        assert!(state.results.is_empty());
        assert_eq!(state.search_status, Status::Error);
    }

    #[test]
    fn test_failure_without_detail_uses_fallback() {
        let mut state = SessionState::default();
        let mut search = SearchController::new();
        let req = search.begin(&mut state, "portal");
        let err = FetchError::from_status(500, "");

        search.finish(&mut state, req.generation, Err(err));
        assert_eq!(state.error_message.as_deref(), Some(SEARCH_FALLBACK_MESSAGE));
    }

    #[test]
    fn test_clear_results_invalidates_in_flight() {
        let mut state = SessionState::default();
        let mut search = SearchController::new();
        let req = search.begin(&mut state, "portal");
        search.clear_results(&mut state);

        assert_eq!(state.search_status, Status::Idle);
        assert!(!search.finish(&mut state, req.generation, Ok(vec![entry(400, "Portal")])));
        assert!(state.results.is_empty());
    }
}
