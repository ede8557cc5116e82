use crate::catalog_api::CatalogClient;
use crate::error_classifier::{FetchError, FetchErrorKind};
use crate::guide::UrlOpener;
use crate::models::{CatalogEntry, DetailResponse};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Scripted<T> = (Duration, Result<T, FetchError>);

#[derive(Clone, Default)]
pub struct MockCatalogClient {
    // Log of issued requests for assertion
    pub search_calls: Arc<Mutex<Vec<String>>>,
    pub detail_calls: Arc<Mutex<Vec<u64>>>,
    pub probe_calls: Arc<Mutex<Vec<String>>>,
    // Configurable responses, each with an artificial latency
    searches: Arc<Mutex<HashMap<String, Scripted<Vec<CatalogEntry>>>>>,
    details: Arc<Mutex<HashMap<u64, Scripted<DetailResponse>>>>,
    broken_images: Arc<Mutex<Vec<String>>>,
}

impl MockCatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_search(&self, query: &str, delay: Duration, entries: Vec<CatalogEntry>) {
        self.searches
            .lock()
            .unwrap()
            .insert(query.to_string(), (delay, Ok(entries)));
    }

    pub fn mock_search_error(&self, query: &str, error: FetchError) {
        self.searches
            .lock()
            .unwrap()
            .insert(query.to_string(), (Duration::ZERO, Err(error)));
    }

    pub fn mock_details(&self, id: u64, delay: Duration, resp: DetailResponse) {
        self.details.lock().unwrap().insert(id, (delay, Ok(resp)));
    }

    pub fn mock_details_error(&self, id: u64, error: FetchError) {
        self.details
            .lock()
            .unwrap()
            .insert(id, (Duration::ZERO, Err(error)));
    }

    pub fn mock_broken_image(&self, url: &str) {
        self.broken_images.lock().unwrap().push(url.to_string());
    }

    pub fn search_count(&self) -> usize {
        self.search_calls.lock().unwrap().len()
    }
}

fn not_scripted(what: String) -> FetchError {
    FetchError::new(FetchErrorKind::NotFound, format!("Mock 404: {}", what))
}

#[async_trait::async_trait]
impl CatalogClient for MockCatalogClient {
    async fn search(&self, query: &str) -> Result<Vec<CatalogEntry>, FetchError> {
        self.search_calls.lock().unwrap().push(query.to_string());
        let scripted = self.searches.lock().unwrap().get(query).cloned();
        match scripted {
            Some((delay, result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => Err(not_scripted(format!("search {}", query))),
        }
    }

    async fn fetch_details(&self, id: u64) -> Result<DetailResponse, FetchError> {
        self.detail_calls.lock().unwrap().push(id);
        let scripted = self.details.lock().unwrap().get(&id).cloned();
        match scripted {
            Some((delay, result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => Err(not_scripted(format!("details {}", id))),
        }
    }

    async fn probe_image(&self, url: &str) -> Result<(), FetchError> {
        self.probe_calls.lock().unwrap().push(url.to_string());
        if self.broken_images.lock().unwrap().iter().any(|u| u == url) {
            return Err(FetchError::from_status(404, ""));
        }
        Ok(())
    }
}

/// Records every URL it is asked to open instead of launching anything.
#[derive(Clone, Default)]
pub struct RecordingOpener {
    pub opened: Arc<Mutex<Vec<String>>>,
    next_error: Arc<Mutex<Option<String>>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failure(&self, msg: &str) {
        *self.next_error.lock().unwrap() = Some(msg.to_string());
    }
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), String> {
        if let Some(err) = self.next_error.lock().unwrap().take() {
            return Err(err);
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

// Tests for the mocks themselves
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_recording() {
        let mock = MockCatalogClient::new();
        mock.mock_search("portal", Duration::ZERO, vec![]);
        let _ = mock.search("portal").await;
        let _ = mock.search("unscripted").await;

        let calls = mock.search_calls.lock().unwrap();
        assert_eq!(*calls, vec!["portal".to_string(), "unscripted".to_string()]);
    }

    #[tokio::test]
    async fn test_error_injection() {
        let mock = MockCatalogClient::new();
        mock.mock_details_error(1, FetchError::with_detail(FetchErrorKind::Server, "down"));
        let err = mock.fetch_details(1).await.unwrap_err();
        assert_eq!(err.detail.as_deref(), Some("down"));
    }
}
