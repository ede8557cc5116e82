use crate::error_classifier::{FetchError, FetchErrorKind};
use crate::models::{CatalogEntry, DetailResponse};
use moka::future::Cache;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("AchievementExplorer/", env!("CARGO_PKG_VERSION"));

/// The two backend endpoints the session talks to, plus the image check used by the views.
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// `GET /api/games/search?q=` - entries in backend order.
    async fn search(&self, query: &str) -> Result<Vec<CatalogEntry>, FetchError>;

    /// `GET /api/games/{appid}/achievements`
    async fn fetch_details(&self, id: u64) -> Result<DetailResponse, FetchError>;

    /// Check that an image reference resolves to something displayable.
    async fn probe_image(&self, url: &str) -> Result<(), FetchError>;
}

pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    // Successful detail responses only; failures must stay retryable by re-selecting.
    detail_cache: Cache<u64, Arc<DetailResponse>>,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str, timeout: Duration, detail_ttl: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            detail_cache: Cache::builder()
                .max_capacity(256)
                .time_to_live(detail_ttl)
                .build(),
        }
    }

    pub fn from_settings(settings: &crate::config::Settings) -> Self {
        Self::new(
            &settings.backend_url,
            Duration::from_secs(settings.request_timeout_secs),
            Duration::from_secs(settings.detail_cache_ttl_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FetchError> {
        let resp = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::from_transport(&e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| FetchError::from_transport(&e))?;

        if !status.is_success() {
            // Silence 404s; they are routine for unknown App IDs.
            if status != reqwest::StatusCode::NOT_FOUND {
                log::info!("Catalog backend returned {}", status);
            }
            return Err(FetchError::from_status(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            log::warn!("Catalog backend parse error: {}", e);
            FetchError::from_decode(&e)
        })
    }
}

#[async_trait::async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn search(&self, query: &str) -> Result<Vec<CatalogEntry>, FetchError> {
        let url = format!("{}/api/games/search", self.base_url);
        log::debug!("Searching catalog for {:?}", query);
        self.get_json(self.client.get(&url).query(&[("q", query)]))
            .await
    }

    async fn fetch_details(&self, id: u64) -> Result<DetailResponse, FetchError> {
        if let Some(cached) = self.detail_cache.get(&id).await {
            log::debug!("Detail cache hit for {}", id);
            return Ok(cached.as_ref().clone());
        }

        let url = format!("{}/api/games/{}/achievements", self.base_url, id);
        let resp: DetailResponse = self.get_json(self.client.get(&url)).await?;

        self.detail_cache.insert(id, Arc::new(resp.clone())).await;
        Ok(resp)
    }

    async fn probe_image(&self, url: &str) -> Result<(), FetchError> {
        let resp = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| FetchError::from_transport(&e))?;

        if !resp.status().is_success() {
            return Err(FetchError::from_status(resp.status().as_u16(), ""));
        }

        let is_image = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("image/"))
            // Some CDNs omit the header on HEAD; give them the benefit of the doubt.
            .unwrap_or(true);

        if is_image {
            Ok(())
        } else {
            Err(FetchError::new(
                FetchErrorKind::Decode,
                format!("{} is not an image", url),
            ))
        }
    }
}
