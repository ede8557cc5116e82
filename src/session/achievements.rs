use super::state::{SessionState, Status};
use crate::error_classifier::FetchError;
use crate::models::DetailResponse;

pub const DETAIL_FALLBACK_MESSAGE: &str = "Error loading achievements";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub generation: u64,
    pub id: u64,
}

/// Owns `achievements` and `detail_status`, and folds detail metadata into `selected`.
#[derive(Debug, Default)]
pub struct AchievementController {
    generation: u64,
    in_flight: Option<u64>,
    last_failure_retryable: bool,
}

impl AchievementController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch_details(&mut self, state: &mut SessionState, id: u64) -> DetailRequest {
        self.generation += 1;
        self.in_flight = Some(id);
        self.last_failure_retryable = false;
        state.detail_status = Status::Loading;

        DetailRequest {
            generation: self.generation,
            id,
        }
    }

    /// Apply a completed detail fetch. Responses for a superseded selection are dropped.
    pub fn finish(
        &mut self,
        state: &mut SessionState,
        generation: u64,
        id: u64,
        result: Result<DetailResponse, FetchError>,
    ) -> bool {
        let selected_id = state.selected.as_ref().map(|s| s.id());
        if generation != self.generation || self.in_flight != Some(id) || selected_id != Some(id)
        {
            log::debug!(
                "Discarding stale detail response for {} (generation {}, current {})",
                id,
                generation,
                self.generation
            );
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(resp) => {
                log::info!("Loaded {} achievements for {}", resp.achievements.len(), id);
                let meta = resp.metadata();
                if let Some(selected) = state.selected.as_mut() {
                    selected.merge(&meta);
                }
                state.achievements = resp.achievements;
                state.detail_status = Status::Idle;
            }
            Err(e) => {
                log::warn!("Loading achievements for {} failed: {}", id, e);
                self.last_failure_retryable = e.is_retryable();
                state.achievements.clear();
                state.detail_status = Status::Error;
                state.error_message = Some(e.user_message(DETAIL_FALLBACK_MESSAGE));
            }
        }
        true
    }

    /// Forget any outstanding fetch; its result will be ignored when it arrives.
    pub fn cancel(&mut self, state: &mut SessionState) {
        if self.in_flight.take().is_some() {
            self.generation += 1;
        }
        state.detail_status = Status::Idle;
    }

    /// Whether the last failed fetch is worth repeating (timeouts, 5xx, rate limits).
    pub fn failure_is_retryable(&self) -> bool {
        self.last_failure_retryable
    }
}
