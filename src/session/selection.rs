use super::achievements::{AchievementController, DetailRequest};
use super::state::SessionState;
use crate::models::{CatalogEntry, DetailEntry};

/// Owns `selected`. Selection switches the view immediately, before the detail fetch lands.
#[derive(Debug, Default)]
pub struct SelectionController;

impl SelectionController {
    pub fn select(
        &self,
        state: &mut SessionState,
        achievements: &mut AchievementController,
        entry: CatalogEntry,
    ) -> DetailRequest {
        log::info!("Selected {} ({})", entry.name, entry.id);
        let id = entry.id;
        state.selected = Some(DetailEntry::from(entry));
        state.achievements.clear();
        state.error_message = None;
        achievements.fetch_details(state, id)
    }

    /// Back to the result list. `results` and `query` stay untouched so nothing is re-fetched.
    pub fn clear(&self, state: &mut SessionState, achievements: &mut AchievementController) {
        state.selected = None;
        state.achievements.clear();
        state.error_message = None;
        achievements.cancel(state);
    }
}
