use super::state::{SessionState, Status};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetailBody {
    Achievements,
    NoAchievements,
    /// The fetch failed; the banner stays, the error overlay explains why.
    Unavailable,
}

/// The single primary region on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrimaryView {
    Idle,
    Searching,
    Results,
    NoGamesFound,
    DetailLoading,
    Detail(DetailBody),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub primary: PrimaryView,
    /// Overlay, composable with any primary view.
    pub error_banner: Option<String>,
}

pub fn compose(state: &SessionState) -> ViewState {
    let primary = match &state.selected {
        Some(_) => match state.detail_status {
            Status::Loading => PrimaryView::DetailLoading,
            Status::Idle if state.achievements.is_empty() => {
                PrimaryView::Detail(DetailBody::NoAchievements)
            }
            Status::Idle => PrimaryView::Detail(DetailBody::Achievements),
            Status::Error => PrimaryView::Detail(DetailBody::Unavailable),
        },
        None if state.search_status == Status::Loading => PrimaryView::Searching,
        None if !state.results.is_empty() => PrimaryView::Results,
        None if state.query_is_searchable()
            && state.search_status == Status::Idle
            && state.error_message.is_none() =>
        {
            PrimaryView::NoGamesFound
        }
        None => PrimaryView::Idle,
    };

    ViewState {
        primary,
        error_banner: state.error_message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Achievement, CatalogEntry, DetailEntry};

    fn portal() -> CatalogEntry {
        CatalogEntry {
            id: 400,
            name: "Portal".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_idle_on_fresh_session() {
        let view = compose(&SessionState::default());
        assert_eq!(view.primary, PrimaryView::Idle);
        assert_eq!(view.error_banner, None);
    }

    #[test]
    fn test_searching_wins_over_stale_results() {
        let state = SessionState {
            query: "portal".to_string(),
            results: vec![portal()],
            search_status: Status::Loading,
            ..Default::default()
        };
        assert_eq!(compose(&state).primary, PrimaryView::Searching);
    }

    #[test]
    fn test_no_games_found_only_without_error() {
        let mut state = SessionState {
            query: "zzzzznotagame".to_string(),
            ..Default::default()
        };
        assert_eq!(compose(&state).primary, PrimaryView::NoGamesFound);

        state.search_status = Status::Error;
        state.error_message = Some("Rate limited".to_string());
        let view = compose(&state);
        assert_eq!(view.primary, PrimaryView::Idle);
        assert_eq!(view.error_banner.as_deref(), Some("Rate limited"));
    }

    #[test]
    fn test_short_query_is_idle_not_empty() {
        let state = SessionState {
            query: " p ".to_string(),
            ..Default::default()
        };
        assert_eq!(compose(&state).primary, PrimaryView::Idle);
    }

    #[test]
    fn test_selection_supersedes_results() {
        let mut state = SessionState {
            query: "portal".to_string(),
            results: vec![portal()],
            selected: Some(DetailEntry::from(portal())),
            detail_status: Status::Loading,
            ..Default::default()
        };
        assert_eq!(compose(&state).primary, PrimaryView::DetailLoading);

        state.detail_status = Status::Idle;
        assert_eq!(
            compose(&state).primary,
            PrimaryView::Detail(DetailBody::NoAchievements)
        );

        state.achievements.push(Achievement {
            internal_name: "ach1".to_string(),
            ..Default::default()
        });
        assert_eq!(
            compose(&state).primary,
            PrimaryView::Detail(DetailBody::Achievements)
        );
    }

    #[test]
    fn test_detail_error_keeps_banner_with_overlay() {
        let state = SessionState {
            selected: Some(DetailEntry::from(portal())),
            detail_status: Status::Error,
            error_message: Some("Game not found or has no achievements".to_string()),
            ..Default::default()
        };
        let view = compose(&state);
        assert_eq!(view.primary, PrimaryView::Detail(DetailBody::Unavailable));
        assert!(view.error_banner.is_some());
    }
}
