use crate::catalog_api::CatalogClient;
use crate::config::Settings;
use crate::guide::{self, UrlOpener};
use crate::image_slot::ImageSlots;
use crate::models::Achievement;
use crate::session::view::PrimaryView;
use crate::session::{Session, SessionEvent};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Query,
    Results,
    Achievements,
}

/// Outcome of an image probe: the reference and whether it loaded.
pub type ImageProbe = (String, bool);

fn clamp_selection(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
    } else {
        let idx = state.selected().unwrap_or(0).min(len - 1);
        state.select(Some(idx));
    }
}

fn step(state: &mut ListState, len: usize, down: bool) {
    if len == 0 {
        return;
    }
    let current = state.selected().unwrap_or(0);
    let next = if down {
        (current + 1).min(len - 1)
    } else {
        current.saturating_sub(1)
    };
    state.select(Some(next));
}

/// Terminal-side state layered over the session: focus, list cursors, image slots.
pub struct App {
    pub session: Session,
    pub settings: Settings,
    pub focus: Focus,
    pub results_state: ListState,
    pub achievements_state: ListState,
    pub images: ImageSlots,
    /// Transient one-line notice (guide opened, opener failed).
    pub notice: Option<String>,
    pub should_quit: bool,
    client: Arc<dyn CatalogClient>,
    opener: Box<dyn UrlOpener>,
    probe_tx: UnboundedSender<ImageProbe>,
}

impl App {
    pub fn new(
        session: Session,
        settings: Settings,
        client: Arc<dyn CatalogClient>,
        opener: Box<dyn UrlOpener>,
        probe_tx: UnboundedSender<ImageProbe>,
    ) -> Self {
        Self {
            session,
            settings,
            focus: Focus::Query,
            results_state: ListState::default(),
            achievements_state: ListState::default(),
            images: ImageSlots::new(),
            notice: None,
            should_quit: false,
            client,
            opener,
            probe_tx,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        self.notice = None;

        if self.session.state().selected.is_some() {
            self.handle_detail_key(key);
            return;
        }

        match self.focus {
            Focus::Query | Focus::Achievements => self.handle_query_key(key),
            Focus::Results => self.handle_results_key(key),
        }
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut String)) {
        let mut query = self.session.state().query.clone();
        edit(&mut query);
        self.session.set_query(query);
    }

    fn handle_query_key(&mut self, key: KeyEvent) {
        self.focus = Focus::Query;
        match key.code {
            KeyCode::Char(c) => self.edit_query(|q| q.push(c)),
            KeyCode::Backspace => self.edit_query(|q| {
                q.pop();
            }),
            KeyCode::Down | KeyCode::Tab | KeyCode::Enter => {
                if !self.session.state().results.is_empty() {
                    self.focus = Focus::Results;
                    clamp_selection(&mut self.results_state, self.session.state().results.len());
                }
            }
            KeyCode::Esc => {
                if self.session.state().query.is_empty() {
                    self.should_quit = true;
                } else {
                    self.session.set_query(String::new());
                }
            }
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        let len = self.session.state().results.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') if self.results_state.selected() == Some(0) => {
                self.focus = Focus::Query;
            }
            KeyCode::Up | KeyCode::Char('k') => step(&mut self.results_state, len, false),
            KeyCode::Down | KeyCode::Char('j') => step(&mut self.results_state, len, true),
            // The list on screen may be stale while a newer search is running.
            KeyCode::Enter if self.session.view().primary != PrimaryView::Results => {}
            KeyCode::Enter => {
                let index = self.results_state.selected().unwrap_or(0);
                if self.session.select_result(index) {
                    self.focus = Focus::Achievements;
                    self.achievements_state.select(None);
                    self.probe_selected_images();
                }
            }
            KeyCode::Esc | KeyCode::Char('/') => self.focus = Focus::Query,
            KeyCode::Char(_) | KeyCode::Backspace => self.handle_query_key(key),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        let len = self.session.state().achievements.len();
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => {
                self.session.clear_selection();
                self.focus = if self.session.state().results.is_empty() {
                    Focus::Query
                } else {
                    Focus::Results
                };
            }
            KeyCode::Up | KeyCode::Char('k') => step(&mut self.achievements_state, len, false),
            KeyCode::Down | KeyCode::Char('j') => step(&mut self.achievements_state, len, true),
            KeyCode::Enter | KeyCode::Char('g') => self.open_selected_guide(),
            KeyCode::Char('r') => self.retry_selection(),
            _ => {}
        }
    }

    fn retry_selection(&mut self) {
        if let Some(selected) = self.session.state().selected.clone() {
            self.session.select(selected.entry);
            self.achievements_state.select(None);
        }
    }

    pub fn highlighted_achievement(&self) -> Option<&Achievement> {
        let state = self.session.state();
        self.achievements_state
            .selected()
            .and_then(|i| state.achievements.get(i))
    }

    fn open_selected_guide(&mut self) {
        let Some(entry_name) = self.session.state().selected.as_ref().map(|s| s.name().to_string())
        else {
            return;
        };
        let Some(achievement) = self.highlighted_achievement().cloned() else {
            return;
        };

        self.notice = Some(
            match guide::open_guide(
                self.opener.as_ref(),
                &self.settings.guide_search_url,
                &achievement,
                &entry_name,
            ) {
                Ok(_) => format!("Opened a guide search for \"{}\"", achievement.title()),
                Err(e) => format!("Could not open browser: {}", e),
            },
        );
    }

    pub fn on_session_event(&mut self, event: SessionEvent) {
        let was_details = matches!(event, SessionEvent::DetailsFinished { .. });
        if !self.session.handle_event(event) {
            return;
        }

        let state = self.session.state();
        clamp_selection(&mut self.results_state, state.results.len());
        if state.results.is_empty() && self.focus == Focus::Results {
            self.focus = Focus::Query;
        }
        if was_details {
            clamp_selection(&mut self.achievements_state, state.achievements.len());
            self.probe_selected_images();
        }
    }

    pub fn on_image_probe(&mut self, probe: ImageProbe) {
        let (url, ok) = probe;
        if ok {
            self.images.on_load(&url);
        } else {
            self.images.on_error(&url);
        }
    }

    fn probe_selected_images(&mut self) {
        let state = self.session.state();
        let urls: Vec<String> = match &state.selected {
            Some(sel) => [sel.header_image_url.clone(), sel.entry.image_url.clone()]
                .into_iter()
                .flatten()
                .chain(state.achievements.iter().filter_map(|a| a.icon_url.clone()))
                .collect(),
            None => return,
        };
        for url in urls {
            self.probe(url);
        }
    }

    fn probe(&mut self, url: String) {
        if !self.settings.probe_images || !self.images.track(&url) {
            return;
        }
        let client = Arc::clone(&self.client);
        let tx = self.probe_tx.clone();
        tokio::spawn(async move {
            let ok = client.probe_image(&url).await.is_ok();
            let _ = tx.send((url, ok));
        });
    }
}
