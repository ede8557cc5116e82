//! The interactive session: one explicit state value, the controllers that own its fields,
//! and the event loop glue that runs network calls and the debounce timer as tasks.
//!
//! Nothing here is shared between threads. Spawned tasks only ever report back through
//! [`SessionEvent`]s, which the owner applies one at a time with [`Session::handle_event`].

pub mod achievements;
pub mod debouncer;
pub mod search;
pub mod selection;
pub mod state;
pub mod view;

use crate::catalog_api::CatalogClient;
use crate::error_classifier::FetchError;
use crate::models::{CatalogEntry, DetailResponse};
use achievements::AchievementController;
use debouncer::{DebounceOutcome, QueryDebouncer};
use search::SearchController;
use selection::SelectionController;
use state::SessionState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinHandle, JoinSet};
use view::ViewState;

#[derive(Debug)]
pub enum SessionEvent {
    QueryStable {
        seq: u64,
        query: String,
    },
    SearchFinished {
        generation: u64,
        result: Result<Vec<CatalogEntry>, FetchError>,
    },
    DetailsFinished {
        generation: u64,
        id: u64,
        result: Result<DetailResponse, FetchError>,
    },
}

pub struct Session {
    state: SessionState,
    client: Arc<dyn CatalogClient>,
    events: UnboundedSender<SessionEvent>,
    debouncer: QueryDebouncer,
    search: SearchController,
    selection: SelectionController,
    achievements: AchievementController,
    search_tasks: JoinSet<()>,
    detail_task: Option<JoinHandle<()>>,
    // A debounce timer was pending when an entry was selected; re-armed on clear.
    deferred_query: bool,
}

impl Session {
    /// Must be called inside a tokio runtime. The receiver is the session's event queue;
    /// feed everything it yields back into [`Session::handle_event`].
    pub fn new(
        client: Arc<dyn CatalogClient>,
        debounce: Duration,
    ) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            state: SessionState::default(),
            client,
            debouncer: QueryDebouncer::new(debounce, tx.clone()),
            events: tx,
            search: SearchController::new(),
            selection: SelectionController,
            achievements: AchievementController::new(),
            search_tasks: JoinSet::new(),
            detail_task: None,
            deferred_query: false,
        };
        (session, rx)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn view(&self) -> ViewState {
        view::compose(&self.state)
    }

    /// Record a keystroke's worth of query change and re-arm the debounce timer.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.state.query = query.clone();
        self.debouncer.on_query_change(query);
    }

    pub fn search(&mut self, query: &str) {
        let req = self.search.begin(&mut self.state, query);
        let client = Arc::clone(&self.client);
        let tx = self.events.clone();

        while self.search_tasks.try_join_next().is_some() {}
        self.search_tasks.spawn(async move {
            let result = client.search(&req.query).await;
            let _ = tx.send(SessionEvent::SearchFinished {
                generation: req.generation,
                result,
            });
        });
    }

    /// Show `entry` and fetch its achievements. A query still waiting on the debounce
    /// timer is held back until the selection is cleared, so the result list behind the
    /// detail view stays exactly as it was.
    pub fn select(&mut self, entry: CatalogEntry) {
        self.abort_detail_task();
        if self.debouncer.is_pending() {
            self.debouncer.cancel();
            self.deferred_query = true;
        }
        let req = self
            .selection
            .select(&mut self.state, &mut self.achievements, entry);
        let client = Arc::clone(&self.client);
        let tx = self.events.clone();

        self.detail_task = Some(tokio::spawn(async move {
            let result = client.fetch_details(req.id).await;
            let _ = tx.send(SessionEvent::DetailsFinished {
                generation: req.generation,
                id: req.id,
                result,
            });
        }));
    }

    /// Select the `index`-th search result. Returns false if there is no such result.
    pub fn select_result(&mut self, index: usize) -> bool {
        match self.state.results.get(index).cloned() {
            Some(entry) => {
                self.select(entry);
                true
            }
            None => false,
        }
    }

    /// True when the detail fetch failed in a way a retry may fix.
    pub fn can_retry_details(&self) -> bool {
        self.state.selected.is_some()
            && self.state.detail_status == state::Status::Error
            && self.achievements.failure_is_retryable()
    }

    pub fn clear_selection(&mut self) {
        self.abort_detail_task();
        self.selection.clear(&mut self.state, &mut self.achievements);
        if std::mem::take(&mut self.deferred_query) {
            self.debouncer.on_query_change(self.state.query.clone());
        }
    }

    /// Apply one completed piece of asynchronous work. Returns true if the state changed.
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::QueryStable { seq, query } => {
                if !self.debouncer.accept(seq) {
                    return false;
                }
                match DebounceOutcome::for_query(&query) {
                    DebounceOutcome::Search(q) => self.search(&q),
                    DebounceOutcome::ClearResults => self.search.clear_results(&mut self.state),
                }
                true
            }
            SessionEvent::SearchFinished { generation, result } => {
                self.search.finish(&mut self.state, generation, result)
            }
            SessionEvent::DetailsFinished {
                generation,
                id,
                result,
            } => {
                let applied = self
                    .achievements
                    .finish(&mut self.state, generation, id, result);
                if applied {
                    self.detail_task = None;
                }
                applied
            }
        }
    }

    /// Stop the debounce timer and abort every outstanding request.
    pub fn shutdown(&mut self) {
        self.debouncer.cancel();
        self.abort_detail_task();
        self.search_tasks.abort_all();
    }

    fn abort_detail_task(&mut self) {
        if let Some(handle) = self.detail_task.take() {
            handle.abort();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
