use super::state::is_searchable;
use super::SessionEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// What a stabilised query asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceOutcome {
    Search(String),
    ClearResults,
}

impl DebounceOutcome {
    pub fn for_query(query: &str) -> Self {
        if is_searchable(query) {
            DebounceOutcome::Search(query.to_string())
        } else {
            DebounceOutcome::ClearResults
        }
    }
}

/// Re-arms a single timer on every keystroke. Only the firing of the most recent
/// timer is accepted; anything older was superseded while queued.
pub struct QueryDebouncer {
    delay: Duration,
    seq: u64,
    pending: Option<JoinHandle<()>>,
    events: UnboundedSender<SessionEvent>,
}

impl QueryDebouncer {
    pub fn new(delay: Duration, events: UnboundedSender<SessionEvent>) -> Self {
        Self {
            delay,
            seq: 0,
            pending: None,
            events,
        }
    }

    pub fn on_query_change(&mut self, query: String) {
        self.cancel();
        self.seq += 1;

        let seq = self.seq;
        let delay = self.delay;
        let tx = self.events.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SessionEvent::QueryStable { seq, query });
        }));
    }

    /// Claim a timer firing. Returns false for stale or cancelled timers.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq != self.seq || self.pending.is_none() {
            log::trace!("Dropping stale debounce tick {} (current {})", seq, self.seq);
            return false;
        }
        self.pending = None;
        true
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
