use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::SearchSettings;
use crate::contract::{LibraryApi, LibraryId, SearchMode, SearchQuery};

use super::state::{classify_input, submitted_text, InputDecision, ResultArea, SearchState};

const WAITING: u8 = 0;
const ISSUED: u8 = 1;
const CANCELLED: u8 = 2;

/// A debounced search. Only the quiet period can be cancelled; once the request
/// is issued it runs to completion.
struct DebouncedSearch {
    handle: JoinHandle<()>,
    phase: Arc<AtomicU8>,
}

/// Turns keystrokes into searches and keeps the result area current.
///
/// The result area lives in a `watch` channel so a front end can [`subscribe`] and
/// re-render on change. The debounce timer is an explicit task handle: a new
/// keystroke cancels the old timer and replaces it. Requests already issued are
/// left alone; the generation counter drops their response if it is stale.
///
/// [`subscribe`]: SearchController::subscribe
pub struct SearchController {
    api: Arc<dyn LibraryApi>,
    settings: SearchSettings,
    mode: SearchMode,
    library_filter: Option<LibraryId>,
    state: Arc<watch::Sender<SearchState>>,
    pending: Option<DebouncedSearch>,
    in_flight: Vec<JoinHandle<()>>,
}

impl SearchController {
    pub fn new(api: Arc<dyn LibraryApi>, settings: SearchSettings) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            api,
            mode: settings.mode,
            settings,
            library_filter: None,
            state: Arc::new(state),
            pending: None,
            in_flight: Vec::new(),
        }
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    pub fn set_library_filter(&mut self, library: Option<LibraryId>) {
        self.library_filter = library;
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn result_area(&self) -> ResultArea {
        self.state.borrow().area().clone()
    }

    /// True while a debounced search is scheduled or running.
    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.handle.is_finished())
    }

    /// Handles an edit of the search input.
    ///
    /// Short input clears the area immediately; anything else is searched once the
    /// input has been quiet for the debounce period.
    pub fn on_input_changed(&mut self, raw: &str) {
        self.cancel_pending();
        match classify_input(raw) {
            InputDecision::Clear => {
                debug!("Search input below minimum length, clearing results");
                self.state.send_modify(SearchState::clear);
            }
            InputDecision::Debounce(text) => {
                let query = self.build_query(text);
                let api = Arc::clone(&self.api);
                let state = Arc::clone(&self.state);
                let quiet = self.settings.debounce();
                debug!(query = %query.text, quiet_ms = quiet.as_millis() as u64, "Scheduling debounced search");
                let phase = Arc::new(AtomicU8::new(WAITING));
                let task_phase = Arc::clone(&phase);
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(quiet).await;
                    if task_phase
                        .compare_exchange(WAITING, ISSUED, Ordering::SeqCst, Ordering::SeqCst)
                        .is_err()
                    {
                        return;
                    }
                    run_search(api.as_ref(), &state, query).await;
                });
                self.pending = Some(DebouncedSearch { handle, phase });
            }
        }
    }

    /// Handles an explicit submit: searches right away if there is any text.
    pub async fn on_submit(&mut self, raw: &str) {
        self.cancel_pending();
        if let Some(text) = submitted_text(raw) {
            let query = self.build_query(text);
            self.search(query).await;
        }
    }

    pub async fn search(&self, query: SearchQuery) {
        run_search(self.api.as_ref(), &self.state, query).await;
    }

    /// Waits for the scheduled search and any issued requests to finish.
    pub async fn settle(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.in_flight.push(pending.handle);
        }
        for handle in self.in_flight.drain(..) {
            // An aborted task only means a newer keystroke replaced its timer.
            let _ = handle.await;
        }
    }

    fn build_query(&self, text: String) -> SearchQuery {
        SearchQuery {
            text,
            mode: self.mode,
            library_filter: self.library_filter.clone(),
            limit: self.settings.limit,
        }
    }

    /// Cancels the debounce timer. A request that has already gone out keeps running.
    fn cancel_pending(&mut self) {
        self.in_flight.retain(|handle| !handle.is_finished());
        let Some(pending) = self.pending.take() else {
            return;
        };
        match pending
            .phase
            .compare_exchange(WAITING, CANCELLED, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => pending.handle.abort(),
            Err(_) => {
                debug!("Debounced search already issued, letting it finish");
                self.in_flight.push(pending.handle);
            }
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }
}

async fn run_search(api: &dyn LibraryApi, state: &watch::Sender<SearchState>, query: SearchQuery) {
    let mut ticket = None;
    state.send_modify(|s| ticket = Some(s.begin(query)));
    let Some(ticket) = ticket else {
        return;
    };

    info!(query = %ticket.query.text, mode = %ticket.query.mode, "Issuing search");
    let outcome = api.search(&ticket.query).await;
    state.send_if_modified(|s| s.complete(&ticket, outcome));
}
