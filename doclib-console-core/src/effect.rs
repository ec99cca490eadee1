//! Side-effect intents produced by the reducers.
//!
//! Reducers decide; controllers execute. Keeping the two apart lets every state
//! transition be tested without a network, a timer or a view.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::contract::{BatchSyncRequest, LibraryId, ViewHost};
use crate::notification::Notification;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Reload the current view.
    Reload,
    /// Go to another view.
    Visit(String),
}

/// Identifies one release fetch. Outcomes carrying a stale ticket are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub library_id: LibraryId,
    pub session: u64,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Notify(Notification),
    FetchReleases(FetchTicket),
    SubmitBatchSync {
        library_id: LibraryId,
        request: BatchSyncRequest,
    },
    Navigate {
        target: Navigation,
        after: Duration,
    },
}

/// Navigates after `after` has elapsed, without blocking the caller.
pub fn schedule_navigation(
    host: Arc<dyn ViewHost>,
    target: Navigation,
    after: Duration,
) -> JoinHandle<()> {
    debug!(?target, delay_ms = after.as_millis() as u64, "Scheduling navigation");
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        host.navigate(&target);
    })
}
