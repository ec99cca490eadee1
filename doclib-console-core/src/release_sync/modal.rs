use tracing::{debug, error, info, warn};

use crate::config::SyncSettings;
use crate::contract::{
    BatchSyncRequest, BatchSyncVersion, LibraryId, ReleaseInfo, ReleaseListing, SyncAck,
};
use crate::dataset::{self, Dataset};
use crate::effect::{Effect, FetchTicket, Navigation};
use crate::error::ApiError;
use crate::notification::Notification;

pub const LOAD_FAILED: &str = "Failed to load releases, please try again later";
pub const NOTHING_SELECTED: &str = "Please select at least one version";
pub const SYNC_STARTED: &str = "Sync started";
pub const SYNC_FAILED: &str = "Sync failed, please try again later";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Loading,
    /// `error` is set when the release fetch failed.
    Ready { error: Option<String> },
    Syncing,
}

/// One upstream version offered for sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCandidate {
    pub tag_name: String,
    pub version: String,
    pub docs_path: String,
    pub exists: bool,
    pub selected: bool,
}

impl ReleaseCandidate {
    pub fn is_selectable(&self) -> bool {
        !self.exists
    }

    fn is_chosen(&self) -> bool {
        self.selected && !self.exists
    }
}

impl From<ReleaseInfo> for ReleaseCandidate {
    fn from(info: ReleaseInfo) -> Self {
        Self {
            tag_name: info.tag_name,
            version: info.version,
            docs_path: info.docs_path,
            exists: info.exists,
            selected: false,
        }
    }
}

/// The batch-sync dialog as a state record with one reducer per operation.
///
/// Invariant: a candidate with `exists == true` is never selected. No operation
/// here can break it.
#[derive(Debug, Clone)]
pub struct ReleaseSyncModal {
    settings: SyncSettings,
    state: ModalState,
    library_id: Option<LibraryId>,
    default_docs_path: String,
    releases: Vec<ReleaseCandidate>,
    session: u64,
}

impl Default for ReleaseSyncModal {
    fn default() -> Self {
        Self::new(SyncSettings::default())
    }
}

impl ReleaseSyncModal {
    pub fn new(settings: SyncSettings) -> Self {
        Self {
            default_docs_path: settings.fallback_docs_path.clone(),
            settings,
            state: ModalState::Closed,
            library_id: None,
            releases: Vec::new(),
            session: 0,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ModalState::Ready { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn library_id(&self) -> Option<&LibraryId> {
        self.library_id.as_ref()
    }

    pub fn default_docs_path(&self) -> &str {
        &self.default_docs_path
    }

    pub fn releases(&self) -> &[ReleaseCandidate] {
        &self.releases
    }

    pub fn selected_count(&self) -> usize {
        self.releases.iter().filter(|r| r.is_chosen()).count()
    }

    /// True iff there is at least one selectable candidate and all of them are selected.
    pub fn all_selectable_selected(&self) -> bool {
        let mut selectable = self.releases.iter().filter(|r| r.is_selectable()).peekable();
        selectable.peek().is_some() && selectable.all(|r| r.selected)
    }

    /// Opens the dialog for the library named by the trigger's `libraryId`.
    pub fn open(&mut self, trigger: &Dataset) -> Vec<Effect> {
        if self.state != ModalState::Closed {
            warn!(state = ?self.state, "Ignoring open while the sync dialog is already open");
            return Vec::new();
        }
        let Some(library_id) = trigger.library_id(dataset::LIBRARY_ID) else {
            error!("Library ID not found on sync trigger");
            return Vec::new();
        };

        self.session += 1;
        self.state = ModalState::Loading;
        self.releases.clear();
        self.default_docs_path = self.settings.fallback_docs_path.clone();
        self.library_id = Some(library_id.clone());
        info!(library_id = %library_id, session = self.session, "Opening release sync dialog");

        vec![Effect::FetchReleases(FetchTicket {
            library_id,
            session: self.session,
            limit: self.settings.release_limit,
        })]
    }

    /// Applies the outcome of a release fetch. Returns `false` if it was stale.
    pub fn releases_loaded(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<ReleaseListing, ApiError>,
    ) -> bool {
        let current = self.state == ModalState::Loading
            && ticket.session == self.session
            && self.library_id.as_ref() == Some(&ticket.library_id);
        if !current {
            debug!(
                library_id = %ticket.library_id,
                session = ticket.session,
                current_session = self.session,
                "Discarding stale release listing"
            );
            return false;
        }

        match outcome {
            Ok(listing) => {
                self.default_docs_path = listing
                    .default_docs_path
                    .filter(|path| !path.trim().is_empty())
                    .unwrap_or_else(|| self.settings.fallback_docs_path.clone());
                self.releases = listing
                    .releases
                    .into_iter()
                    .map(ReleaseCandidate::from)
                    .collect();
                info!(
                    library_id = %ticket.library_id,
                    releases = self.releases.len(),
                    docs_path = %self.default_docs_path,
                    "Release candidates loaded"
                );
                self.state = ModalState::Ready { error: None };
            }
            Err(e) => {
                error!(error = %e, library_id = %ticket.library_id, "Failed to load releases");
                self.releases.clear();
                self.state = ModalState::Ready {
                    error: Some(LOAD_FAILED.to_string()),
                };
            }
        }
        true
    }

    /// Closes the dialog unless a submission is outstanding.
    pub fn close(&mut self) -> bool {
        if self.state == ModalState::Syncing {
            debug!("Refusing to close the sync dialog while syncing");
            return false;
        }
        self.state = ModalState::Closed;
        self.releases.clear();
        true
    }

    /// Selects every selectable candidate, or deselects them all if they already are.
    pub fn toggle_select_all(&mut self) {
        if !self.is_ready() {
            return;
        }
        if !self.releases.iter().any(ReleaseCandidate::is_selectable) {
            return;
        }
        let select = !self.all_selectable_selected();
        for release in self.releases.iter_mut().filter(|r| r.is_selectable()) {
            release.selected = select;
        }
    }

    /// Flips one candidate. Already-indexed candidates stay unselected.
    pub fn toggle(&mut self, tag_name: &str) -> bool {
        if !self.is_ready() {
            return false;
        }
        match self.releases.iter_mut().find(|r| r.tag_name == tag_name) {
            Some(release) if release.is_selectable() => {
                release.selected = !release.selected;
                true
            }
            Some(_) => {
                debug!(tag = tag_name, "Release already indexed, not selectable");
                false
            }
            None => false,
        }
    }

    /// Submits the selected candidates as one batch.
    pub fn start_sync(&mut self) -> Vec<Effect> {
        if !self.is_ready() {
            debug!(state = ?self.state, "Ignoring sync request outside the ready state");
            return Vec::new();
        }
        let Some(library_id) = self.library_id.clone() else {
            error!("Sync dialog is ready without a library ID");
            return Vec::new();
        };

        let versions: Vec<BatchSyncVersion> = self
            .releases
            .iter()
            .filter(|r| r.is_chosen())
            .map(|r| BatchSyncVersion {
                tag_name: r.tag_name.clone(),
                version: r.version.clone(),
                docs_path: r.docs_path.clone(),
            })
            .collect();

        if versions.is_empty() {
            return vec![Effect::Notify(Notification::error(NOTHING_SELECTED))];
        }

        info!(library_id = %library_id, versions = versions.len(), "Submitting batch sync");
        self.state = ModalState::Syncing;
        vec![Effect::SubmitBatchSync {
            library_id,
            request: BatchSyncRequest {
                versions,
                default_docs_path: self.default_docs_path.clone(),
            },
        }]
    }

    /// Applies the outcome of a batch submission.
    pub fn sync_finished(&mut self, outcome: Result<SyncAck, ApiError>) -> Vec<Effect> {
        if self.state != ModalState::Syncing {
            debug!(state = ?self.state, "Ignoring sync outcome outside the syncing state");
            return Vec::new();
        }

        match outcome {
            Ok(ack) => {
                let message = ack
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| SYNC_STARTED.to_string());
                info!(message = %message, "Batch sync accepted");
                self.state = ModalState::Ready { error: None };
                self.close();
                vec![
                    Effect::Notify(Notification::success(message)),
                    Effect::Navigate {
                        target: Navigation::Reload,
                        after: self.settings.reload_delay(),
                    },
                ]
            }
            Err(e) => {
                error!(error = %e, "Batch sync failed");
                let message = e.detail().unwrap_or(SYNC_FAILED).to_string();
                self.state = ModalState::Ready { error: None };
                vec![Effect::Notify(Notification::error(message))]
            }
        }
    }

    fn is_ready(&self) -> bool {
        matches!(self.state, ModalState::Ready { .. })
    }
}
