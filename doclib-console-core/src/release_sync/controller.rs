use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::SyncSettings;
use crate::contract::{LibraryApi, Notifier, ViewHost};
use crate::dataset::Dataset;
use crate::effect::{schedule_navigation, Effect};

use super::modal::ReleaseSyncModal;

/// Drives a [`ReleaseSyncModal`] against the real world.
///
/// The modal lives in a `watch` channel, so a front end can [`subscribe`] and keep
/// handling input while a fetch or submission is outstanding. Each operation runs the
/// reducer synchronously and hands the effects it returns to a spawned task. The
/// modal state is the only gate against concurrent submissions.
///
/// [`subscribe`]: ReleaseSyncController::subscribe
pub struct ReleaseSyncController {
    runner: EffectRunner,
    tasks: Vec<JoinHandle<()>>,
}

impl ReleaseSyncController {
    pub fn new(
        api: Arc<dyn LibraryApi>,
        notifier: Arc<dyn Notifier>,
        host: Arc<dyn ViewHost>,
        settings: SyncSettings,
    ) -> Self {
        let (modal, _) = watch::channel(ReleaseSyncModal::new(settings));
        Self {
            runner: EffectRunner {
                api,
                notifier,
                host,
                modal: Arc::new(modal),
            },
            tasks: Vec::new(),
        }
    }

    /// Snapshot of the modal.
    pub fn modal(&self) -> ReleaseSyncModal {
        self.runner.modal.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ReleaseSyncModal> {
        self.runner.modal.subscribe()
    }

    /// Opens the dialog; the release fetch runs in the background.
    pub fn open(&mut self, trigger: &Dataset) {
        let mut effects = Vec::new();
        self.runner.modal.send_if_modified(|modal| {
            effects = modal.open(trigger);
            !effects.is_empty()
        });
        self.spawn(effects);
    }

    pub fn close(&mut self) -> bool {
        self.runner.modal.send_if_modified(ReleaseSyncModal::close)
    }

    pub fn toggle_select_all(&mut self) {
        self.runner.modal.send_modify(ReleaseSyncModal::toggle_select_all);
    }

    pub fn toggle(&mut self, tag_name: &str) -> bool {
        self.runner
            .modal
            .send_if_modified(|modal| modal.toggle(tag_name))
    }

    /// Submits the selection; the request runs in the background.
    pub fn start_sync(&mut self) {
        let mut effects = Vec::new();
        self.runner.modal.send_modify(|modal| effects = modal.start_sync());
        self.spawn(effects);
    }

    /// Waits for outstanding fetches, submissions and scheduled navigations.
    pub async fn settle(&mut self) {
        for handle in self.tasks.drain(..) {
            let _ = handle.await;
        }
    }

    fn spawn(&mut self, effects: Vec<Effect>) {
        self.tasks.retain(|handle| !handle.is_finished());
        if effects.is_empty() {
            return;
        }
        let runner = self.runner.clone();
        self.tasks.push(tokio::spawn(runner.execute(effects)));
    }
}

/// Executes effects until none are left. Never holds the modal across an await.
#[derive(Clone)]
struct EffectRunner {
    api: Arc<dyn LibraryApi>,
    notifier: Arc<dyn Notifier>,
    host: Arc<dyn ViewHost>,
    modal: Arc<watch::Sender<ReleaseSyncModal>>,
}

impl EffectRunner {
    async fn execute(self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Notify(notification) => self.notifier.notify(notification),
                Effect::FetchReleases(ticket) => {
                    let outcome = self.api.list_releases(&ticket.library_id, ticket.limit).await;
                    self.modal
                        .send_if_modified(|modal| modal.releases_loaded(&ticket, outcome));
                }
                Effect::SubmitBatchSync {
                    library_id,
                    request,
                } => {
                    let outcome = self.api.batch_sync(&library_id, &request).await;
                    let mut next = Vec::new();
                    self.modal
                        .send_modify(|modal| next = modal.sync_finished(outcome));
                    queue.extend(next);
                }
                Effect::Navigate { target, after } => {
                    debug!(?target, "Queueing navigation after sync");
                    let _ = schedule_navigation(Arc::clone(&self.host), target, after).await;
                }
            }
        }
    }
}
