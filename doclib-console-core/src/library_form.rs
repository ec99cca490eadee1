//! LibraryFormController: one-shot create/update/delete/sync requests.
//!
//! No state machine here. Each action issues one request; success notifies and
//! navigates after a short delay, failure notifies and leaves the view as it was.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::contract::{LibraryApi, LibraryId, LibraryPayload, Notifier, ViewHost};
use crate::dataset::{self, Dataset};
use crate::effect::{schedule_navigation, Navigation};
use crate::error::ApiError;
use crate::notification::Notification;

pub const LIBRARIES_PATH: &str = "/libraries";
pub const REDIRECT_DELAY: Duration = Duration::from_millis(500);
pub const RELOAD_DELAY: Duration = Duration::from_millis(1000);

pub const GENERIC_FAILURE: &str = "Something went wrong, please try again later";
pub const OPERATION_FAILED: &str = "Operation failed";
pub const DELETE_FAILED: &str = "Delete failed";
pub const SYNC_FAILED: &str = "Sync failed";
pub const SYNC_STARTED: &str = "Sync started";
pub const VERSION_PROMPT: &str = "Enter the version to sync:";

/// Raw values of the library form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryForm {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub source_type: Option<String>,
    pub source_url: Option<String>,
    pub category: Option<String>,
    /// Comma-separated.
    pub tags: Option<String>,
}

impl LibraryForm {
    pub fn to_payload(&self) -> LibraryPayload {
        LibraryPayload {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            description: self.description.clone(),
            source_type: self.source_type.clone(),
            source_url: self.source_url.clone(),
            category: self.category.clone(),
            tags: self.tags.as_deref().map(parse_tags).unwrap_or_default(),
        }
    }
}

pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(LibraryId),
}

impl FormMode {
    /// Edit mode needs both `mode="edit"` and a library id on the form element.
    pub fn from_dataset(form: &Dataset) -> Self {
        match (form.get(dataset::MODE), form.library_id(dataset::LIBRARY_ID)) {
            (Some("edit"), Some(id)) => FormMode::Edit(id),
            _ => FormMode::Create,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Create => "Create Library",
            FormMode::Edit(_) => "Update Library",
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            FormMode::Create => "Library created",
            FormMode::Edit(_) => "Library updated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The request succeeded and a navigation is scheduled.
    Completed,
    /// The request failed; the trigger should be re-enabled with this label.
    Failed { restore_label: String },
    /// The user declined or supplied nothing. No request was made.
    Cancelled,
    /// The trigger was missing required data. No request was made.
    Miswired,
}

pub struct LibraryFormController {
    api: Arc<dyn LibraryApi>,
    notifier: Arc<dyn Notifier>,
    host: Arc<dyn ViewHost>,
    scheduled: Vec<JoinHandle<()>>,
}

impl LibraryFormController {
    pub fn new(
        api: Arc<dyn LibraryApi>,
        notifier: Arc<dyn Notifier>,
        host: Arc<dyn ViewHost>,
    ) -> Self {
        Self {
            api,
            notifier,
            host,
            scheduled: Vec::new(),
        }
    }

    /// Creates or updates a library depending on the form element's dataset.
    pub async fn submit(&mut self, form_element: &Dataset, form: &LibraryForm) -> ActionOutcome {
        let mode = FormMode::from_dataset(form_element);
        let payload = form.to_payload();
        info!(?mode, name = ?payload.name, "Submitting library form");

        let outcome = match &mode {
            FormMode::Create => self.api.create_library(&payload).await,
            FormMode::Edit(id) => self.api.update_library(id, &payload).await,
        };

        match outcome {
            Ok(()) => {
                self.notifier.notify(Notification::success(mode.success_message()));
                self.navigate_later(Navigation::Visit(LIBRARIES_PATH.to_string()), REDIRECT_DELAY);
                ActionOutcome::Completed
            }
            Err(e) => {
                self.report_failure("Library form submission failed", &e, OPERATION_FAILED);
                ActionOutcome::Failed {
                    restore_label: mode.submit_label().to_string(),
                }
            }
        }
    }

    /// Deletes the library named by the button's `deleteLibrary`, after confirmation.
    pub async fn delete(&mut self, button: &Dataset) -> ActionOutcome {
        let Some(id) = button.library_id(dataset::DELETE_LIBRARY) else {
            error!("Library ID not found on delete button");
            return ActionOutcome::Miswired;
        };
        let name = button.get(dataset::LIBRARY_NAME).unwrap_or("this library");
        if !self
            .host
            .confirm(&format!("Delete {name}? This cannot be undone."))
        {
            info!(library_id = %id, "Delete declined");
            return ActionOutcome::Cancelled;
        }

        match self.api.delete_library(&id).await {
            Ok(()) => {
                info!(library_id = %id, "Library deleted");
                self.notifier.notify(Notification::success("Library deleted"));
                self.navigate_later(Navigation::Visit(LIBRARIES_PATH.to_string()), REDIRECT_DELAY);
                ActionOutcome::Completed
            }
            Err(e) if e.is_rejection() => {
                error!(error = %e, library_id = %id, "Delete rejected");
                self.notifier.notify(Notification::error(DELETE_FAILED));
                ActionOutcome::Failed {
                    restore_label: "Delete".to_string(),
                }
            }
            Err(e) => {
                error!(error = %e, library_id = %id, "Delete failed");
                self.notifier.notify(Notification::error(GENERIC_FAILURE));
                ActionOutcome::Failed {
                    restore_label: "Delete".to_string(),
                }
            }
        }
    }

    /// Syncs a single version; asks for it when the button does not carry one.
    pub async fn sync_version(&mut self, button: &Dataset) -> ActionOutcome {
        let Some(id) = button.library_id(dataset::SYNC_LIBRARY) else {
            error!("Library ID not found on sync button");
            return ActionOutcome::Miswired;
        };
        let version = match button.get(dataset::VERSION) {
            Some(version) => Some(version.trim().to_string()),
            None => self
                .host
                .prompt(VERSION_PROMPT)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        };
        let Some(version) = version else {
            return ActionOutcome::Cancelled;
        };

        info!(library_id = %id, version = %version, "Triggering single-version sync");
        match self.api.sync_version(&id, &version).await {
            Ok(ack) => {
                let message = ack
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| SYNC_STARTED.to_string());
                self.notifier.notify(Notification::success(message));
                self.navigate_later(Navigation::Reload, RELOAD_DELAY);
                ActionOutcome::Completed
            }
            Err(e) => {
                self.report_failure("Single-version sync failed", &e, SYNC_FAILED);
                ActionOutcome::Failed {
                    restore_label: "Sync".to_string(),
                }
            }
        }
    }

    fn report_failure(&self, context: &str, e: &ApiError, rejected_default: &str) {
        error!(error = %e, "{context}");
        let message = if e.is_rejection() {
            e.detail().unwrap_or(rejected_default)
        } else {
            GENERIC_FAILURE
        };
        self.notifier.notify(Notification::error(message));
    }

    /// Waits for scheduled navigations to fire.
    pub async fn settle(&mut self) {
        for handle in self.scheduled.drain(..) {
            let _ = handle.await;
        }
    }

    fn navigate_later(&mut self, target: Navigation, after: Duration) {
        self.scheduled
            .push(schedule_navigation(Arc::clone(&self.host), target, after));
    }
}
