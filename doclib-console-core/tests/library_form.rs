use std::sync::Arc;

use doclib_console_core::contract::{
    LibraryId, LibraryPayload, MockLibraryApi, MockViewHost, SyncAck,
};
use doclib_console_core::dataset::Dataset;
use doclib_console_core::effect::Navigation;
use doclib_console_core::error::ApiError;
use doclib_console_core::library_form::{
    parse_tags, ActionOutcome, FormMode, LibraryForm, LibraryFormController, GENERIC_FAILURE,
};
use doclib_console_core::notification::{ChannelNotifier, Notification};

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut seen = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        seen.push(notification);
    }
    seen
}

fn form() -> LibraryForm {
    LibraryForm {
        name: Some("tokio".to_string()),
        display_name: Some("Tokio".to_string()),
        description: None,
        source_type: Some("github".to_string()),
        source_url: Some("https://github.com/tokio-rs/tokio".to_string()),
        category: Some("runtime".to_string()),
        tags: Some(" async, runtime ,,io ".to_string()),
    }
}

fn transport_error() -> ApiError {
    ApiError::Decode(serde_json::from_str::<u8>("{").unwrap_err())
}

#[test]
fn test_parse_tags_splits_on_commas_and_drops_blanks() {
    assert_eq!(parse_tags(" async, runtime ,,io "), vec!["async", "runtime", "io"]);
    assert!(parse_tags(" , ").is_empty());
}

#[test]
fn test_form_mode_requires_edit_flag_and_library_id() {
    let edit = Dataset::new().with("mode", "edit").with("libraryId", "lib-1");
    assert_eq!(
        FormMode::from_dataset(&edit),
        FormMode::Edit(LibraryId::new("lib-1"))
    );
    assert_eq!(
        FormMode::from_dataset(&Dataset::new().with("mode", "edit")),
        FormMode::Create
    );
    assert_eq!(FormMode::from_dataset(&Dataset::new()), FormMode::Create);
    assert_eq!(FormMode::Create.submit_label(), "Create Library");
}

#[tokio::test(start_paused = true)]
async fn test_create_notifies_and_redirects_to_library_list() {
    let mut api = MockLibraryApi::new();
    api.expect_create_library()
        .withf(|payload: &LibraryPayload| {
            payload.name.as_deref() == Some("tokio")
                && payload.tags == vec!["async", "runtime", "io"]
                && payload.description.is_none()
        })
        .times(1)
        .returning(|_| Ok(()));
    let mut host = MockViewHost::new();
    host.expect_navigate()
        .withf(|target: &Navigation| *target == Navigation::Visit("/libraries".to_string()))
        .times(1)
        .return_const(());

    let (notifier, mut rx) = ChannelNotifier::new();
    let mut controller = LibraryFormController::new(Arc::new(api), Arc::new(notifier), Arc::new(host));

    let outcome = controller.submit(&Dataset::new(), &form()).await;
    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(drain(&mut rx)[0].message, "Library created");

    controller.settle().await;
}

#[tokio::test]
async fn test_update_failure_surfaces_server_detail_and_restores_label() {
    let mut api = MockLibraryApi::new();
    api.expect_update_library()
        .withf(|id: &LibraryId, _: &LibraryPayload| id.as_str() == "lib-1")
        .times(1)
        .returning(|_, _| {
            Err(ApiError::Rejected {
                status: 422,
                detail: Some("Name already taken".to_string()),
            })
        });
    let mut host = MockViewHost::new();
    host.expect_navigate().never();

    let (notifier, mut rx) = ChannelNotifier::new();
    let mut controller = LibraryFormController::new(Arc::new(api), Arc::new(notifier), Arc::new(host));
    let element = Dataset::new().with("mode", "edit").with("libraryId", "lib-1");

    let outcome = controller.submit(&element, &form()).await;
    assert_eq!(
        outcome,
        ActionOutcome::Failed {
            restore_label: "Update Library".to_string()
        }
    );
    let notifications = drain(&mut rx);
    assert!(notifications[0].is_error());
    assert_eq!(notifications[0].message, "Name already taken");
}

#[tokio::test]
async fn test_submit_transport_failure_uses_generic_message() {
    let mut api = MockLibraryApi::new();
    api.expect_create_library().returning(|_| Err(transport_error()));
    let (notifier, mut rx) = ChannelNotifier::new();
    let mut controller = LibraryFormController::new(
        Arc::new(api),
        Arc::new(notifier),
        Arc::new(MockViewHost::new()),
    );

    controller.submit(&Dataset::new(), &form()).await;
    assert_eq!(drain(&mut rx)[0].message, GENERIC_FAILURE);
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let mut api = MockLibraryApi::new();
    api.expect_delete_library().never();
    let mut host = MockViewHost::new();
    host.expect_confirm()
        .withf(|message: &str| message.contains("Delete Tokio?"))
        .times(1)
        .return_const(false);

    let (notifier, mut rx) = ChannelNotifier::new();
    let mut controller = LibraryFormController::new(Arc::new(api), Arc::new(notifier), Arc::new(host));
    let button = Dataset::new()
        .with("deleteLibrary", "lib-1")
        .with("libraryName", "Tokio");

    assert_eq!(controller.delete(&button).await, ActionOutcome::Cancelled);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_confirmed_delete_redirects() {
    let mut api = MockLibraryApi::new();
    api.expect_delete_library()
        .withf(|id: &LibraryId| id.as_str() == "lib-1")
        .times(1)
        .returning(|_| Ok(()));
    let mut host = MockViewHost::new();
    host.expect_confirm().return_const(true);
    host.expect_navigate()
        .withf(|target: &Navigation| *target == Navigation::Visit("/libraries".to_string()))
        .times(1)
        .return_const(());

    let (notifier, mut rx) = ChannelNotifier::new();
    let mut controller = LibraryFormController::new(Arc::new(api), Arc::new(notifier), Arc::new(host));

    let outcome = controller
        .delete(&Dataset::new().with("deleteLibrary", "lib-1"))
        .await;
    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(drain(&mut rx)[0].message, "Library deleted");
    controller.settle().await;
}

#[tokio::test]
async fn test_rejected_delete_notifies_delete_failed() {
    let mut api = MockLibraryApi::new();
    api.expect_delete_library().returning(|_| {
        Err(ApiError::Rejected {
            status: 409,
            detail: Some("has versions".to_string()),
        })
    });
    let mut host = MockViewHost::new();
    host.expect_confirm().return_const(true);

    let (notifier, mut rx) = ChannelNotifier::new();
    let mut controller = LibraryFormController::new(Arc::new(api), Arc::new(notifier), Arc::new(host));

    let outcome = controller
        .delete(&Dataset::new().with("deleteLibrary", "lib-1"))
        .await;
    assert!(matches!(outcome, ActionOutcome::Failed { .. }));
    assert_eq!(drain(&mut rx)[0].message, "Delete failed");
}

#[tokio::test]
async fn test_delete_without_library_id_is_miswired() {
    let mut api = MockLibraryApi::new();
    api.expect_delete_library().never();
    let mut host = MockViewHost::new();
    host.expect_confirm().never();
    let (notifier, _rx) = ChannelNotifier::new();
    let mut controller = LibraryFormController::new(Arc::new(api), Arc::new(notifier), Arc::new(host));

    assert_eq!(controller.delete(&Dataset::new()).await, ActionOutcome::Miswired);
}

#[tokio::test(start_paused = true)]
async fn test_sync_version_prompts_when_button_has_no_version() {
    let mut api = MockLibraryApi::new();
    api.expect_sync_version()
        .withf(|id: &LibraryId, version: &str| id.as_str() == "lib-1" && version == "1.2.3")
        .times(1)
        .returning(|_, _| {
            Ok(SyncAck {
                message: Some("Sync queued for 1.2.3".to_string()),
            })
        });
    let mut host = MockViewHost::new();
    host.expect_prompt()
        .times(1)
        .return_const(Some(" 1.2.3 ".to_string()));
    host.expect_navigate()
        .withf(|target: &Navigation| *target == Navigation::Reload)
        .times(1)
        .return_const(());

    let (notifier, mut rx) = ChannelNotifier::new();
    let mut controller = LibraryFormController::new(Arc::new(api), Arc::new(notifier), Arc::new(host));

    let outcome = controller
        .sync_version(&Dataset::new().with("syncLibrary", "lib-1"))
        .await;
    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(drain(&mut rx)[0].message, "Sync queued for 1.2.3");
    controller.settle().await;
}

#[tokio::test]
async fn test_sync_version_cancelled_prompt_sends_nothing() {
    let mut api = MockLibraryApi::new();
    api.expect_sync_version().never();
    let mut host = MockViewHost::new();
    host.expect_prompt().times(1).return_const(None::<String>);
    let (notifier, _rx) = ChannelNotifier::new();
    let mut controller = LibraryFormController::new(Arc::new(api), Arc::new(notifier), Arc::new(host));

    let outcome = controller
        .sync_version(&Dataset::new().with("syncLibrary", "lib-1"))
        .await;
    assert_eq!(outcome, ActionOutcome::Cancelled);
}

#[tokio::test]
async fn test_sync_version_uses_version_from_button() {
    let mut api = MockLibraryApi::new();
    api.expect_sync_version()
        .withf(|_: &LibraryId, version: &str| version == "2.0")
        .times(1)
        .returning(|_, _| {
            Err(ApiError::Rejected {
                status: 404,
                detail: None,
            })
        });
    let mut host = MockViewHost::new();
    host.expect_prompt().never();
    let (notifier, mut rx) = ChannelNotifier::new();
    let mut controller = LibraryFormController::new(Arc::new(api), Arc::new(notifier), Arc::new(host));

    let button = Dataset::new()
        .with("syncLibrary", "lib-1")
        .with("version", "2.0");
    let outcome = controller.sync_version(&button).await;
    assert_eq!(
        outcome,
        ActionOutcome::Failed {
            restore_label: "Sync".to_string()
        }
    );
    assert_eq!(drain(&mut rx)[0].message, "Sync failed");
}
