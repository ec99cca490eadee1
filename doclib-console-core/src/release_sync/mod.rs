//! Batch synchronisation of upstream releases.
//!
//! `Closed → Loading → Ready ⇄ Syncing → Closed | Ready`. The pure reducer lives in
//! [`modal`]; [`controller`] executes the effects it emits.

pub mod controller;
pub mod modal;

pub use controller::ReleaseSyncController;
pub use modal::{ModalState, ReleaseCandidate, ReleaseSyncModal};
