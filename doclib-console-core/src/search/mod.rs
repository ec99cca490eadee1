//! Incremental search: debounced input, at most one scheduled search, no stale results.
//!
//! - [`state`] is the pure part: input classification and the result-area reducer.
//! - [`render`] turns the result area into escaped markup.
//! - [`controller`] owns the debounce task and talks to the API.

pub mod controller;
pub mod render;
pub mod state;

pub use controller::SearchController;
pub use state::{classify_input, submitted_text, InputDecision, ResultArea, SearchState, SearchTicket};
