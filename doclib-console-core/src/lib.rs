#![doc = "doclib-console-core: controller logic for the documentation-library management console."]

//! This crate contains the state machines, HTTP contract types and the API client
//! behind the console. Rendering and input handling belong to the front end, which
//! drives the controllers here and observes their view-state.
//!
//! # Usage
//! Build a [`contract::LibraryApi`] (usually [`http::HttpLibraryApi`]), a
//! [`contract::Notifier`] and a [`contract::ViewHost`], then hand them to
//! [`search::SearchController`], [`release_sync::ReleaseSyncController`] or
//! [`library_form::LibraryFormController`].

pub mod config;
pub mod contract;
pub mod dataset;
pub mod effect;
pub mod error;
pub mod escape;
pub mod http;
pub mod library_form;
pub mod notification;
pub mod release_sync;
pub mod search;

pub use contract::{LibraryApi, LibraryId, Notifier, ViewHost};
pub use error::ApiError;
