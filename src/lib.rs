//! Command-line front end for the documentation-library console.
//!
//! The controllers live in `doclib-console-core`; this crate wires them to a
//! terminal and the HTTP API.

pub mod cli;
pub mod host;
pub mod load_config;
