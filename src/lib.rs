#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # gigbook
//!
//! Command-line client for the gigbook API. The library half holds the
//! clap definitions, the command handlers and the text renderers so they
//! can be driven against an in-memory API in tests.

pub mod cli;
pub mod commands;
pub mod render;

pub use commands::{App, StderrNotifier};
