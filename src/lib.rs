//! `macro-lens` library crate.
//!
//! The binary (`mlens`) is a thin wrapper around this library so that:
//!
//! - the analytics engine is testable without spawning processes
//! - modules are reusable (e.g., future GUI/daemon, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod align;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
