//! # bugsink - command-line client for the BugSink error tracking API
//!
//! Wraps the canonical REST API (`/api/canonical/0/`) of a BugSink server:
//! teams, projects, issues, events and releases, rendered as tables, JSON,
//! or bare IDs.
//!
//! ## Quick Start
//!
//! ```bash
//! export BUGSINK_API_KEY="your-token-here"
//! bugsink config set-project 8
//! bugsink config test
//!
//! bugsink issues list --sort=last_seen --order=desc --json
//! bugsink events stacktrace <event-uuid>
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Command-line interface definitions, handlers and output
//! - [`client`]: API client, transport and response normalization
//! - [`config`]: Environment and `.bugsink` dotfile resolution
//! - [`error`]: Error types and result aliases

/// Command-line interface definitions using clap.
pub mod cli;

/// API client for the BugSink REST API.
///
/// Requests go through an injectable `Transport`; responses are normalized
/// into `ListResult` or single JSON records.
pub mod client;

/// Configuration resolution.
///
/// Reads `BUGSINK_*` environment variables and the per-directory `.bugsink` file.
pub mod config;

/// Error types and result aliases.
///
/// Defines `BugsinkError`, `ClientError` and `Result<T>`.
pub mod error;

pub mod logging;
