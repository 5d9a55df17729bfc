//! Core fetch pipeline.
//!
//! This module contains:
//! - search: archive search step
//! - selector: operator-driven candidate selection
//! - downloader: manifest selection and streamed download
//! - orchestrator: runs the stages in order
//! - retry: backoff for transient HTTP failures
//! - error: domain errors

pub mod downloader;
pub mod error;
pub mod orchestrator;
pub mod retry;
pub mod search;
pub mod selector;

// Re-export commonly used types
pub use downloader::Downloader;
pub use error::FetchError;
pub use orchestrator::{FetchOutcome, FetchRequest, Orchestrator};
pub use retry::{is_transient, RetryPolicy};
pub use search::search;
pub use selector::{select, Listing, Operator, ScriptedOperator, Selection, TerminalOperator};
