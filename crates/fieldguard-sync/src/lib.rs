//! Push checked schema documents to a project's interface endpoint.
//!
//! A document is run through the consistency checker before anything is
//! sent. The server's answer is reported as a [`SyncOutcome`]; transport
//! failures are part of the outcome, not an error.

pub mod client;
pub mod config;
pub mod error;

pub use client::{SyncClient, SyncOutcome, SyncReport};
pub use config::{DEFAULT_API_DOMAIN, SyncConfig};
pub use error::{EnvError, SyncError};
