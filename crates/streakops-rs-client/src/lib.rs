//! Remote accessor and local session plumbing for the config service.
//!
//! The [`TemplateClient`] is the toolkit's only I/O boundary: it fetches one
//! record, hands it to the pure merge logic, and posts the whole mutated
//! record back. There is no cache, no version token, and no retry; two
//! operators racing on the same key is a lost-update hazard the service does
//! not detect.

mod backup;
mod client;
mod credentials;
mod error;

/// Local backup session for operator review and rollback.
pub use backup::BackupSession;
/// HTTP accessor for the template endpoint.
pub use client::{AUTOMATION_MARKER, TemplateClient};
/// Credentials file loading.
pub use credentials::{default_credentials_path, load_credentials};
/// Client error taxonomy.
pub use error::ClientError;
