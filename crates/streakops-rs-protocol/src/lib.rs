//! Shared domain types for the streakops toolkit.
//!
//! This crate owns the config-record wire shape, the config-key registry, and
//! the campaign parameter object consumed by the merge strategies and the CLI.

mod campaign;
mod record;

/// Campaign parameter and identity types.
pub use campaign::{CampaignIdentity, CampaignSpec, CampaignType};
/// Config record and config-key registry types.
pub use record::{ConfigKind, ConfigRecord, Credentials};

use thiserror::Error;

/// Errors returned while validating protocol types.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A campaign field failed validation.
    #[error("invalid campaign at {field}: {message}")]
    InvalidField { field: String, message: String },
    /// A config key string does not name a known config.
    #[error("unknown config key: {0}")]
    UnknownConfigKey(String),
    /// A campaign type string is not UPI, SNP, or P2P.
    #[error("unknown campaign type: {0}")]
    UnknownCampaignType(String),
}
