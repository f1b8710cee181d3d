//! Error types for the merge strategies.

use thiserror::Error;

/// Errors returned by config mutation and encoding.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The config value is not valid JSON where JSON was expected. Fatal for
    /// that config; batch callers continue with the next one.
    #[error("failed to decode config value: {0}")]
    Decode(#[from] serde_json::Error),
    /// A template anchor pattern could not be located. Fatal: free text has
    /// no safe fallback position.
    #[error("template anchor not found: {0}")]
    TemplateStructureNotFound(&'static str),
    /// The campaign type is not served by this config.
    #[error("{config} does not apply to {campaign_type} campaigns")]
    UnsupportedCampaignType {
        config: &'static str,
        campaign_type: String,
    },
}
