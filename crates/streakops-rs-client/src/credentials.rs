//! Credentials file loading.
//!
//! Every remote operation authenticates with the `userid` / `_cred_apikey`
//! header pair read from a local JSON file. A missing file is a fatal
//! precondition, not a degraded mode.

use crate::ClientError;
use directories::BaseDirs;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use streakops_rs_protocol::Credentials;

/// Default credentials location: `~/.streakops/credentials.json`.
pub fn default_credentials_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".streakops").join("credentials.json"))
}

/// Load credentials from a file containing `{"userid": ..., "apikey": ...}`.
pub fn load_credentials(path: &Path) -> Result<Credentials, ClientError> {
    if !path.exists() {
        return Err(ClientError::CredentialsMissing(path.display().to_string()));
    }
    let contents = fs::read_to_string(path)
        .map_err(|err| ClientError::CredentialsInvalid(err.to_string()))?;
    let credentials: Credentials = serde_json::from_str(&contents)
        .map_err(|err| ClientError::CredentialsInvalid(err.to_string()))?;
    if credentials.userid.trim().is_empty() || credentials.apikey.trim().is_empty() {
        return Err(ClientError::CredentialsInvalid(
            "userid and apikey must both be non-empty".to_string(),
        ));
    }
    debug!("loaded credentials (userid={})", credentials.userid);
    Ok(credentials)
}
