//! Campaign entry merge/remove logic for the template configs.
//!
//! Everything in this crate is pure: functions take an already-decoded config
//! payload plus explicit campaign parameters and return the mutated payload.
//! The HTTP accessor in `streakops-rs-client` is the only I/O boundary.

mod document;
mod entry;
mod error;
mod resolver;

pub mod audit;
pub mod journey;
pub mod keyed;
pub mod streak_config;
pub mod template;

/// Encoded-document decode/encode pair for JSON-kind config values.
pub use document::{decode_json, encode_json, pretty_json};
/// Error type shared by the merge strategies.
pub use error::MergeError;
/// Keyed `configs`-array payload shared by five config kinds.
pub use keyed::KeyedConfigValue;
/// Sentinel-anchored insertion-point resolution.
pub use resolver::resolve_insertion_index;
