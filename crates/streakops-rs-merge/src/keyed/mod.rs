//! Strategies for configs whose payload is a `configs` array of entries
//! identified by `config_key`.

pub mod eligibility;
pub mod ptp;
pub mod scan_homepage;
pub mod txn_eligibility;

use crate::entry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload shape shared by the keyed-array configs (and the claim-state
/// config): a `configs` array plus whatever other top-level fields the
/// payload carries, preserved verbatim.
///
/// Deserialization fails when `configs` is absent; a payload without its
/// entry array is undecodable, not implicitly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedConfigValue {
    /// Ordered entry list the strategies splice into.
    pub configs: Vec<Value>,
    /// Remaining top-level payload fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KeyedConfigValue {
    /// Whether any entry belongs to the campaign (exact key or suffixed).
    pub fn contains_campaign(&self, name: &str) -> bool {
        self.configs
            .iter()
            .any(|candidate| entry::belongs_to_campaign(candidate, name))
    }

    /// Remove every entry belonging to the campaign. Returns the number of
    /// entries removed; removing an absent campaign is a no-op with count 0.
    pub fn remove_campaign(&mut self, name: &str) -> usize {
        let before = self.configs.len();
        self.configs
            .retain(|candidate| !entry::belongs_to_campaign(candidate, name));
        before - self.configs.len()
    }

    /// Remove entries for every campaign name in the list.
    pub fn remove_campaigns<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        names
            .iter()
            .map(|name| self.remove_campaign(name.as_ref()))
            .sum()
    }
}
