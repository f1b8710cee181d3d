//! Reward claim-state display config (`STREAK_CONFIG`).
//!
//! Entries are identified by the campaign UUID in their conditions. The last
//! entry is a permanent empty-conditions fallback that must stay at the end:
//! additions land at `len - 1`, and removal matches on the UUID so the
//! fallback is never touched.

use crate::KeyedConfigValue;
use crate::entry;
use log::debug;
use serde_json::json;

/// Whether an entry for the campaign UUID exists.
pub fn contains(campaign_id: &str, value: &KeyedConfigValue) -> bool {
    value
        .configs
        .iter()
        .any(|candidate| entry::campaign_id_value(candidate) == Some(campaign_id))
}

/// Add the campaign's claim-state entry just before the fallback. Returns
/// false when an entry for the UUID already exists.
pub fn add(campaign_id: &str, value: &mut KeyedConfigValue) -> bool {
    if contains(campaign_id, value) {
        debug!("claim-state entry already present (campaign_id={campaign_id})");
        return false;
    }
    let index = value.configs.len().saturating_sub(1);
    value.configs.insert(
        index,
        json!({
            "conditions": {
                "campaign_id": {
                    "type": "STRING",
                    "value": campaign_id,
                    "operator": "EQ"
                }
            },
            "metadata": {
                "claimed_state_text": "",
                "allotted_state_text": "<format><text fgClr='#B3FFEB34'>CLAIM</text></format>",
                "next_state_text": "",
                "default_state_text": "",
                "show_actual_reward_text": true
            }
        }),
    );
    true
}

/// Remove entries for every campaign UUID in the list. Returns the number of
/// entries removed; absent UUIDs contribute zero.
pub fn remove<S: AsRef<str>>(campaign_ids: &[S], value: &mut KeyedConfigValue) -> usize {
    let before = value.configs.len();
    value.configs.retain(|candidate| {
        entry::campaign_id_value(candidate)
            .is_none_or(|id| !campaign_ids.iter().any(|target| target.as_ref() == id))
    });
    before - value.configs.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn campaign_entry(id: &str) -> Value {
        json!({
            "conditions": {"campaign_id": {"type": "STRING", "value": id, "operator": "EQ"}},
            "metadata": {}
        })
    }

    fn fallback_entry() -> Value {
        json!({"conditions": {}, "metadata": {"default_state_text": "PAY"}})
    }

    fn value_with(entries: Vec<Value>) -> KeyedConfigValue {
        serde_json::from_value(json!({"configs": entries})).unwrap()
    }

    #[test]
    fn add_inserts_before_the_fallback() {
        let mut value = value_with(vec![campaign_entry("u1"), fallback_entry()]);
        assert!(add("u2", &mut value));
        assert_eq!(value.configs.len(), 3);
        assert_eq!(entry::campaign_id_value(&value.configs[1]), Some("u2"));
        assert_eq!(value.configs[2], fallback_entry());
    }

    #[test]
    fn add_is_idempotent() {
        let mut value = value_with(vec![campaign_entry("u1"), fallback_entry()]);
        assert!(add("u2", &mut value));
        let once = value.clone();
        assert!(!add("u2", &mut value));
        assert_eq!(value, once);
    }

    #[test]
    fn remove_never_touches_the_fallback() {
        let mut value = value_with(vec![
            campaign_entry("u1"),
            campaign_entry("u2"),
            fallback_entry(),
        ]);
        let removed = remove(&["u1", "u2", "missing"], &mut value);
        assert_eq!(removed, 2);
        assert_eq!(value.configs, vec![fallback_entry()]);
    }

    #[test]
    fn remove_of_absent_campaign_is_a_noop() {
        let mut value = value_with(vec![campaign_entry("u1"), fallback_entry()]);
        let before = value.clone();
        assert_eq!(remove(&["missing"], &mut value), 0);
        assert_eq!(value, before);
    }
}
