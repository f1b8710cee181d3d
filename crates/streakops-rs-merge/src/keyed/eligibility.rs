//! Campaign eligibility registry (`STREAK_ELIGIBILITY`).
//!
//! One entry per campaign, appended at the end; this config has no sentinel.

use crate::KeyedConfigValue;
use crate::entry;
use log::debug;
use serde_json::json;
use streakops_rs_protocol::CampaignSpec;

/// Add the campaign's eligibility entry. Returns false (skip-with-notice)
/// when an entry for the campaign already exists.
pub fn add(spec: &CampaignSpec, value: &mut KeyedConfigValue) -> bool {
    if value.contains_campaign(&spec.name) {
        debug!("eligibility entry already present (campaign={})", spec.name);
        return false;
    }
    value.configs.push(json!({
        "config_key": spec.name,
        "uas_attributes": [
            entry::streak_type_attribute("EQ", json!(spec.name))
        ],
        "metadata": {
            "live": true,
            "streaks": [
                {
                    "name": spec.name,
                    "type": spec.campaign_type.to_string(),
                    "duration_in_days": spec.duration_days,
                    "max_allowed": spec.max_allowed,
                    "juno_check_enabled": true,
                    "juno_percentage": 75,
                    "same_day_unique_beneficiary_txn_allowed": true,
                    "duplicate_beneficiary_txn_allowed": true,
                    "self_transfer_allowed": false,
                    "cross_beneficiary_name_check_enabled": false,
                    "same_day_txn_allowed": true
                }
            ]
        }
    }));
    true
}
