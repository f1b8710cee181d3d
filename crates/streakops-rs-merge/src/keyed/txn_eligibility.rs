//! Per-transaction eligibility conditions (`STREAK_TXN_ELIGIBILITY`).
//!
//! One entry per campaign describing which debit transactions count toward
//! it. Appended at the end; this config has no sentinel.

use crate::KeyedConfigValue;
use crate::entry;
use log::debug;
use serde_json::json;
use streakops_rs_protocol::CampaignSpec;

/// Add the campaign's transaction-eligibility entry. Returns false when an
/// entry for the campaign already exists.
pub fn add(spec: &CampaignSpec, value: &mut KeyedConfigValue) -> bool {
    if value.contains_campaign(&spec.name) {
        debug!(
            "txn eligibility entry already present (campaign={})",
            spec.name
        );
        return false;
    }
    value.configs.push(json!({
        "config_key": spec.name,
        "conditions": {
            "streak_type": entry::string_eq(&spec.campaign_type.to_string()),
            "streak_name": entry::string_eq(&spec.name),
            "flow_type": entry::string_in(spec.campaign_type.flow_types()),
            "payment_type": entry::string_eq("DEBIT"),
            "amount": entry::number_gte(spec.min_txn_amount)
        },
        "metadata": {
            "value": true
        }
    }));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use streakops_rs_protocol::CampaignType;

    fn spec(campaign_type: CampaignType) -> CampaignSpec {
        CampaignSpec {
            name: "upi_streak_5".to_string(),
            id: "72163f27-a0a3-4fca-b2c6-1c1e7aa47740".to_string(),
            campaign_type,
            duration_days: 14,
            max_allowed: 5,
            min_txn_amount: 100,
            total_offer: 50,
            banner_url: "https://assets.example/upi.png".to_string(),
            bottom_sheet_subtitle: "make a UPI payment".to_string(),
            next_campaign: None,
            per_txn_reward_override: None,
            rupay: false,
            issuer_code: None,
        }
    }

    fn empty_value() -> KeyedConfigValue {
        serde_json::from_value(json!({"configs": []})).unwrap()
    }

    #[test]
    fn upi_campaigns_cover_both_flow_types() {
        let mut value = empty_value();
        assert!(add(&spec(CampaignType::Upi), &mut value));
        let conditions = &value.configs[0]["conditions"];
        assert_eq!(conditions["flow_type"]["value"], json!(["SNP", "P2P"]));
        assert_eq!(conditions["payment_type"]["value"], json!("DEBIT"));
        assert_eq!(conditions["amount"]["value"], json!(100));
    }

    #[test]
    fn p2p_campaigns_cover_only_p2p_flow() {
        let mut value = empty_value();
        assert!(add(&spec(CampaignType::P2p), &mut value));
        let flow: &Value = &value.configs[0]["conditions"]["flow_type"]["value"];
        assert_eq!(flow, &json!(["P2P"]));
    }

    #[test]
    fn add_is_idempotent() {
        let mut value = empty_value();
        assert!(add(&spec(CampaignType::Upi), &mut value));
        let once = value.clone();
        assert!(!add(&spec(CampaignType::Upi), &mut value));
        assert_eq!(value, once);
    }
}
