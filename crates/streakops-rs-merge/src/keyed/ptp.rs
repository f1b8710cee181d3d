//! Peer-to-peer home screen config (`PTP_STREAK_CONFIG`).
//!
//! Only UPI and P2P campaigns appear here; scan-and-pay-only campaigns skip
//! this config entirely. Always inserts the `_0` / `_1_{max}` entry pair
//! before the `p2p_default` fallback (or `p2p_0_state` when the fallback is
//! missing).

use crate::entry;
use crate::{KeyedConfigValue, MergeError, resolve_insertion_index};
use log::debug;
use serde_json::{Value, json};
use streakops_rs_protocol::CampaignSpec;

/// Fallback markers tried in order; insertion lands before the first present.
const SENTINELS: [&str; 2] = ["p2p_default", "p2p_0_state"];

/// Add the campaign's home-screen entries. Returns `Ok(false)` when entries
/// for the campaign already exist, and an error for campaign types this
/// config does not serve.
pub fn add(spec: &CampaignSpec, value: &mut KeyedConfigValue) -> Result<bool, MergeError> {
    if !spec.campaign_type.shown_on_ptp_home() {
        return Err(MergeError::UnsupportedCampaignType {
            config: "PTP_STREAK_CONFIG",
            campaign_type: spec.campaign_type.to_string(),
        });
    }
    if value.contains_campaign(&spec.name) {
        debug!("p2p home entries already present (campaign={})", spec.name);
        return Ok(false);
    }
    let index = resolve_insertion_index(&value.configs, &SENTINELS);
    debug!(
        "inserting p2p home entries (campaign={}, index={})",
        spec.name, index
    );
    value.configs.insert(index, initial_entry(spec));
    value.configs.insert(index + 1, in_progress_entry(spec));
    Ok(true)
}

/// Rotating search hints shared by every campaign entry.
fn standard_search_data() -> Value {
    json!([
        {
            "text": "pay to",
            "right_asset": {
                "url": "https://d704ayip06922.cloudfront.net/prod-rewards-assets-data/6b23258061e311eeaa853f670a0e3012.svg",
                "type": "svg",
                "aspect_ratio": 1
            }
        },
        {
            "text": "pay to",
            "right_asset": {
                "url": "https://d704ayip06922.cloudfront.net/prod-rewards-assets-data/6325b4b061e311eeaa853f670a0e3012.svg",
                "type": "svg",
                "aspect_ratio": 1
            }
        },
        {
            "text": "pay to",
            "right_asset": {
                "url": "https://d704ayip06922.cloudfront.net/prod-rewards-assets-data/5c5c08f061e311eeaa853f670a0e3012.svg",
                "type": "svg",
                "aspect_ratio": 1
            }
        },
        {
            "text": "pay to",
            "right_asset": {
                "url": "https://d704ayip06922.cloudfront.net/prod-rewards-assets-data/4ab46e30629211eea0ed0bd74220cbfb.png",
                "type": "image",
                "aspect_ratio": 1
            }
        },
        {
            "text": "pay via",
            "right_asset": {
                "url": "https://d704ayip06922.cloudfront.net/prod-rewards-assets-data/eb8447a0627311eebf66138229c45306.svg",
                "type": "svg",
                "aspect_ratio": 1.823
            }
        },
        {
            "text": "pay to contacts",
            "right_asset": null
        },
        {
            "text": "pay to phone number",
            "right_asset": null
        }
    ])
}

fn cta_block() -> Value {
    json!({
        "asset": {
            "url": "https://d2tecn3vwkchpd.cloudfront.net/fabrik/patterns/snp_gallery_icon.svg",
            "type": "svg"
        },
        "type": "DEEPLINK",
        "action": "cred://app/launch?target=scan_pay&source=p2p_home_screen"
    })
}

/// `_0` entry shown before the first qualifying transaction.
fn initial_entry(spec: &CampaignSpec) -> Value {
    json!({
        "config_key": format!("{}_0", spec.name),
        "uas_attributes": [
            entry::streak_type_attribute("IN", json!([spec.name]))
        ],
        "conditions": {
            "type": entry::string_eq(&spec.campaign_type.to_string()),
            "status": entry::string_in(&["IN_PROGRESS", "ELIGIBLE"])
        },
        "metadata": {
            "cta": cta_block(),
            "carousel": {
                "duration": 2000,
                "interval": 2000,
                "turns": 8,
                "timer_threshold": 172800000,
                "streak_text": "ENDS IN <expiry_timer>",
                "text": [
                    format!(
                        "<format>assured <icon>INR</icon>{} cashback on {} UPI payments</format>",
                        spec.total_offer, spec.max_allowed
                    ),
                    format!("<format>offer expires in {} days</format>", spec.duration_days)
                ]
            },
            "search": {
                "data": standard_search_data(),
                "interval": 1000,
                "turns": 15
            },
            "config": {
                "show_streak": true,
                "forward_streak_data": true,
                "forward_offer_nudge_data": true
            }
        }
    })
}

/// `_1_{max}` entry shown once at least one transaction is completed.
fn in_progress_entry(spec: &CampaignSpec) -> Value {
    json!({
        "config_key": format!("{}_1_{}", spec.name, spec.max_allowed),
        "uas_attributes": [
            entry::streak_type_attribute("IN", json!([spec.name]))
        ],
        "conditions": {
            "type": entry::string_eq(&spec.campaign_type.to_string()),
            "status": entry::string_in(&["IN_PROGRESS", "ELIGIBLE"]),
            "completed": entry::number_gte(1)
        },
        "metadata": {
            "cta": cta_block(),
            "carousel": {
                "duration": 2000,
                "interval": 2000,
                "turns": 8,
                "timer_threshold": 172800000,
                "streak_text": "ENDS IN <expiry_timer>",
                "offer_text": format!(
                    "<format>assured <icon>INR</icon>{} cashback on next UPI payment</format>",
                    spec.per_txn_reward()
                )
            },
            "search": {
                "data": standard_search_data(),
                "interval": 1000,
                "turns": 15
            },
            "config": {
                "show_streak": true,
                "forward_streak_data": true,
                "forward_offer_nudge_data": true
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
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

    fn value_with(keys: &[&str]) -> KeyedConfigValue {
        serde_json::from_value(json!({
            "configs": keys.iter().map(|k| json!({"config_key": k})).collect::<Vec<_>>()
        }))
        .unwrap()
    }

    #[test]
    fn snp_campaigns_are_rejected() {
        let mut value = value_with(&["p2p_default"]);
        let err = add(&spec(CampaignType::Snp), &mut value).unwrap_err();
        assert!(matches!(err, MergeError::UnsupportedCampaignType { .. }));
        assert_eq!(value.configs.len(), 1);
    }

    #[test]
    fn pair_lands_before_the_default_fallback() {
        let mut value = value_with(&["other", "p2p_default"]);
        assert!(add(&spec(CampaignType::Upi), &mut value).unwrap());
        let keys: Vec<_> = value
            .configs
            .iter()
            .filter_map(entry::config_key)
            .collect();
        assert_eq!(
            keys,
            vec!["other", "upi_streak_5_0", "upi_streak_5_1_5", "p2p_default"]
        );
    }

    #[test]
    fn falls_back_to_zero_state_marker() {
        let mut value = value_with(&["p2p_0_state", "other"]);
        assert!(add(&spec(CampaignType::P2p), &mut value).unwrap());
        assert_eq!(entry::config_key(&value.configs[0]), Some("upi_streak_5_0"));
    }

    #[test]
    fn add_is_idempotent() {
        let mut value = value_with(&["p2p_default"]);
        assert!(add(&spec(CampaignType::Upi), &mut value).unwrap());
        let once = value.clone();
        assert!(!add(&spec(CampaignType::Upi), &mut value).unwrap());
        assert_eq!(value, once);
    }
}
