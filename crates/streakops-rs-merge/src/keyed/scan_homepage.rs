//! Scan homepage carousel config (`SCAN_HOMEPAGE_CONFIG`).
//!
//! Campaign entries are inserted before the first system widget found from a
//! cascading sentinel list. Multi-transaction campaigns get a `_0` initial
//! entry and a `_1_{max}` in-progress entry; single-transaction campaigns get
//! one unsuffixed entry.

use crate::entry;
use crate::{KeyedConfigValue, resolve_insertion_index};
use log::debug;
use serde_json::{Value, json};
use streakops_rs_protocol::{CampaignSpec, CampaignType};

/// System widget keys tried in order; insertion lands before the first one
/// present. All seven missing degrades to append-at-end.
const SENTINELS: [&str; 7] = [
    "widget_assured_20_and",
    "widget_assured_20_ios",
    "widget_campaign_and",
    "widget_campaign_ios",
    "wr_pay_ios",
    "wr_pay_android",
    "snp_catch_all",
];

/// Add the campaign's carousel entries. Returns false when entries for the
/// campaign already exist.
pub fn add(spec: &CampaignSpec, value: &mut KeyedConfigValue) -> bool {
    if value.contains_campaign(&spec.name) {
        debug!("carousel entries already present (campaign={})", spec.name);
        return false;
    }
    let index = resolve_insertion_index(&value.configs, &SENTINELS);
    let new_entries = if spec.max_allowed == 1 {
        vec![single_entry(spec)]
    } else {
        vec![initial_entry(spec), in_progress_entry(spec)]
    };
    debug!(
        "inserting carousel entries (campaign={}, count={}, index={})",
        spec.name,
        new_entries.len(),
        index
    );
    for (offset, new_entry) in new_entries.into_iter().enumerate() {
        value.configs.insert(index + offset, new_entry);
    }
    true
}

/// Copy variant for the in-progress offer line.
fn payment_copy(campaign_type: CampaignType) -> &'static str {
    match campaign_type {
        CampaignType::Snp => "scan & pay",
        _ => "UPI payment",
    }
}

fn search_block() -> Value {
    json!({
        "left_asset": {
            "url": "https://d2tecn3vwkchpd.cloudfront.net/fabrik/patterns/search_icon",
            "type": "svg"
        },
        "text": "<format>search & pay contacts</format>",
        "border_animation_count": 2,
        "cta": {
            "type": "p2p_home",
            "additional_info": {
                "search_phone_num_keyboard": true,
                "headers": {},
                "offer_nudge": {
                    "asset": {}
                }
            }
        },
        "right_asset": {
            "asset": {}
        }
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
            "carousel": {
                "duration": 2000,
                "interval": 2000,
                "turns": 8,
                "timer_threshold": 172800000,
                "text": [
                    format!(
                        "<format>assured cashback of <icon>INR</icon>{} on next {} payments</format>",
                        spec.total_offer, spec.max_allowed
                    ),
                    format!("offer expires in {} days", spec.duration_days)
                ],
                "timer_prefix_asset": {}
            },
            "search": search_block(),
            "config": {
                "show_streak": true,
                "forward_streak_data": true,
                "forward_offer_nudge_data": true
            },
            "cta": {}
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
            "carousel": {
                "duration": 2000,
                "interval": 2000,
                "turns": 8,
                "timer_threshold": 172800000,
                "streak_text": "ends in <expiry_timer>",
                "offer_text": format!(
                    "<format>assured <icon>INR</icon>{} cashback on next {}</format>",
                    spec.per_txn_reward(),
                    payment_copy(spec.campaign_type)
                )
            },
            "search": {
                "left_asset": {
                    "url": "https://d2tecn3vwkchpd.cloudfront.net/fabrik/patterns/search_icon",
                    "type": "svg"
                },
                "text": "<format>search & pay contacts</format>",
                "right_asset": {
                    "text": "CASHBACK"
                },
                "border_animation_count": 2,
                "cta": {
                    "type": "p2p_home",
                    "additional_info": {
                        "search_phone_num_keyboard": true
                    }
                }
            },
            "config": {
                "show_streak": true,
                "forward_streak_data": true,
                "forward_offer_nudge_data": false
            }
        }
    })
}

/// Unsuffixed entry for single-transaction campaigns.
fn single_entry(spec: &CampaignSpec) -> Value {
    json!({
        "config_key": spec.name,
        "uas_attributes": [
            entry::streak_type_attribute("IN", json!([spec.name]))
        ],
        "conditions": {
            // Single-transaction campaigns always surface as the UPI type.
            "type": entry::string_eq("UPI"),
            "status": entry::string_in(&["IN_PROGRESS", "ELIGIBLE"])
        },
        "metadata": {
            "carousel": {
                "duration": 2000,
                "interval": 2000,
                "turns": 8,
                "timer_threshold": 172800000,
                "text": [
                    format!(
                        "<format>assured <icon>INR</icon> {} cashback on next {}</format>",
                        spec.per_txn_reward(),
                        payment_copy(spec.campaign_type)
                    ),
                    format!("offer expires in {} days", spec.duration_days)
                ],
                "timer_prefix_asset": {}
            },
            "search": search_block(),
            "config": {
                "show_streak": true,
                "forward_streak_data": true,
                "forward_offer_nudge_data": true
            },
            "cta": {}
        }
    })
}
