//! End-to-end add/remove lifecycle over decoded config payloads.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use streakops_rs_merge::journey::{self, JourneyValue};
use streakops_rs_merge::keyed::{eligibility, ptp, scan_homepage, txn_eligibility};
use streakops_rs_merge::{KeyedConfigValue, audit, decode_json, encode_json, streak_config};
use streakops_rs_protocol::{CampaignSpec, CampaignType};

fn spec() -> CampaignSpec {
    CampaignSpec {
        name: "upi_streak_5".to_string(),
        id: "72163f27-a0a3-4fca-b2c6-1c1e7aa47740".to_string(),
        campaign_type: CampaignType::Upi,
        duration_days: 14,
        max_allowed: 5,
        min_txn_amount: 100,
        total_offer: 50,
        banner_url: "https://assets.example/upi.png".to_string(),
        bottom_sheet_subtitle: "make a UPI payment".to_string(),
        next_campaign: Some("upi_streak_10".to_string()),
        per_txn_reward_override: None,
        rupay: false,
        issuer_code: None,
    }
}

fn keyed(entries: Vec<Value>) -> KeyedConfigValue {
    serde_json::from_value(json!({"configs": entries})).unwrap()
}

#[test]
fn add_then_remove_restores_every_keyed_config() {
    let campaign = spec();

    let mut elig = keyed(vec![json!({"config_key": "existing"})]);
    let mut txn = keyed(vec![json!({"config_key": "existing"})]);
    let mut scan = keyed(vec![json!({"config_key": "snp_catch_all"})]);
    let mut home = keyed(vec![json!({"config_key": "p2p_default"})]);

    assert!(eligibility::add(&campaign, &mut elig));
    assert!(txn_eligibility::add(&campaign, &mut txn));
    assert!(scan_homepage::add(&campaign, &mut scan));
    assert!(ptp::add(&campaign, &mut home).unwrap());

    assert_eq!(elig.remove_campaign(&campaign.name), 1);
    assert_eq!(txn.remove_campaign(&campaign.name), 1);
    assert_eq!(scan.remove_campaign(&campaign.name), 2);
    assert_eq!(home.remove_campaign(&campaign.name), 2);

    assert_eq!(elig, keyed(vec![json!({"config_key": "existing"})]));
    assert_eq!(scan, keyed(vec![json!({"config_key": "snp_catch_all"})]));
    assert_eq!(home, keyed(vec![json!({"config_key": "p2p_default"})]));
}

#[test]
fn journey_add_keeps_sentinels_after_every_insertion() {
    let campaign = spec();
    let mut value: JourneyValue = serde_json::from_value(json!({
        "supported_campaign_ids": ["pre-existing"],
        "batch_assignment_rules": {"configs": [
            {"config_key": "users_removal_streak_assignment", "conditions": {}, "metadata": {}}
        ]},
        "journey_rules": {"configs": [
            {"config_key": "users_removal_streak_assignment", "conditions": {}, "metadata": {}},
            {"config_key": "catch_all_condition", "conditions": {}, "metadata": {}}
        ]}
    }))
    .unwrap();

    journey::add_campaign(&campaign.identity(), campaign.next_campaign_or_na(), &mut value);

    let batch = value.batch_assignment_rules.as_ref().unwrap();
    let batch_sentinel = batch
        .configs
        .iter()
        .position(|b| b["config_key"] == json!("users_removal_streak_assignment"))
        .unwrap();
    let batch_campaign = batch
        .configs
        .iter()
        .position(|b| b["config_key"] == json!("upi_streak_5"))
        .unwrap();
    assert!(batch_campaign < batch_sentinel);

    let rules = &value.journey_rules.as_ref().unwrap().configs;
    let catch_all = rules
        .iter()
        .position(|b| b["config_key"] == json!("catch_all_condition"))
        .unwrap();
    let progression = rules
        .iter()
        .position(|b| {
            b["config_key"] == json!("upi_streak_5")
                && b["conditions"].get("campaign_id").is_some()
        })
        .unwrap();
    assert!(progression < catch_all);
    assert_eq!(catch_all, rules.len() - 1);

    let report = audit::audit_journey(&value);
    // The pre-existing UUID has no progression block; the new campaign does.
    assert_eq!(report.unbound_supported_ids, vec!["pre-existing".to_string()]);
    assert!(report.unsupported_progressions.is_empty());
}

#[test]
fn record_value_round_trip_preserves_structure() {
    let payload = json!({
        "configs": [
            {"config_key": "a", "metadata": {"note": "line one\nline two"}},
            {"config_key": "b"}
        ],
        "version": 3
    });
    let value: KeyedConfigValue = serde_json::from_value(payload.clone()).unwrap();
    let encoded = encode_json(&value).unwrap();
    let decoded: KeyedConfigValue = decode_json(&encoded).unwrap();
    assert_eq!(serde_json::to_value(&decoded).unwrap(), payload);
}

#[test]
fn streak_config_lifecycle_keeps_the_fallback_last() {
    let campaign = spec();
    let fallback = json!({"conditions": {}, "metadata": {"default_state_text": "PAY"}});
    let mut value = keyed(vec![fallback.clone()]);

    assert!(streak_config::add(&campaign.id, &mut value));
    assert_eq!(value.configs.len(), 2);
    assert_eq!(value.configs[1], fallback);

    assert_eq!(streak_config::remove(&[campaign.id.clone()], &mut value), 1);
    assert_eq!(value.configs, vec![fallback]);
}
