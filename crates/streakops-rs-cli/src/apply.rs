//! Applies one campaign mutation to one fetched record.
//!
//! This is the glue between the pure strategies and a [`ConfigRecord`]:
//! decode the value, run the right strategy for the config kind, re-encode,
//! and report what happened so the caller can log and decide whether a POST
//! is worth it.

use anyhow::Result;
use log::info;
use serde_json::Value;
use streakops_rs_merge::journey::JourneyValue;
use streakops_rs_merge::keyed::{eligibility, ptp, scan_homepage, txn_eligibility};
use streakops_rs_merge::{
    KeyedConfigValue, audit, decode_json, encode_json, journey, pretty_json, streak_config,
    template,
};
use streakops_rs_protocol::{CampaignIdentity, CampaignSpec, ConfigKind, ConfigRecord};

/// Result of applying an add to one record.
#[derive(Debug)]
pub struct AddApplication {
    /// Whether the record value changed (false means duplicate skip).
    pub changed: bool,
    /// Human-reviewable payload for the backup session.
    pub unescaped: String,
    /// Operator-facing notice, e.g. partial-presence details.
    pub notice: Option<String>,
}

/// Result of applying a remove to one record.
#[derive(Debug)]
pub struct RemoveApplication {
    /// Entries removed across the record (0 means nothing to do).
    pub removed: usize,
    /// Human-reviewable payload, when the record is JSON-kind and changed.
    pub unescaped: Option<String>,
    /// The template cannot be auto-edited; the campaign was detected and the
    /// operator must clean it up by hand.
    pub manual_cleanup: bool,
}

/// Mutate `record` to include the campaign, per the kind's strategy.
pub fn apply_add(
    kind: ConfigKind,
    spec: &CampaignSpec,
    record: &mut ConfigRecord,
) -> Result<AddApplication> {
    match kind {
        ConfigKind::StreakEligibility => {
            let mut value: KeyedConfigValue = decode_json(&record.value)?;
            let changed = eligibility::add(spec, &mut value);
            finish_json(record, &value, changed, None)
        }
        ConfigKind::StreakTxnEligibility => {
            let mut value: KeyedConfigValue = decode_json(&record.value)?;
            let changed = txn_eligibility::add(spec, &mut value);
            finish_json(record, &value, changed, None)
        }
        ConfigKind::ScanHomepage => {
            let mut value: KeyedConfigValue = decode_json(&record.value)?;
            let changed = scan_homepage::add(spec, &mut value);
            finish_json(record, &value, changed, None)
        }
        ConfigKind::PtpStreak => {
            let mut value: KeyedConfigValue = decode_json(&record.value)?;
            let changed = ptp::add(spec, &mut value)?;
            finish_json(record, &value, changed, None)
        }
        ConfigKind::StreakConfig => {
            let mut value: KeyedConfigValue = decode_json(&record.value)?;
            let changed = streak_config::add(&spec.id, &mut value);
            finish_json(record, &value, changed, None)
        }
        ConfigKind::StreakJourneyJob => {
            let mut value: JourneyValue = decode_json(&record.value)?;
            let presence = journey::check_presence(&spec.identity(), &value);
            let notice = if presence.fully_present() {
                Some("campaign already configured in all three sections".to_string())
            } else if presence.partially_present() {
                Some("partial presence detected; adding only the missing parts".to_string())
            } else {
                None
            };
            let outcome =
                journey::add_campaign(&spec.identity(), spec.next_campaign_or_na(), &mut value);
            finish_json(record, &value, outcome.changed(), notice)
        }
        ConfigKind::StreakBlockTemplate => {
            let outcome = template::add_campaign(
                &record.value,
                &spec.id,
                &spec.banner_url,
                &spec.bottom_sheet_title(),
                &spec.bottom_sheet_subtitle,
            )?;
            let changed = outcome.banner != template::BannerAction::AlreadyPresent
                || outcome.bottom_sheet != template::BottomSheetAction::AlreadyPresent;
            let notice = match outcome.banner {
                template::BannerAction::AddedToSharedCondition => {
                    Some("banner URL is shared with other campaigns".to_string())
                }
                template::BannerAction::NewConditionBlock => None,
                template::BannerAction::AlreadyPresent => {
                    Some("campaign already present in banner condition".to_string())
                }
            };
            record.value = outcome.template;
            Ok(AddApplication {
                changed,
                unescaped: record.value.replace("\r\n", "\n"),
                notice,
            })
        }
    }
}

/// Strip the campaign from `record`, per the kind's strategy.
pub fn apply_remove(
    kind: ConfigKind,
    identity: &CampaignIdentity,
    record: &mut ConfigRecord,
) -> Result<RemoveApplication> {
    match kind {
        ConfigKind::StreakEligibility
        | ConfigKind::StreakTxnEligibility
        | ConfigKind::ScanHomepage
        | ConfigKind::PtpStreak => {
            let mut value: KeyedConfigValue = decode_json(&record.value)?;
            let removed = value.remove_campaign(&identity.name);
            finish_remove(record, &value, removed)
        }
        ConfigKind::StreakConfig => {
            let mut value: KeyedConfigValue = decode_json(&record.value)?;
            let removed = streak_config::remove(&[identity.id.clone()], &mut value);
            finish_remove(record, &value, removed)
        }
        ConfigKind::StreakJourneyJob => {
            let mut value: JourneyValue = decode_json(&record.value)?;
            let removal = journey::remove_campaigns(
                &[identity.name.clone()],
                &[identity.id.clone()],
                &mut value,
            );
            info!(
                "journey removal counts (supported={}, batch={}, journey={})",
                removal.supported, removal.batch, removal.journey
            );
            finish_remove(record, &value, removal.total())
        }
        ConfigKind::StreakBlockTemplate => {
            let manual_cleanup = template::contains_campaign(&record.value, &identity.id);
            Ok(RemoveApplication {
                removed: 0,
                unescaped: None,
                manual_cleanup,
            })
        }
    }
}

/// Render the journey audit report for the operator.
pub fn render_audit(report: &audit::AuditReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "bindings: {} progression rule(s) map a UUID to a name\n",
        report.bindings.len()
    ));
    for binding in &report.bindings {
        out.push_str(&format!("  {} -> {}\n", binding.id, binding.name));
    }
    if report.is_consistent() {
        out.push_str("supported ids and progression rules are consistent\n");
        return out;
    }
    if !report.unbound_supported_ids.is_empty() {
        out.push_str("supported UUIDs with no progression rule:\n");
        for id in &report.unbound_supported_ids {
            out.push_str(&format!("  {id}\n"));
        }
    }
    if !report.unsupported_progressions.is_empty() {
        out.push_str("progression rules whose UUID is not in the supported list:\n");
        for binding in &report.unsupported_progressions {
            out.push_str(&format!("  {} ({})\n", binding.name, binding.id));
        }
    }
    out
}

fn finish_json<T: serde::Serialize>(
    record: &mut ConfigRecord,
    value: &T,
    changed: bool,
    notice: Option<String>,
) -> Result<AddApplication> {
    let unescaped = pretty_json(value)?;
    if changed {
        record.value = encode_json(value)?;
    }
    Ok(AddApplication {
        changed,
        unescaped,
        notice,
    })
}

fn finish_remove<T: serde::Serialize>(
    record: &mut ConfigRecord,
    value: &T,
    removed: usize,
) -> Result<RemoveApplication> {
    if removed == 0 {
        return Ok(RemoveApplication {
            removed,
            unescaped: None,
            manual_cleanup: false,
        });
    }
    record.value = encode_json(value)?;
    Ok(RemoveApplication {
        removed,
        unescaped: Some(pretty_json(value)?),
        manual_cleanup: false,
    })
}

/// Decode the journey payload out of a record for auditing.
pub fn decode_journey(record: &ConfigRecord) -> Result<JourneyValue> {
    Ok(decode_json(&record.value)?)
}

/// Pretty-print any JSON-kind value for display.
pub fn pretty_value(record: &ConfigRecord) -> Result<String> {
    let value: Value = decode_json(&record.value)?;
    Ok(pretty_json(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use streakops_rs_protocol::CampaignType;

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
            next_campaign: None,
            per_txn_reward_override: None,
            rupay: false,
            issuer_code: None,
        }
    }

    fn record(kind: ConfigKind, value: &str) -> ConfigRecord {
        serde_json::from_value(json!({
            "key": kind.key(),
            "value": value,
            "created_by": "ops",
            "updated_by": "ops",
            "revision": 12
        }))
        .expect("record")
    }

    #[test]
    fn add_rewrites_only_the_value_field() {
        let mut rec = record(ConfigKind::StreakEligibility, "{\"configs\": []}");
        let before = rec.clone();
        let application = apply_add(ConfigKind::StreakEligibility, &spec(), &mut rec).unwrap();
        assert!(application.changed);
        assert_ne!(rec.value, before.value);
        assert_eq!(rec.created_by, before.created_by);
        assert_eq!(rec.updated_by, before.updated_by);
        assert_eq!(rec.extra, before.extra);
    }

    #[test]
    fn duplicate_add_leaves_the_record_untouched() {
        let mut rec = record(ConfigKind::StreakEligibility, "{\"configs\": []}");
        apply_add(ConfigKind::StreakEligibility, &spec(), &mut rec).unwrap();
        let once = rec.clone();
        let application = apply_add(ConfigKind::StreakEligibility, &spec(), &mut rec).unwrap();
        assert!(!application.changed);
        assert_eq!(rec, once);
    }

    #[test]
    fn journey_add_reports_partial_presence() {
        let value = json!({
            "supported_campaign_ids": ["72163f27-a0a3-4fca-b2c6-1c1e7aa47740"],
            "batch_assignment_rules": {"configs": []},
            "journey_rules": {"configs": []}
        });
        let mut rec = record(ConfigKind::StreakJourneyJob, &value.to_string());
        let application = apply_add(ConfigKind::StreakJourneyJob, &spec(), &mut rec).unwrap();
        assert!(application.changed);
        assert!(application.notice.unwrap().contains("partial presence"));
    }

    #[test]
    fn remove_of_absent_campaign_reports_zero_and_keeps_value() {
        let mut rec = record(ConfigKind::ScanHomepage, "{\"configs\": []}");
        let before = rec.clone();
        let application =
            apply_remove(ConfigKind::ScanHomepage, &spec().identity(), &mut rec).unwrap();
        assert_eq!(application.removed, 0);
        assert_eq!(rec, before);
    }

    #[test]
    fn template_remove_asks_for_manual_cleanup() {
        let template_text = format!(
            "#if($!campaign_id == \"{}\") x #end",
            spec().id
        );
        let mut rec = record(ConfigKind::StreakBlockTemplate, &template_text);
        let application =
            apply_remove(ConfigKind::StreakBlockTemplate, &spec().identity(), &mut rec).unwrap();
        assert!(application.manual_cleanup);
        assert_eq!(application.removed, 0);
        assert_eq!(rec.value, template_text);
    }
}
