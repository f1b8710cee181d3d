//! Name/UUID cross-consistency audit over the journey config.
//!
//! The name↔UUID binding is only established by progression blocks and can
//! drift when a campaign is added or removed by hand. The audit reports the
//! drift in both directions; it never fixes anything.

use crate::entry;
use crate::journey::JourneyValue;
use streakops_rs_protocol::CampaignIdentity;

/// Outcome of a journey config audit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditReport {
    /// UUID→name bindings resolved from progression blocks, in rule order.
    pub bindings: Vec<CampaignIdentity>,
    /// Supported UUIDs with no matching progression block.
    pub unbound_supported_ids: Vec<String>,
    /// Progression bindings whose UUID is missing from the supported list.
    pub unsupported_progressions: Vec<CampaignIdentity>,
}

impl AuditReport {
    /// Whether the two sections agree in both directions.
    pub fn is_consistent(&self) -> bool {
        self.unbound_supported_ids.is_empty() && self.unsupported_progressions.is_empty()
    }
}

/// Cross-check `supported_campaign_ids` against the progression blocks.
///
/// Missing sections are treated as empty for reporting purposes: with no
/// journey rules every supported UUID is unbound, and vice versa.
pub fn audit_journey(value: &JourneyValue) -> AuditReport {
    let mut report = AuditReport::default();

    if let Some(journey) = value.journey_rules.as_ref() {
        for block in &journey.configs {
            if let (Some(name), Some(id)) =
                (entry::config_key(block), entry::campaign_id_value(block))
            {
                report.bindings.push(CampaignIdentity {
                    name: name.to_string(),
                    id: id.to_string(),
                });
            }
        }
    }

    let supported = value
        .supported_campaign_ids
        .as_deref()
        .unwrap_or_default();

    for id in supported {
        if !report.bindings.iter().any(|binding| &binding.id == id) {
            report.unbound_supported_ids.push(id.clone());
        }
    }
    for binding in &report.bindings {
        if !supported.contains(&binding.id) {
            report.unsupported_progressions.push(binding.clone());
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn progression(name: &str, id: &str) -> serde_json::Value {
        json!({
            "config_key": name,
            "conditions": {"campaign_id": {"type": "STRING", "value": id, "operator": "EQ"}},
            "metadata": {"next_eligible_streak_type": "NA"}
        })
    }

    #[test]
    fn consistent_config_reports_clean() {
        let value: JourneyValue = serde_json::from_value(json!({
            "supported_campaign_ids": ["u1"],
            "journey_rules": {"configs": [progression("x", "u1")]}
        }))
        .unwrap();
        let report = audit_journey(&value);
        assert!(report.is_consistent());
        assert_eq!(report.bindings.len(), 1);
        assert_eq!(report.bindings[0].name, "x");
    }

    #[test]
    fn drift_is_reported_in_both_directions() {
        let value: JourneyValue = serde_json::from_value(json!({
            "supported_campaign_ids": ["u1", "u-orphan"],
            "journey_rules": {
                "configs": [progression("x", "u1"), progression("ghost", "u-ghost")]
            }
        }))
        .unwrap();
        let report = audit_journey(&value);
        assert!(!report.is_consistent());
        assert_eq!(report.unbound_supported_ids, vec!["u-orphan".to_string()]);
        assert_eq!(report.unsupported_progressions.len(), 1);
        assert_eq!(report.unsupported_progressions[0].name, "ghost");
    }

    #[test]
    fn audit_never_mutates_the_value() {
        let value: JourneyValue = serde_json::from_value(json!({
            "supported_campaign_ids": ["u1"],
            "journey_rules": {"configs": []}
        }))
        .unwrap();
        let before = value.clone();
        let report = audit_journey(&value);
        assert_eq!(report.unbound_supported_ids, vec!["u1".to_string()]);
        assert_eq!(value, before);
    }

    #[test]
    fn missing_sections_audit_as_empty() {
        let value: JourneyValue = serde_json::from_value(json!({})).unwrap();
        let report = audit_journey(&value);
        assert!(report.is_consistent());
        assert!(report.bindings.is_empty());
    }

    #[test]
    fn initial_blocks_without_campaign_id_are_not_bindings() {
        let value: JourneyValue = serde_json::from_value(json!({
            "supported_campaign_ids": [],
            "journey_rules": {"configs": [json!({
                "config_key": "x",
                "conditions": {"assign_next_streak_type": {"type": "STRING", "operator": "EQ", "value": "x"}},
                "metadata": {}
            })]}
        }))
        .unwrap();
        let report = audit_journey(&value);
        assert!(report.bindings.is_empty());
        assert!(report.is_consistent());
    }
}
