//! Journey job config strategy (`STREAK_JOURNEY_JOB_CONFIG`).
//!
//! One record carries three co-dependent sections: the flat
//! `supported_campaign_ids` UUID list, `batch_assignment_rules.configs`, and
//! `journey_rules.configs`. Journey rules come in two kinds: an "initial
//! assignment" block keyed by an `assign_next_streak_type` condition and a
//! "progression" block keyed by a `campaign_id` condition. A campaign may be
//! partially present; add fills in only the missing parts.

use crate::entry;
use crate::resolve_insertion_index;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;
use streakops_rs_protocol::CampaignIdentity;

/// Batch and initial-assignment blocks land before this system entry.
const ASSIGNMENT_SENTINEL: &str = "users_removal_streak_assignment";
/// Progression blocks land before this terminal entry.
const PROGRESSION_SENTINEL: &str = "catch_all_condition";

/// Decoded journey config payload. Sections the record does not carry decode
/// to `None`; callers handle "section missing" explicitly instead of falling
/// back to an implicit empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyValue {
    /// Flat list of campaign UUIDs the journey job processes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_campaign_ids: Option<Vec<String>>,
    /// Batch assignment rule entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_assignment_rules: Option<RuleSection>,
    /// Journey rule entries (initial assignment and progression kinds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journey_rules: Option<RuleSection>,
    /// Remaining top-level payload fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One rule section: a `configs` array plus preserved extras.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSection {
    /// Ordered rule entries.
    pub configs: Vec<Value>,
    /// Remaining section fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where a campaign already appears across the three sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignPresence {
    /// UUID present in `supported_campaign_ids`.
    pub supported: bool,
    /// Batch assignment block present (matched by `config_key`).
    pub batch: bool,
    /// Progression block present (matched by `config_key` and the
    /// `campaign_id` condition value).
    pub progression: bool,
}

impl CampaignPresence {
    /// Whether all three sections already reference the campaign.
    pub fn fully_present(&self) -> bool {
        self.supported && self.batch && self.progression
    }

    /// Whether any section references the campaign.
    pub fn partially_present(&self) -> bool {
        self.supported || self.batch || self.progression
    }
}

/// What an add actually inserted (partial presence adds only missing parts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JourneyAddOutcome {
    /// UUID appended to the supported list.
    pub added_supported: bool,
    /// Batch assignment block inserted.
    pub added_batch: bool,
    /// Initial-assignment journey block inserted.
    pub added_initial: bool,
    /// Progression journey block inserted.
    pub added_progression: bool,
}

impl JourneyAddOutcome {
    /// Whether the add changed the payload at all.
    pub fn changed(&self) -> bool {
        self.added_supported || self.added_batch || self.added_initial || self.added_progression
    }
}

/// Per-section removal counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JourneyRemoval {
    /// UUIDs dropped from the supported list.
    pub supported: usize,
    /// Batch assignment blocks removed.
    pub batch: usize,
    /// Journey rule blocks removed (both kinds).
    pub journey: usize,
}

impl JourneyRemoval {
    /// Total items removed across the three sections.
    pub fn total(&self) -> usize {
        self.supported + self.batch + self.journey
    }
}

/// Report where a campaign already appears.
pub fn check_presence(identity: &CampaignIdentity, value: &JourneyValue) -> CampaignPresence {
    let supported = value
        .supported_campaign_ids
        .as_ref()
        .is_some_and(|ids| ids.iter().any(|id| id == &identity.id));
    let batch = value.batch_assignment_rules.as_ref().is_some_and(|section| {
        section
            .configs
            .iter()
            .any(|block| entry::config_key(block) == Some(identity.name.as_str()))
    });
    let progression = value.journey_rules.as_ref().is_some_and(|section| {
        section.configs.iter().any(|block| {
            entry::config_key(block) == Some(identity.name.as_str())
                && entry::campaign_id_value(block) == Some(identity.id.as_str())
        })
    });
    CampaignPresence {
        supported,
        batch,
        progression,
    }
}

/// Add a campaign to all three sections, creating missing sections and
/// skipping parts that already exist. `next_campaign` is the chain target
/// name or the `NA` marker.
pub fn add_campaign(
    identity: &CampaignIdentity,
    next_campaign: &str,
    value: &mut JourneyValue,
) -> JourneyAddOutcome {
    let mut outcome = JourneyAddOutcome::default();

    let ids = value.supported_campaign_ids.get_or_insert_with(Vec::new);
    if !ids.iter().any(|id| id == &identity.id) {
        ids.push(identity.id.clone());
        outcome.added_supported = true;
    }

    let batch = value
        .batch_assignment_rules
        .get_or_insert_with(RuleSection::default);
    let batch_exists = batch
        .configs
        .iter()
        .any(|block| entry::config_key(block) == Some(identity.name.as_str()));
    if !batch_exists {
        let index = resolve_insertion_index(&batch.configs, &[ASSIGNMENT_SENTINEL]);
        debug!(
            "inserting batch assignment block (campaign={}, index={index})",
            identity.name
        );
        batch.configs.insert(index, assignment_block(&identity.name));
        outcome.added_batch = true;
    }

    let journey = value.journey_rules.get_or_insert_with(RuleSection::default);
    let has_initial = journey.configs.iter().any(|block| {
        entry::config_key(block) == Some(identity.name.as_str())
            && entry::has_condition(block, "assign_next_streak_type")
    });
    let has_progression = journey.configs.iter().any(|block| {
        entry::config_key(block) == Some(identity.name.as_str())
            && entry::campaign_id_value(block) == Some(identity.id.as_str())
    });

    if !has_initial {
        let index = resolve_insertion_index(&journey.configs, &[ASSIGNMENT_SENTINEL]);
        debug!(
            "inserting initial assignment block (campaign={}, index={index})",
            identity.name
        );
        journey
            .configs
            .insert(index, assignment_block(&identity.name));
        outcome.added_initial = true;
    }
    // Resolved after the initial insertion so an initial block landing ahead
    // of the catch-all shifts the progression index along with it.
    if !has_progression {
        let index = resolve_insertion_index(&journey.configs, &[PROGRESSION_SENTINEL]);
        debug!(
            "inserting progression block (campaign={}, next={next_campaign}, index={index})",
            identity.name
        );
        journey.configs.insert(
            index,
            progression_block(&identity.name, &identity.id, next_campaign),
        );
        outcome.added_progression = true;
    }

    outcome
}

/// Remove campaigns by name from the rule sections, and drop their UUIDs
/// (the ones discovered from progression blocks plus any known up front) from
/// the supported list. Removing absent campaigns is a no-op with zero counts.
pub fn remove_campaigns(
    names: &[String],
    known_ids: &[String],
    value: &mut JourneyValue,
) -> JourneyRemoval {
    let mut removal = JourneyRemoval::default();

    let mut doomed_ids: BTreeSet<String> = known_ids.iter().cloned().collect();
    if let Some(journey) = value.journey_rules.as_ref() {
        for block in &journey.configs {
            let named = entry::config_key(block)
                .is_some_and(|key| names.iter().any(|name| name == key));
            if named && let Some(id) = entry::campaign_id_value(block) {
                doomed_ids.insert(id.to_string());
            }
        }
    }

    if let Some(ids) = value.supported_campaign_ids.as_mut() {
        let before = ids.len();
        ids.retain(|id| !doomed_ids.contains(id));
        removal.supported = before - ids.len();
    }

    if let Some(batch) = value.batch_assignment_rules.as_mut() {
        removal.batch = retain_unnamed(&mut batch.configs, names);
    }
    if let Some(journey) = value.journey_rules.as_mut() {
        removal.journey = retain_unnamed(&mut journey.configs, names);
    }

    removal
}

/// Drop blocks whose `config_key` is one of `names`; returns how many went.
fn retain_unnamed(blocks: &mut Vec<Value>, names: &[String]) -> usize {
    let before = blocks.len();
    blocks.retain(|block| {
        entry::config_key(block).is_none_or(|key| !names.iter().any(|name| name == key))
    });
    before - blocks.len()
}

/// Batch / initial-assignment block shape.
fn assignment_block(name: &str) -> Value {
    json!({
        "conditions": {
            "assign_next_streak_type": entry::string_eq(name)
        },
        "config_key": name,
        "metadata": {
            "next_eligible_streak_type": name
        }
    })
}

/// Progression block shape: matches the campaign UUID and names the next
/// campaign in the chain (or `NA`).
fn progression_block(name: &str, id: &str, next_campaign: &str) -> Value {
    json!({
        "conditions": {
            "campaign_id": {
                "type": "STRING",
                "value": id,
                "operator": "EQ"
            }
        },
        "config_key": name,
        "metadata": {
            "next_eligible_streak_type": next_campaign
        }
    })
}
