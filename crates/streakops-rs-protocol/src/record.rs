//! Config record wire shape and the config-key registry.

use crate::{CampaignType, ProtocolError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One record as returned by `GET /template/{key}` and accepted by
/// `POST /template`.
///
/// `value` is an opaque string: a JSON document for the JSON-kind configs, a
/// Velocity template for [`ConfigKind::StreakBlockTemplate`]. Fields the
/// service returns beyond the ones named here are captured in `extra` so a
/// fetch→mutate→post round trip never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Config key the record is stored under.
    pub key: String,
    /// Encoded payload (JSON string or Velocity template).
    pub value: String,
    /// Human description, if the service returned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Original author, preserved verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Last writer; set to an automation marker before posting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Every other field the service returned, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Credentials loaded from the local credentials file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Value for the `userid` header.
    pub userid: String,
    /// Value for the `_cred_apikey` header.
    pub apikey: String,
}

/// The seven config keys this toolkit mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    /// Campaign eligibility registry (`STREAK_ELIGIBILITY`).
    StreakEligibility,
    /// Per-transaction eligibility conditions (`STREAK_TXN_ELIGIBILITY`).
    StreakTxnEligibility,
    /// Reward claim-state display config (`STREAK_CONFIG`).
    StreakConfig,
    /// Scan homepage carousel config (`SCAN_HOMEPAGE_CONFIG`).
    ScanHomepage,
    /// Peer-to-peer home screen config (`PTP_STREAK_CONFIG`).
    PtpStreak,
    /// Journey job config with three nested sections
    /// (`STREAK_JOURNEY_JOB_CONFIG`).
    StreakJourneyJob,
    /// Velocity template for streak display blocks
    /// (`STREAK_BLOCK_TEMPLATE`). The only non-JSON kind.
    StreakBlockTemplate,
}

impl ConfigKind {
    /// All kinds, in the order the setup pipeline processes them.
    pub const ALL: [ConfigKind; 7] = [
        ConfigKind::StreakEligibility,
        ConfigKind::StreakTxnEligibility,
        ConfigKind::StreakConfig,
        ConfigKind::StreakBlockTemplate,
        ConfigKind::ScanHomepage,
        ConfigKind::PtpStreak,
        ConfigKind::StreakJourneyJob,
    ];

    /// The key the remote service stores this config under.
    pub fn key(&self) -> &'static str {
        match self {
            ConfigKind::StreakEligibility => "STREAK_ELIGIBILITY",
            ConfigKind::StreakTxnEligibility => "STREAK_TXN_ELIGIBILITY",
            ConfigKind::StreakConfig => "STREAK_CONFIG",
            ConfigKind::ScanHomepage => "SCAN_HOMEPAGE_CONFIG",
            ConfigKind::PtpStreak => "PTP_STREAK_CONFIG",
            ConfigKind::StreakJourneyJob => "STREAK_JOURNEY_JOB_CONFIG",
            ConfigKind::StreakBlockTemplate => "STREAK_BLOCK_TEMPLATE",
        }
    }

    /// Whether the `value` payload is a JSON document.
    pub fn is_json(&self) -> bool {
        !matches!(self, ConfigKind::StreakBlockTemplate)
    }

    /// The configs a campaign of the given type must touch.
    ///
    /// Every campaign touches six configs; `PTP_STREAK_CONFIG` is limited to
    /// the campaign types surfaced on the peer-to-peer home screen.
    pub fn plan_for(campaign_type: CampaignType) -> Vec<ConfigKind> {
        let mut plan = vec![
            ConfigKind::StreakEligibility,
            ConfigKind::StreakTxnEligibility,
            ConfigKind::StreakConfig,
            ConfigKind::StreakBlockTemplate,
            ConfigKind::ScanHomepage,
        ];
        if campaign_type.shown_on_ptp_home() {
            plan.push(ConfigKind::PtpStreak);
        }
        plan.push(ConfigKind::StreakJourneyJob);
        plan
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ConfigKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| ProtocolError::UnknownConfigKey(s.to_string()))
    }
}
