//! Campaign parameter and identity types.

use crate::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Campaign flavor, deciding which configs the campaign touches and which
/// transaction flows count toward it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CampaignType {
    /// Any UPI payment (scan-and-pay or peer-to-peer).
    Upi,
    /// Scan-and-pay only.
    Snp,
    /// Peer-to-peer only.
    P2p,
}

impl CampaignType {
    /// Transaction flow types that count toward a campaign of this type.
    pub fn flow_types(&self) -> &'static [&'static str] {
        match self {
            CampaignType::Upi => &["SNP", "P2P"],
            CampaignType::Snp => &["SNP"],
            CampaignType::P2p => &["P2P"],
        }
    }

    /// Whether campaigns of this type appear on the peer-to-peer home screen.
    pub fn shown_on_ptp_home(&self) -> bool {
        matches!(self, CampaignType::Upi | CampaignType::P2p)
    }
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CampaignType::Upi => "UPI",
            CampaignType::Snp => "SNP",
            CampaignType::P2p => "P2P",
        };
        f.write_str(label)
    }
}

impl FromStr for CampaignType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "UPI" => Ok(CampaignType::Upi),
            "SNP" => Ok(CampaignType::Snp),
            "P2P" => Ok(CampaignType::P2p),
            other => Err(ProtocolError::UnknownCampaignType(other.to_string())),
        }
    }
}

/// The name/UUID pair a campaign is referenced by.
///
/// Some configs key entries by name, others by UUID; the binding between the
/// two is only established by the journey config's progression rules and is
/// audited rather than enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignIdentity {
    /// Unique human key, e.g. `upi_streak_5`.
    pub name: String,
    /// Campaign UUID as the remote service stores it.
    pub id: String,
}

/// Every parameter a campaign onboarding needs, collected up front.
///
/// The merge strategies take this object instead of consulting any ambient
/// registry; the caller resolves banner art and copy before invoking them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSpec {
    /// Campaign name, e.g. `upi_streak_5`.
    pub name: String,
    /// Campaign UUID.
    pub id: String,
    /// Campaign flavor.
    pub campaign_type: CampaignType,
    /// Offer window in days.
    pub duration_days: u32,
    /// Number of qualifying transactions the campaign rewards.
    pub max_allowed: u32,
    /// Minimum qualifying transaction amount.
    pub min_txn_amount: u64,
    /// Total cashback across the whole campaign.
    pub total_offer: u64,
    /// Banner asset URL for the display template.
    pub banner_url: String,
    /// Bottom-sheet subtitle copy for the display template.
    pub bottom_sheet_subtitle: String,
    /// Campaign to chain into on completion, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_campaign: Option<String>,
    /// Operator override for the per-transaction reward, when the derived
    /// split is not what the offer copy promises.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_txn_reward_override: Option<u64>,
    /// RuPay-card campaign flag.
    #[serde(default)]
    pub rupay: bool,
    /// Issuing-bank code for bank-specific campaigns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_code: Option<String>,
}

impl CampaignSpec {
    /// Cashback per qualifying transaction: the operator override when set,
    /// otherwise `total_offer / max_allowed`. Integer truncation is
    /// deliberate: the reward service pays whole rupees.
    pub fn per_txn_reward(&self) -> u64 {
        self.per_txn_reward_override
            .unwrap_or(self.total_offer / u64::from(self.max_allowed.max(1)))
    }

    /// Bottom-sheet title copy derived from the per-transaction reward.
    pub fn bottom_sheet_title(&self) -> String {
        format!("<format>earn <icon>INR</icon>{}</format>", self.per_txn_reward())
    }

    /// The journey chain target, or the `NA` marker when the campaign ends.
    pub fn next_campaign_or_na(&self) -> &str {
        self.next_campaign.as_deref().unwrap_or("NA")
    }

    /// The name/UUID pair for this campaign.
    pub fn identity(&self) -> CampaignIdentity {
        CampaignIdentity {
            name: self.name.clone(),
            id: self.id.clone(),
        }
    }

    /// Validate invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.name.trim().is_empty() {
            return Err(ProtocolError::InvalidField {
                field: "name".to_string(),
                message: "campaign name must not be empty".to_string(),
            });
        }
        if Uuid::parse_str(&self.id).is_err() {
            return Err(ProtocolError::InvalidField {
                field: "id".to_string(),
                message: "campaign id must be a UUID".to_string(),
            });
        }
        if self.max_allowed == 0 {
            return Err(ProtocolError::InvalidField {
                field: "max_allowed".to_string(),
                message: "campaign must allow at least one transaction".to_string(),
            });
        }
        if self.duration_days == 0 {
            return Err(ProtocolError::InvalidField {
                field: "duration_days".to_string(),
                message: "campaign duration must be at least one day".to_string(),
            });
        }
        Ok(())
    }
}
