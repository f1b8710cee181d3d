//! Local backup sessions for operator review and rollback.
//!
//! One folder per campaign run, named `YYYY-MM-DD_{campaign}`, holding the
//! fetched record, the human-reviewable unescaped payload, the final escaped
//! record, and the post-POST verification fetch. The mutation logic never
//! reads these back; they exist for the operator.

use crate::ClientError;
use chrono::Local;
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use streakops_rs_protocol::{CampaignSpec, ConfigKind, ConfigRecord};

/// A timestamped backup folder for one campaign operation.
#[derive(Debug, Clone)]
pub struct BackupSession {
    root: PathBuf,
}

impl BackupSession {
    /// Create (or reuse) today's session folder for a campaign.
    pub fn create(base: &Path, campaign_name: &str) -> Result<Self, ClientError> {
        let date = Local::now().format("%Y-%m-%d");
        let root = base.join(format!("{date}_{campaign_name}"));
        fs::create_dir_all(&root)?;
        info!("backup session ready at {}", root.display());
        Ok(Self { root })
    }

    /// The session folder path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write the record as fetched, before any mutation.
    pub fn write_before(&self, kind: ConfigKind, record: &ConfigRecord) -> Result<PathBuf, ClientError> {
        self.write_record(format!("{}_before.json", kind.key()), record)
    }

    /// Write the final escaped record, ready to POST.
    pub fn write_after(&self, kind: ConfigKind, record: &ConfigRecord) -> Result<PathBuf, ClientError> {
        self.write_record(format!("{}_after.json", kind.key()), record)
    }

    /// Write the verification fetch performed after a POST.
    pub fn write_verify(&self, kind: ConfigKind, record: &ConfigRecord) -> Result<PathBuf, ClientError> {
        self.write_record(format!("{}_verify.json", kind.key()), record)
    }

    /// Write the human-reviewable payload: pretty JSON for JSON kinds, the
    /// raw template text otherwise.
    pub fn write_unescaped(&self, kind: ConfigKind, contents: &str) -> Result<PathBuf, ClientError> {
        let extension = if kind.is_json() { "json" } else { "txt" };
        let path = self
            .root
            .join(format!("{}_after_unescaped.{extension}", kind.key()));
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Write the session summary for later review.
    pub fn write_campaign_info(
        &self,
        spec: &CampaignSpec,
        plan: &[ConfigKind],
    ) -> Result<PathBuf, ClientError> {
        let path = self.root.join("campaign_info.txt");
        let mut file = fs::File::create(&path)?;
        writeln!(file, "Campaign Setup Session")?;
        writeln!(file, "======================")?;
        writeln!(file)?;
        writeln!(file, "Date: {}", Local::now().format("%Y-%m-%d"))?;
        writeln!(file, "Campaign Name: {}", spec.name)?;
        writeln!(file, "Campaign ID: {}", spec.id)?;
        writeln!(file)?;
        writeln!(file, "Campaign Details:")?;
        writeln!(file, "-----------------")?;
        writeln!(file, "- Type: {}", spec.campaign_type)?;
        writeln!(file, "- Duration: {} days", spec.duration_days)?;
        writeln!(file, "- Max Allowed: {} transactions", spec.max_allowed)?;
        writeln!(file, "- Min Transaction Amount: {}", spec.min_txn_amount)?;
        writeln!(file, "- Total Offer: {}", spec.total_offer)?;
        writeln!(file, "- Per-Transaction Reward: Rs {}", spec.per_txn_reward())?;
        writeln!(file, "- Next Campaign: {}", spec.next_campaign_or_na())?;
        writeln!(
            file,
            "- RuPay Campaign: {}",
            if spec.rupay { "Yes" } else { "No" }
        )?;
        match spec.issuer_code.as_deref() {
            Some(code) => writeln!(file, "- Bank-Specific: Yes ({code})")?,
            None => writeln!(file, "- Bank-Specific: No")?,
        }
        writeln!(file)?;
        writeln!(file, "Configs In Plan:")?;
        writeln!(file, "----------------")?;
        for (index, kind) in plan.iter().enumerate() {
            writeln!(file, "{}. {}", index + 1, kind.key())?;
        }
        Ok(path)
    }

    fn write_record(&self, name: String, record: &ConfigRecord) -> Result<PathBuf, ClientError> {
        let path = self.root.join(name);
        fs::write(&path, serde_json::to_string_pretty(record)?)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use streakops_rs_protocol::CampaignType;
    use tempfile::TempDir;

    fn record() -> ConfigRecord {
        serde_json::from_value(serde_json::json!({
            "key": "STREAK_ELIGIBILITY",
            "value": "{\"configs\": []}",
            "created_by": "ops",
            "revision": 7
        }))
        .expect("record")
    }

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

    #[test]
    fn session_folder_is_date_and_campaign_named() {
        let dir = TempDir::new().expect("tmp");
        let session = BackupSession::create(dir.path(), "upi_streak_5").unwrap();
        let name = session.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("_upi_streak_5"));
        assert!(session.path().is_dir());
    }

    #[test]
    fn before_file_round_trips_the_record() {
        let dir = TempDir::new().expect("tmp");
        let session = BackupSession::create(dir.path(), "upi_streak_5").unwrap();
        let path = session
            .write_before(ConfigKind::StreakEligibility, &record())
            .unwrap();
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "STREAK_ELIGIBILITY_before.json"
        );
        let read_back: ConfigRecord =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read_back, record());
    }

    #[test]
    fn unescaped_template_uses_txt_extension() {
        let dir = TempDir::new().expect("tmp");
        let session = BackupSession::create(dir.path(), "upi_streak_5").unwrap();
        let path = session
            .write_unescaped(ConfigKind::StreakBlockTemplate, "#if($x)\n#end")
            .unwrap();
        assert!(path.to_string_lossy().ends_with("STREAK_BLOCK_TEMPLATE_after_unescaped.txt"));
        let json_path = session
            .write_unescaped(ConfigKind::ScanHomepage, "{}")
            .unwrap();
        assert!(json_path.to_string_lossy().ends_with("SCAN_HOMEPAGE_CONFIG_after_unescaped.json"));
    }

    #[test]
    fn campaign_info_lists_the_plan() {
        let dir = TempDir::new().expect("tmp");
        let session = BackupSession::create(dir.path(), "upi_streak_5").unwrap();
        let plan = ConfigKind::plan_for(CampaignType::Upi);
        let path = session.write_campaign_info(&spec(), &plan).unwrap();
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("Campaign Name: upi_streak_5"));
        assert!(contents.contains("PTP_STREAK_CONFIG"));
        assert!(contents.contains("Per-Transaction Reward: Rs 10"));
    }
}
