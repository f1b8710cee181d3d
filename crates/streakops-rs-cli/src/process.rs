//! File-based processing commands.
//!
//! Each command mirrors one leg of the fetch→mutate→post cycle without the
//! network: read a fetched record from `before_json`, apply the mutation,
//! write the human-reviewable payload to `after_unescaped` and the final
//! escaped record to `after_json`. The operator reviews the files and posts
//! them separately.

use crate::apply;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use streakops_rs_merge::template;
use streakops_rs_protocol::{CampaignSpec, CampaignType, ConfigKind, ConfigRecord};

/// The per-config file-based commands.
#[derive(Debug, Subcommand)]
pub enum ProcessCommand {
    /// Add an eligibility entry (STREAK_ELIGIBILITY).
    Eligibility(EligibilityArgs),
    /// Add a transaction-eligibility entry (STREAK_TXN_ELIGIBILITY).
    TxnEligibility(TxnEligibilityArgs),
    /// Add a claim-state entry before the fallback (STREAK_CONFIG).
    StreakConfig(StreakConfigArgs),
    /// Add carousel entries (SCAN_HOMEPAGE_CONFIG).
    ScanHomepage(CarouselArgs),
    /// Add home-screen entries (PTP_STREAK_CONFIG, UPI/P2P only).
    Ptp(CarouselArgs),
    /// Patch the display template (STREAK_BLOCK_TEMPLATE).
    BlockTemplate(BlockTemplateArgs),
    /// Add journey, batch, and supported-id entries
    /// (STREAK_JOURNEY_JOB_CONFIG).
    Journey(JourneyArgs),
}

/// The three file positions every process command shares.
#[derive(Debug, Args)]
pub struct FileArgs {
    /// Fetched record (full GET response) to read.
    pub before_json: PathBuf,
    /// Where to write the human-reviewable payload.
    pub after_unescaped: PathBuf,
    /// Where to write the final escaped record, ready to POST.
    pub after_json: PathBuf,
}

#[derive(Debug, Args)]
pub struct EligibilityArgs {
    #[command(flatten)]
    pub files: FileArgs,
    /// Campaign name.
    pub campaign_name: String,
    /// Campaign type (UPI, SNP, or P2P).
    pub campaign_type: CampaignType,
    /// Offer window in days.
    pub duration_days: u32,
    /// Number of qualifying transactions.
    pub max_allowed: u32,
}

#[derive(Debug, Args)]
pub struct TxnEligibilityArgs {
    #[command(flatten)]
    pub files: FileArgs,
    /// Campaign name.
    pub campaign_name: String,
    /// Campaign type (UPI, SNP, or P2P).
    pub campaign_type: CampaignType,
    /// Minimum qualifying transaction amount.
    pub min_txn_amount: u64,
    /// RuPay-card campaign.
    #[arg(long)]
    pub rupay: bool,
    /// Issuing-bank code for bank-specific campaigns.
    #[arg(long)]
    pub issuer_code: Option<String>,
}

#[derive(Debug, Args)]
pub struct StreakConfigArgs {
    #[command(flatten)]
    pub files: FileArgs,
    /// Campaign UUID.
    pub campaign_id: String,
}

#[derive(Debug, Args)]
pub struct CarouselArgs {
    #[command(flatten)]
    pub files: FileArgs,
    /// Campaign name.
    pub campaign_name: String,
    /// Campaign type (UPI, SNP, or P2P).
    pub campaign_type: CampaignType,
    /// Offer window in days.
    pub duration_days: u32,
    /// Number of qualifying transactions.
    pub max_allowed: u32,
    /// Cashback per transaction.
    pub per_txn_reward: u64,
    /// Total cashback across the campaign.
    pub total_offer: u64,
}

#[derive(Debug, Args)]
pub struct BlockTemplateArgs {
    #[command(flatten)]
    pub files: FileArgs,
    /// Campaign UUID.
    pub campaign_id: String,
    /// Banner asset URL.
    pub banner_url: String,
    /// Bottom-sheet title copy.
    pub bottom_sheet_title: String,
    /// Bottom-sheet subtitle copy.
    pub bottom_sheet_subtitle: String,
}

#[derive(Debug, Args)]
pub struct JourneyArgs {
    #[command(flatten)]
    pub files: FileArgs,
    /// Campaign name.
    pub campaign_name: String,
    /// Campaign UUID.
    pub campaign_id: String,
    /// Campaign to chain into on completion.
    #[arg(long, default_value = "NA")]
    pub next_campaign: String,
}

/// Run one file-based command.
pub fn run(command: ProcessCommand) -> Result<()> {
    match command {
        ProcessCommand::Eligibility(args) => {
            let spec = CampaignSpec {
                duration_days: args.duration_days,
                max_allowed: args.max_allowed,
                ..partial_spec(&args.campaign_name, args.campaign_type)
            };
            run_add(ConfigKind::StreakEligibility, &spec, &args.files)
        }
        ProcessCommand::TxnEligibility(args) => {
            let spec = CampaignSpec {
                min_txn_amount: args.min_txn_amount,
                rupay: args.rupay,
                issuer_code: args.issuer_code.clone(),
                ..partial_spec(&args.campaign_name, args.campaign_type)
            };
            run_add(ConfigKind::StreakTxnEligibility, &spec, &args.files)
        }
        ProcessCommand::StreakConfig(args) => {
            let mut spec = partial_spec("", CampaignType::Upi);
            spec.id = args.campaign_id.clone();
            run_add(ConfigKind::StreakConfig, &spec, &args.files)
        }
        ProcessCommand::ScanHomepage(args) => {
            let spec = carousel_spec(&args);
            run_add(ConfigKind::ScanHomepage, &spec, &args.files)
        }
        ProcessCommand::Ptp(args) => {
            let spec = carousel_spec(&args);
            run_add(ConfigKind::PtpStreak, &spec, &args.files)
        }
        ProcessCommand::BlockTemplate(args) => run_block_template(&args),
        ProcessCommand::Journey(args) => {
            let mut spec = partial_spec(&args.campaign_name, CampaignType::Upi);
            spec.id = args.campaign_id.clone();
            spec.next_campaign = Some(args.next_campaign.clone());
            run_add(ConfigKind::StreakJourneyJob, &spec, &args.files)
        }
    }
}

fn run_add(kind: ConfigKind, spec: &CampaignSpec, files: &FileArgs) -> Result<()> {
    let mut record = read_record(&files.before_json)?;
    let application = apply::apply_add(kind, spec, &mut record)?;
    if let Some(notice) = &application.notice {
        println!("{notice}");
    }
    write_outputs(files, &application.unescaped, &record)?;
    if application.changed {
        println!("processed {kind}");
    } else {
        println!("{kind} already contains the campaign; files written unchanged");
    }
    println!(
        "preserved metadata: created_by={}, updated_by={}",
        record.created_by.as_deref().unwrap_or("-"),
        record.updated_by.as_deref().unwrap_or("-")
    );
    Ok(())
}

/// The template leg works on the raw value text and takes its copy as
/// explicit arguments, so it does not go through the shared apply path.
fn run_block_template(args: &BlockTemplateArgs) -> Result<()> {
    let mut record = read_record(&args.files.before_json)?;
    let outcome = template::add_campaign(
        &record.value,
        &args.campaign_id,
        &args.banner_url,
        &args.bottom_sheet_title,
        &args.bottom_sheet_subtitle,
    )?;
    match outcome.banner {
        template::BannerAction::AlreadyPresent => {
            println!("campaign already present in banner condition; banner step skipped");
        }
        template::BannerAction::AddedToSharedCondition => {
            println!("added campaign to an existing banner condition (shared URL)");
        }
        template::BannerAction::NewConditionBlock => {
            println!("added a new banner condition block");
        }
    }
    match outcome.bottom_sheet {
        template::BottomSheetAction::AlreadyPresent => {
            println!("bottom-sheet block already present; step skipped");
        }
        template::BottomSheetAction::Added => println!("added bottom-sheet block"),
    }
    record.value = outcome.template;
    let unescaped = record.value.replace("\r\n", "\n");
    write_outputs(&args.files, &unescaped, &record)?;
    println!("processed {}", ConfigKind::StreakBlockTemplate);
    Ok(())
}

/// A spec carrying only the fields a single-config command needs; the
/// remaining fields are inert for that strategy.
fn partial_spec(name: &str, campaign_type: CampaignType) -> CampaignSpec {
    CampaignSpec {
        name: name.to_string(),
        id: String::new(),
        campaign_type,
        duration_days: 0,
        max_allowed: 0,
        min_txn_amount: 0,
        total_offer: 0,
        banner_url: String::new(),
        bottom_sheet_subtitle: String::new(),
        next_campaign: None,
        per_txn_reward_override: None,
        rupay: false,
        issuer_code: None,
    }
}

fn carousel_spec(args: &CarouselArgs) -> CampaignSpec {
    CampaignSpec {
        duration_days: args.duration_days,
        max_allowed: args.max_allowed,
        total_offer: args.total_offer,
        per_txn_reward_override: Some(args.per_txn_reward),
        ..partial_spec(&args.campaign_name, args.campaign_type)
    }
}

fn read_record(path: &Path) -> Result<ConfigRecord> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a config record", path.display()))
}

fn write_outputs(files: &FileArgs, unescaped: &str, record: &ConfigRecord) -> Result<()> {
    fs::write(&files.after_unescaped, unescaped)
        .with_context(|| format!("failed to write {}", files.after_unescaped.display()))?;
    fs::write(&files.after_json, serde_json::to_string_pretty(record)?)
        .with_context(|| format!("failed to write {}", files.after_json.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn write_before(dir: &Path, value: &str) -> PathBuf {
        let path = dir.join("before.json");
        let record = json!({
            "key": "STREAK_ELIGIBILITY",
            "value": value,
            "created_by": "ops",
            "updated_by": "ops",
            "revision": 3
        });
        fs::write(&path, serde_json::to_string_pretty(&record).unwrap()).unwrap();
        path
    }

    fn files(dir: &Path, before: PathBuf) -> FileArgs {
        FileArgs {
            before_json: before,
            after_unescaped: dir.join("after_unescaped.json"),
            after_json: dir.join("after.json"),
        }
    }

    #[test]
    fn eligibility_process_writes_both_outputs() {
        let dir = TempDir::new().expect("tmp");
        let before = write_before(dir.path(), "{\"configs\": []}");
        let args = EligibilityArgs {
            files: files(dir.path(), before),
            campaign_name: "upi_streak_5".to_string(),
            campaign_type: CampaignType::Upi,
            duration_days: 14,
            max_allowed: 5,
        };
        run(ProcessCommand::Eligibility(args)).unwrap();

        let unescaped: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("after_unescaped.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(unescaped["configs"][0]["config_key"], json!("upi_streak_5"));

        let after: ConfigRecord = serde_json::from_str(
            &fs::read_to_string(dir.path().join("after.json")).unwrap(),
        )
        .unwrap();
        // Metadata is preserved; only the value changes.
        assert_eq!(after.updated_by.as_deref(), Some("ops"));
        assert!(after.value.contains("upi_streak_5"));
        assert_eq!(after.extra.get("revision"), Some(&json!(3)));
    }

    #[test]
    fn journey_process_chains_to_the_next_campaign() {
        let dir = TempDir::new().expect("tmp");
        let value = json!({
            "supported_campaign_ids": [],
            "batch_assignment_rules": {"configs": [
                {"config_key": "users_removal_streak_assignment", "conditions": {}, "metadata": {}}
            ]},
            "journey_rules": {"configs": [
                {"config_key": "users_removal_streak_assignment", "conditions": {}, "metadata": {}},
                {"config_key": "catch_all_condition", "conditions": {}, "metadata": {}}
            ]}
        });
        let before = write_before(dir.path(), &value.to_string());
        let args = JourneyArgs {
            files: files(dir.path(), before),
            campaign_name: "x".to_string(),
            campaign_id: "u1".to_string(),
            next_campaign: "y".to_string(),
        };
        run(ProcessCommand::Journey(args)).unwrap();

        let unescaped: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("after_unescaped.json")).unwrap(),
        )
        .unwrap();
        let rules = unescaped["journey_rules"]["configs"].as_array().unwrap();
        assert_eq!(rules.len(), 4);
        assert_eq!(rules[2]["metadata"]["next_eligible_streak_type"], json!("y"));
    }

    #[test]
    fn missing_before_file_fails_with_context() {
        let dir = TempDir::new().expect("tmp");
        let args = StreakConfigArgs {
            files: files(dir.path(), dir.path().join("absent.json")),
            campaign_id: "u1".to_string(),
        };
        let err = run(ProcessCommand::StreakConfig(args)).unwrap_err();
        assert!(format!("{err:#}").contains("absent.json"));
    }

    #[test]
    fn block_template_process_fails_fatally_without_anchors() {
        let dir = TempDir::new().expect("tmp");
        let before = write_before(dir.path(), "no velocity directives here");
        let args = BlockTemplateArgs {
            files: files(dir.path(), before),
            campaign_id: "u1".to_string(),
            banner_url: "https://assets.example/banner.png".to_string(),
            bottom_sheet_title: "t".to_string(),
            bottom_sheet_subtitle: "s".to_string(),
        };
        let err = run(ProcessCommand::BlockTemplate(args)).unwrap_err();
        assert!(format!("{err}").contains("template anchor not found"));
        // Fatal means no partial output.
        assert!(!dir.path().join("after.json").exists());
    }
}
