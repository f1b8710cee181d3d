//! `streakops` — operator CLI for streak-campaign template configs.

mod apply;
mod pipeline;
mod process;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use log::info;
use pipeline::RemoteOptions;
use std::path::PathBuf;
use streakops_rs_protocol::{CampaignIdentity, CampaignSpec, CampaignType, ConfigKind};

/// Command-line options for the streakops CLI.
#[derive(Parser)]
#[command(name = "streakops", version, about = "Operator toolkit for streak-campaign template configs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Connection options shared by the remote commands.
#[derive(Debug, Args)]
struct RemoteArgs {
    /// Template service root, e.g. http://config-proxy.internal/heartbeat/v1
    #[arg(long, env = "STREAKOPS_BASE_URL")]
    base_url: String,
    /// Credentials file (defaults to ~/.streakops/credentials.json)
    #[arg(long)]
    credentials: Option<PathBuf>,
}

/// Campaign parameters collected up front for a setup run.
#[derive(Debug, Args)]
struct CampaignArgs {
    /// Campaign name, e.g. upi_streak_5
    #[arg(long)]
    campaign_name: String,
    /// Campaign UUID
    #[arg(long)]
    campaign_id: String,
    /// Campaign type (UPI, SNP, or P2P)
    #[arg(long)]
    campaign_type: CampaignType,
    /// Offer window in days
    #[arg(long)]
    duration_days: u32,
    /// Number of qualifying transactions
    #[arg(long)]
    max_allowed: u32,
    /// Minimum qualifying transaction amount
    #[arg(long)]
    min_txn_amount: u64,
    /// Total cashback across the campaign
    #[arg(long)]
    total_offer: u64,
    /// Banner asset URL for the display template
    #[arg(long)]
    banner_url: String,
    /// Bottom-sheet subtitle copy for the display template
    #[arg(long)]
    bottom_sheet_subtitle: String,
    /// Campaign to chain into on completion
    #[arg(long)]
    next_campaign: Option<String>,
    /// Override the derived per-transaction reward
    #[arg(long)]
    per_txn_reward: Option<u64>,
    /// RuPay-card campaign
    #[arg(long)]
    rupay: bool,
    /// Issuing-bank code for bank-specific campaigns
    #[arg(long)]
    issuer_code: Option<String>,
}

impl From<CampaignArgs> for CampaignSpec {
    fn from(args: CampaignArgs) -> Self {
        CampaignSpec {
            name: args.campaign_name,
            id: args.campaign_id,
            campaign_type: args.campaign_type,
            duration_days: args.duration_days,
            max_allowed: args.max_allowed,
            min_txn_amount: args.min_txn_amount,
            total_offer: args.total_offer,
            banner_url: args.banner_url,
            bottom_sheet_subtitle: args.bottom_sheet_subtitle,
            next_campaign: args.next_campaign,
            per_txn_reward_override: args.per_txn_reward,
            rupay: args.rupay,
            issuer_code: args.issuer_code,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Onboard a campaign across every config in its plan.
    Setup {
        #[command(flatten)]
        remote: RemoteArgs,
        #[command(flatten)]
        campaign: CampaignArgs,
        /// Backup session root folder
        #[arg(long, default_value = "backups")]
        backup_dir: PathBuf,
        /// POST each mutated config (default is review-only)
        #[arg(long)]
        post: bool,
    },
    /// Decommission a campaign from every config.
    Remove {
        #[command(flatten)]
        remote: RemoteArgs,
        /// Campaign name
        #[arg(long)]
        campaign_name: String,
        /// Campaign UUID
        #[arg(long)]
        campaign_id: String,
        /// Backup session root folder
        #[arg(long, default_value = "backups")]
        backup_dir: PathBuf,
        /// POST each mutated config (default is review-only)
        #[arg(long)]
        post: bool,
    },
    /// Cross-check supported UUIDs against journey progression rules.
    Audit {
        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// Fetch one config record.
    Fetch {
        #[command(flatten)]
        remote: RemoteArgs,
        /// Config key, e.g. STREAK_ELIGIBILITY
        key: ConfigKind,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Show the decoded payload instead of the raw record
        #[arg(long)]
        unescape: bool,
    },
    /// Post a prepared record file as-is.
    Post {
        #[command(flatten)]
        remote: RemoteArgs,
        /// Path to a *_after.json record file
        file: PathBuf,
    },
    /// File-based processing without the network.
    Process {
        #[command(subcommand)]
        command: process::ProcessCommand,
    },
}

fn remote_options(args: &RemoteArgs) -> RemoteOptions {
    RemoteOptions {
        base_url: args.base_url.clone(),
        credentials_path: args.credentials.clone(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    match cli.command {
        Command::Setup {
            remote,
            campaign,
            backup_dir,
            post,
        } => {
            let client = pipeline::build_client(&remote_options(&remote))?;
            let spec: CampaignSpec = campaign.into();
            info!(
                "setup starting (campaign={}, type={}, post={post})",
                spec.name, spec.campaign_type
            );
            let reports = pipeline::run_setup(&client, &spec, &backup_dir, post).await?;
            print!("{}", pipeline::render_reports(&reports));
            let failed = reports.iter().filter(|report| report.is_failure()).count();
            if failed > 0 {
                bail!("{failed} of {} configs failed", reports.len());
            }
        }
        Command::Remove {
            remote,
            campaign_name,
            campaign_id,
            backup_dir,
            post,
        } => {
            let client = pipeline::build_client(&remote_options(&remote))?;
            let identity = CampaignIdentity {
                name: campaign_name,
                id: campaign_id,
            };
            info!(
                "remove starting (campaign={}, post={post})",
                identity.name
            );
            let reports = pipeline::run_remove(&client, &identity, &backup_dir, post).await?;
            print!("{}", pipeline::render_reports(&reports));
            let failed = reports.iter().filter(|report| report.is_failure()).count();
            if failed > 0 {
                bail!("{failed} of {} configs failed", reports.len());
            }
        }
        Command::Audit { remote } => {
            let client = pipeline::build_client(&remote_options(&remote))?;
            let report = pipeline::run_audit(&client).await?;
            print!("{report}");
        }
        Command::Fetch {
            remote,
            key,
            output,
            unescape,
        } => {
            let client = pipeline::build_client(&remote_options(&remote))?;
            pipeline::run_fetch(&client, key, output.as_deref(), unescape).await?;
        }
        Command::Post { remote, file } => {
            let client = pipeline::build_client(&remote_options(&remote))?;
            pipeline::run_post(&client, &file).await?;
        }
        Command::Process { command } => {
            process::run(command)?;
        }
    }
    Ok(())
}
