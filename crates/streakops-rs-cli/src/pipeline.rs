//! End-to-end fetch→mutate→backup→post flows.
//!
//! Each config is processed independently and failures do not stop the run:
//! partial application across the configs is an accepted, visible outcome.
//! There is no concurrency control on the remote service, so a concurrent
//! operator run against the same key is a lost-update race; backups are the
//! only (best-effort) mitigation.

use crate::apply;
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use streakops_rs_client::{
    AUTOMATION_MARKER, BackupSession, TemplateClient, default_credentials_path, load_credentials,
};
use streakops_rs_merge::audit;
use streakops_rs_protocol::{CampaignIdentity, CampaignSpec, ConfigKind, ConfigRecord};

/// Connection options shared by every remote command.
#[derive(Debug, Clone)]
pub struct RemoteOptions {
    /// Service root, e.g. `http://config-proxy.internal/heartbeat/v1`.
    pub base_url: String,
    /// Credentials file override; defaults to `~/.streakops/credentials.json`.
    pub credentials_path: Option<PathBuf>,
}

/// Per-config outcome of a batch run.
#[derive(Debug)]
pub enum ConfigStatus {
    /// Mutated and (optionally) posted.
    Applied { posted: bool },
    /// Nothing to do; the reason is shown to the operator.
    Skipped(String),
    /// Entries removed and (optionally) posted.
    Removed { count: usize, posted: bool },
    /// The template references the campaign but must be cleaned up by hand.
    ManualCleanup,
    /// The config failed; the rest of the batch continued.
    Failed(String),
}

/// One line of the batch summary.
#[derive(Debug)]
pub struct ConfigReport {
    /// Which config this line is about.
    pub kind: ConfigKind,
    /// What happened to it.
    pub status: ConfigStatus,
}

impl ConfigReport {
    /// Whether this outcome should fail the process exit code.
    pub fn is_failure(&self) -> bool {
        matches!(self.status, ConfigStatus::Failed(_))
    }
}

/// Build a client from the connection options.
pub fn build_client(options: &RemoteOptions) -> Result<TemplateClient> {
    let credentials_path = match options.credentials_path.clone() {
        Some(path) => path,
        None => default_credentials_path()
            .context("could not resolve a home directory for the credentials file")?,
    };
    let credentials = load_credentials(&credentials_path)?;
    Ok(TemplateClient::new(&options.base_url, credentials)?)
}

/// Onboard a campaign across its config plan.
pub async fn run_setup(
    client: &TemplateClient,
    spec: &CampaignSpec,
    backup_base: &Path,
    post: bool,
) -> Result<Vec<ConfigReport>> {
    spec.validate()?;
    let plan = ConfigKind::plan_for(spec.campaign_type);
    let session = BackupSession::create(backup_base, &spec.name)?;
    session.write_campaign_info(spec, &plan)?;
    println!("session folder: {}", session.path().display());

    let mut reports = Vec::with_capacity(plan.len());
    for kind in plan {
        let status = match setup_one(client, &session, kind, spec, post).await {
            Ok(status) => status,
            Err(err) => {
                error!("{kind} failed: {err:#}");
                ConfigStatus::Failed(format!("{err:#}"))
            }
        };
        reports.push(ConfigReport { kind, status });
    }
    Ok(reports)
}

async fn setup_one(
    client: &TemplateClient,
    session: &BackupSession,
    kind: ConfigKind,
    spec: &CampaignSpec,
    post: bool,
) -> Result<ConfigStatus> {
    let mut record = client.fetch(kind).await?;
    session.write_before(kind, &record)?;

    let application = apply::apply_add(kind, spec, &mut record)?;
    if let Some(notice) = &application.notice {
        println!("{kind}: {notice}");
    }
    session.write_unescaped(kind, &application.unescaped)?;
    if !application.changed {
        info!("{kind}: campaign already present, skipping");
        return Ok(ConfigStatus::Skipped("already present".to_string()));
    }

    record.updated_by = Some(AUTOMATION_MARKER.to_string());
    session.write_after(kind, &record)?;

    let posted = if post {
        client.post(&record).await?;
        let verify = client.fetch(kind).await?;
        session.write_verify(kind, &verify)?;
        true
    } else {
        false
    };
    Ok(ConfigStatus::Applied { posted })
}

/// Decommission a campaign from every config.
pub async fn run_remove(
    client: &TemplateClient,
    identity: &CampaignIdentity,
    backup_base: &Path,
    post: bool,
) -> Result<Vec<ConfigReport>> {
    let session = BackupSession::create(backup_base, &identity.name)?;
    println!("session folder: {}", session.path().display());

    let mut reports = Vec::with_capacity(ConfigKind::ALL.len());
    for kind in ConfigKind::ALL {
        let status = match remove_one(client, &session, kind, identity, post).await {
            Ok(status) => status,
            Err(err) => {
                error!("{kind} failed: {err:#}");
                ConfigStatus::Failed(format!("{err:#}"))
            }
        };
        reports.push(ConfigReport { kind, status });
    }
    Ok(reports)
}

async fn remove_one(
    client: &TemplateClient,
    session: &BackupSession,
    kind: ConfigKind,
    identity: &CampaignIdentity,
    post: bool,
) -> Result<ConfigStatus> {
    let mut record = client.fetch(kind).await?;
    session.write_before(kind, &record)?;

    let application = apply::apply_remove(kind, identity, &mut record)?;
    if application.manual_cleanup {
        warn!(
            "{kind}: campaign {} present in the template; manual cleanup required",
            identity.id
        );
        return Ok(ConfigStatus::ManualCleanup);
    }
    if application.removed == 0 {
        return Ok(ConfigStatus::Skipped("campaign not found".to_string()));
    }
    if let Some(unescaped) = &application.unescaped {
        session.write_unescaped(kind, unescaped)?;
    }

    record.updated_by = Some(AUTOMATION_MARKER.to_string());
    session.write_after(kind, &record)?;

    let posted = if post {
        client.post(&record).await?;
        let verify = client.fetch(kind).await?;
        session.write_verify(kind, &verify)?;
        true
    } else {
        false
    };
    Ok(ConfigStatus::Removed {
        count: application.removed,
        posted,
    })
}

/// Cross-check the journey config and render the drift report.
pub async fn run_audit(client: &TemplateClient) -> Result<String> {
    let record = client.fetch(ConfigKind::StreakJourneyJob).await?;
    let value = apply::decode_journey(&record)?;
    let report = audit::audit_journey(&value);
    Ok(apply::render_audit(&report))
}

/// Fetch one record and show it (or write it to a file).
pub async fn run_fetch(
    client: &TemplateClient,
    kind: ConfigKind,
    output: Option<&Path>,
    unescape: bool,
) -> Result<()> {
    let record = client.fetch(kind).await?;
    let rendered = if unescape && kind.is_json() {
        apply::pretty_value(&record)?
    } else {
        serde_json::to_string_pretty(&record)?
    };
    match output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            println!("wrote {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Post a prepared `*_after.json` record file as-is.
pub async fn run_post(client: &TemplateClient, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let record: ConfigRecord = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a config record", path.display()))?;
    client.post(&record).await?;
    println!("posted {}", record.key);
    Ok(())
}

/// Render the batch summary for the operator.
pub fn render_reports(reports: &[ConfigReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let line = match &report.status {
            ConfigStatus::Applied { posted: true } => "updated and posted".to_string(),
            ConfigStatus::Applied { posted: false } => {
                "updated (review the session folder, then post)".to_string()
            }
            ConfigStatus::Skipped(reason) => format!("skipped: {reason}"),
            ConfigStatus::Removed {
                count,
                posted: true,
            } => format!("removed {count} entries and posted"),
            ConfigStatus::Removed {
                count,
                posted: false,
            } => format!("removed {count} entries (review, then post)"),
            ConfigStatus::ManualCleanup => {
                "manual cleanup required (template references the campaign)".to_string()
            }
            ConfigStatus::Failed(reason) => format!("FAILED: {reason}"),
        };
        out.push_str(&format!("{:<28} {line}\n", report.kind.key()));
    }
    out
}
