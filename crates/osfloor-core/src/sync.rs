//! One sync run: policy lookup, feed lookup, compare, conditional PATCH.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write as _;

use crate::config::Config;
use crate::error::{ConfigError, CoreError, Result};
use crate::feed::ReleaseFeedReader;
use crate::policy::{self, PolicyClient, UpdatePayload};
use crate::version;

/// Inputs to [`run_sync`] that come from configuration and flags.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub policy_id: String,
    pub description_template: String,
    pub timestamp_format: String,
    /// Report what would change without sending the PATCH.
    pub dry_run: bool,
}

impl SyncSettings {
    pub fn from_config(config: &Config, dry_run: bool) -> Self {
        Self {
            policy_id: config.graph.policy_id.clone(),
            description_template: config.update.description_template.clone(),
            timestamp_format: config.update.timestamp_format.clone(),
            dry_run,
        }
    }
}

/// How a sync run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// No feed entry passed the title filter.
    NoAnnouncement,
    /// The matched title carries no `x.y.z` build.
    NoBuildNumber { title: String },
    /// Policy already requires the announced build.
    AlreadyCurrent { version: String },
    /// Dry run: an update was due but not sent.
    WouldUpdate { from: String, to: String },
    Updated { from: String, to: String },
}

impl SyncOutcome {
    pub fn changed_remote(&self) -> bool {
        matches!(self, SyncOutcome::Updated { .. })
    }
}

/// Result of [`run_sync`].
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub policy_id: String,
    pub display_name: String,
    pub current_version: String,
    /// First two characters of `current_version`; informational.
    pub major_hint: String,
    pub announcement: Option<String>,
    pub description: String,
    pub outcome: SyncOutcome,
}

/// Render the update description, replacing `{timestamp}` with `now`.
pub fn render_description(template: &str, timestamp_format: &str, now: &DateTime<Local>) -> Result<String> {
    let mut stamp = String::new();
    write!(stamp, "{}", now.format(timestamp_format)).map_err(|_| ConfigError::InvalidValue {
        key: "update.timestamp_format".into(),
        message: format!("'{timestamp_format}' is not a valid strftime format"),
    })?;
    Ok(template.replace("{timestamp}", &stamp))
}

/// Run the workflow once.
///
/// Stops early without touching the policy when the feed has no matching
/// announcement, when the title has no build number, or when the policy
/// already requires that build. Any API or feed failure is returned as is.
pub async fn run_sync(
    settings: &SyncSettings,
    policies: &PolicyClient,
    feed: &ReleaseFeedReader,
    now: DateTime<Local>,
) -> Result<SyncReport> {
    let description = render_description(
        &settings.description_template,
        &settings.timestamp_format,
        &now,
    )?;

    let all = policies.list_policies(None).await?;
    let target = policy::select_policy(&all, &settings.policy_id)
        .ok_or_else(|| CoreError::PolicyNotFound(settings.policy_id.clone()))?;

    let current = target.current_version().to_string();
    let major_hint = policy::major_version_hint(&current).to_string();
    tracing::info!(
        policy_id = %target.id,
        display_name = %target.display_name,
        current_version = %current,
        major_hint = %major_hint,
        "loaded compliance policy"
    );

    let mut report = SyncReport {
        policy_id: target.id.clone(),
        display_name: target.display_name.clone(),
        current_version: current.clone(),
        major_hint,
        announcement: None,
        description: description.clone(),
        outcome: SyncOutcome::NoAnnouncement,
    };

    let Some(announcement) = feed.latest().await? else {
        tracing::info!("no matching release announcement found");
        return Ok(report);
    };
    tracing::info!(title = %announcement.title, "latest matching release announcement");
    report.announcement = Some(announcement.title.clone());

    let Some(build) = version::extract_build(&announcement.title) else {
        tracing::info!(title = %announcement.title, "announcement carries no build number");
        report.outcome = SyncOutcome::NoBuildNumber {
            title: announcement.title,
        };
        return Ok(report);
    };

    if build == current {
        tracing::info!(version = %current, "policy already requires the latest release");
        report.outcome = SyncOutcome::AlreadyCurrent { version: current };
        return Ok(report);
    }

    if settings.dry_run {
        tracing::info!(from = %current, to = %build, "dry run, skipping update");
        report.outcome = SyncOutcome::WouldUpdate {
            from: current,
            to: build.to_string(),
        };
        return Ok(report);
    }

    let payload = UpdatePayload::for_policy(target, description, build.to_string());
    policies.update_policy_with(&target.id, &payload).await?;
    tracing::info!(from = %current, to = %build, "minimum OS version updated");

    report.outcome = SyncOutcome::Updated {
        from: current,
        to: build.to_string(),
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 4, 12, 5, 0).single().unwrap()
    }

    #[test]
    fn description_embeds_timestamp() {
        let text = render_description("Synced on {timestamp}", "%Y-%m-%d %H:%M", &noon()).unwrap();
        assert_eq!(text, "Synced on 2026-03-04 12:05");
    }

    #[test]
    fn default_format_is_human_readable() {
        let cfg = Config::default();
        let text = render_description(
            &cfg.update.description_template,
            &cfg.update.timestamp_format,
            &noon(),
        )
        .unwrap();
        assert!(text.ends_with("Wednesday, March 4, 2026 12:05"), "{text}");
    }

    #[test]
    fn template_without_placeholder_is_kept() {
        let text = render_description("static text", "%Y", &noon()).unwrap();
        assert_eq!(text, "static text");
    }

    #[test]
    fn invalid_timestamp_format_is_config_error() {
        let err = render_description("{timestamp}", "%Q", &noon()).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let value = serde_json::to_value(SyncOutcome::Updated {
            from: "26.0.0".into(),
            to: "26.0.1".into(),
        })
        .unwrap();
        assert_eq!(value["status"], "updated");
        assert_eq!(value["to"], "26.0.1");
        assert!(SyncOutcome::Updated { from: String::new(), to: String::new() }.changed_remote());
        assert!(!SyncOutcome::NoAnnouncement.changed_remote());
    }
}
