//! `osfloor run`: one sync of the configured policy.

use colored::Colorize as _;
use osfloor_core::{run_sync, PolicyClient, ReleaseFeedReader, SyncOutcome, SyncReport, SyncSettings};

use super::{load_config, runtime, token_source};
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, dry_run: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    config.validate()?;

    let policies = PolicyClient::new(&config.graph.base_url, token_source(global))?;
    let feed = ReleaseFeedReader::new(config.feed.url.clone(), config.title_filter())?;
    let settings = SyncSettings::from_config(&config, dry_run);

    let report = runtime()?.block_on(run_sync(&settings, &policies, &feed, chrono::Local::now()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SyncReport) {
    let name = if report.display_name.is_empty() {
        report.policy_id.as_str()
    } else {
        report.display_name.as_str()
    };

    if let Some(title) = &report.announcement {
        println!("{} {title}", "Latest release:".bold());
    }

    match &report.outcome {
        SyncOutcome::NoAnnouncement => {
            println!("{}", "No matching release announcement found; nothing to do.".yellow());
        }
        SyncOutcome::NoBuildNumber { title } => {
            println!(
                "{}",
                format!("No x.y.z build number in \"{title}\"; nothing to do.").yellow()
            );
        }
        SyncOutcome::AlreadyCurrent { version } => {
            println!("{}", format!("{name} already requires {version}.").green());
        }
        SyncOutcome::WouldUpdate { from, to } => {
            println!(
                "{}",
                format!("Dry run: would update {name} from {} to {to}.", display_version(from)).cyan()
            );
        }
        SyncOutcome::Updated { from, to } => {
            println!(
                "{}",
                format!("Updated {name}: {} -> {to}", display_version(from)).green().bold()
            );
        }
    }

    if !report.outcome.changed_remote() {
        println!("{}", "Policy left unchanged.".dimmed());
    }
}

fn display_version(version: &str) -> &str {
    if version.is_empty() {
        "(unset)"
    } else {
        version
    }
}
