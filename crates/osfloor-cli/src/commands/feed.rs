use colored::Colorize as _;
use osfloor_core::version::extract_build;
use osfloor_core::ReleaseFeedReader;
use serde_json::json;

use super::{load_config, runtime};
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let reader = ReleaseFeedReader::new(config.feed.url.clone(), config.title_filter())?;
    let latest = runtime()?.block_on(reader.latest())?;

    if as_json {
        let build = latest.as_ref().and_then(|a| extract_build(&a.title));
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "filter": reader.filter(),
                "announcement": latest,
                "build": build,
            }))?
        );
        return Ok(());
    }

    let filter = reader.filter();
    println!(
        "{} include [{}], exclude [{}]",
        "Filter:".bold(),
        filter.include.join(", "),
        filter.exclude.join(", ")
    );

    match latest {
        Some(announcement) => {
            println!("{} {}", "Title:".bold(), announcement.title);
            if let Some(published) = &announcement.published {
                println!("{} {published}", "Published:".bold());
            }
            if let Some(link) = &announcement.link {
                println!("{} {link}", "Link:".bold());
            }
            match extract_build(&announcement.title) {
                Some(build) => println!("{} {}", "Build:".bold(), build.green()),
                None => println!("{} {}", "Build:".bold(), "none".yellow()),
            }
        }
        None => println!("{}", "No matching release announcement found.".yellow()),
    }
    Ok(())
}
