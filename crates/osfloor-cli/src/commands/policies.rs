use osfloor_core::{Platform, PolicyClient};

use super::{load_config, runtime, token_source};
use crate::GlobalArgs;

pub fn run(
    global: &GlobalArgs,
    platform: Option<Platform>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let client = PolicyClient::new(&config.graph.base_url, token_source(global))?;
    let policies = runtime()?.block_on(client.list_policies(platform))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&policies)?);
        return Ok(());
    }

    if policies.is_empty() {
        println!("No compliance policies found.");
        return Ok(());
    }

    for p in &policies {
        let marker = if p.id == config.graph.policy_id { "*" } else { " " };
        let platform = p.platform().map(|pl| pl.as_str()).unwrap_or("-");
        let version = p.os_minimum_version.as_deref().unwrap_or("-");
        println!("{marker} {:<38} {:<8} {:<10} {}", p.id, platform, version, p.display_name);
    }
    Ok(())
}
