use std::error::Error;

use tracing::info;

use crate::api::service::fetch_banner;
use crate::core::config::ResolvedSettings;

pub async fn run_health(settings: ResolvedSettings) -> Result<(), Box<dyn Error>> {
    let client = reqwest::Client::new();
    match fetch_banner(&client, &settings.agent_url).await {
        Ok(banner) => {
            info!(agent_url = %settings.agent_url, "agent service reachable");
            println!("✅ {}: {}", settings.agent_url, banner.message);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Agent service at {} is unreachable: {e}", settings.agent_url);
            std::process::exit(1);
        }
    }
}
