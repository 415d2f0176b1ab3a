use dirac_client::ProcessorClient;
use serde_json::json;

use super::Report;

pub async fn get_filter_state(client: &ProcessorClient) -> dirac_client::Result<Report> {
    let enabled = client.get_filter_state().await?;
    Ok(Report::new(
        format!("Filter state: {}", state_label(enabled)),
        json!({ "enabled": enabled }),
    ))
}

pub async fn set_filter_state(client: &ProcessorClient, enabled: bool) -> dirac_client::Result<Report> {
    client.set_filter_state(enabled).await?;
    Ok(Report::new(
        format!("Filter state set to: {}", enabled),
        json!({ "ok": true, "enabled": enabled }),
    ))
}

fn state_label(enabled: bool) -> &'static str {
    if enabled {
        "Enabled"
    } else {
        "Disabled"
    }
}
