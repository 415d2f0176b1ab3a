use dirac_client::{ProcessorClient, SpeakerLimits};
use serde_json::json;

use super::Report;

pub async fn get_speaker_limits(client: &ProcessorClient) -> dirac_client::Result<Report> {
    let limits = client.get_speaker_limits().await?;
    Ok(Report::new(format_limits(&limits), json!(limits)))
}

pub async fn get_speaker_gain(client: &ProcessorClient) -> dirac_client::Result<Report> {
    let gain = client.get_speaker_gain().await?;
    Ok(Report::new(
        format!("Speaker gain: {}", gain),
        json!({ "gain": gain }),
    ))
}

/// The value goes to the processor as given; it enforces its own limits.
pub async fn set_speaker_gain(client: &ProcessorClient, gain: f64) -> dirac_client::Result<Report> {
    client.set_speaker_gain(gain).await?;
    Ok(Report::new(
        format!("Speaker gain set to: {}", gain),
        json!({ "ok": true, "gain": gain }),
    ))
}

fn format_limits(limits: &SpeakerLimits) -> String {
    format!(
        "Speaker limits: min={} max={} step={} units={}",
        limits.min, limits.max, limits.step, limits.units
    )
}
