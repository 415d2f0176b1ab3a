use dirac_client::{ProcessorClient, Slot};
use serde_json::json;

use super::Report;

pub async fn get_slots(client: &ProcessorClient) -> dirac_client::Result<Report> {
    let slots = client.get_slots().await?;
    Ok(Report::new(format_slots(&slots), json!(slots)))
}

pub async fn get_active_slot(client: &ProcessorClient) -> dirac_client::Result<Report> {
    let index = client.get_active_slot().await?;
    Ok(Report::new(
        format!("Active slot index: {}", index),
        json!({ "index": index }),
    ))
}

pub async fn set_active_slot(client: &ProcessorClient, index: u32) -> dirac_client::Result<Report> {
    client.set_active_slot(index).await?;
    Ok(Report::new(
        format!("Active slot set to: {}", index),
        json!({ "ok": true, "index": index }),
    ))
}

fn format_slots(slots: &[Slot]) -> String {
    let mut out = String::from("Slots:");
    for slot in slots {
        out.push_str(&format!(
            "\n  [{}] {} ({})",
            slot.index, slot.name, slot.filter_type
        ));
        if slot.is_trial {
            out.push_str(" [trial]");
        }
    }
    out
}
