use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use dirac_client::{ProcessorError, Slot, SpeakerLimits};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

fn bad_gateway(err: ProcessorError) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_GATEWAY,
        Json(ApiError {
            error: err.to_string(),
        }),
    )
}

/// Snapshot of everything the processor reports.
#[derive(Serialize)]
pub struct StatusResponse {
    pub slots: Vec<Slot>,
    pub active_slot: u32,
    pub speaker_gain: f64,
    pub filter_state: bool,
    pub speaker_limits: SpeakerLimits,
}

pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, (StatusCode, Json<ApiError>)> {
    let client = state.client();
    let slots = client.get_slots().await.map_err(bad_gateway)?;
    let active_slot = client.get_active_slot().await.map_err(bad_gateway)?;
    let speaker_gain = client.get_speaker_gain().await.map_err(bad_gateway)?;
    let filter_state = client.get_filter_state().await.map_err(bad_gateway)?;
    let speaker_limits = client.get_speaker_limits().await.map_err(bad_gateway)?;

    Ok(Json(StatusResponse {
        slots,
        active_slot,
        speaker_gain,
        filter_state,
        speaker_limits,
    }))
}
