use serde::{Deserialize, Serialize};

/// Per-channel gain and delay applied by a filter slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainDelay {
    pub index: u32,
    pub gain_db: f64,
    pub delay_ms: f64,
}

/// A saved filter configuration on the processor, addressed by `index`.
///
/// Slot indexes are non-negative; a negative index on the wire fails to
/// decode and surfaces as a decode error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub index: u32,
    pub name: String,
    pub description: String,
    pub filter_type: String,
    pub is_trial: bool,
    pub path: String,
    pub gains_delays: Vec<GainDelay>,
}

/// Advertised range for speaker gain. Advisory only; the processor validates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub units: String,
}

// --- Wire envelopes ---

/// Same `u32` narrowing as [`Slot::index`].
#[derive(Debug, Deserialize)]
pub(crate) struct ActiveSlotResponse {
    pub index: u32,
}

/// `enabled` is an integer on the wire; only `1` means enabled.
#[derive(Debug, Deserialize)]
pub(crate) struct FilteringResponse {
    pub enabled: i64,
}

impl FilteringResponse {
    pub fn is_enabled(&self) -> bool {
        self.enabled == 1
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpeakerGainResponse {
    pub gain: f64,
}
