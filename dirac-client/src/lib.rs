//! Client for the Dirac Live processor REST API
//!
//! This crate wraps the processor's control endpoints (filter slots,
//! active slot, filter state, speaker gain) in a typed async client.
//! Used by both dirac-web (web control page) and dirac-cli.

pub mod client;
pub mod error;
pub mod types;

pub use client::ProcessorClient;
pub use error::{ProcessorError, Result};
pub use types::{GainDelay, Slot, SpeakerLimits};
