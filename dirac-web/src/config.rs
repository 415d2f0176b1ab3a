use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_NAME: &str = "Dirac Live";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Web adapter configuration, resolved once at startup and passed to
/// [`AppState::new`](crate::state::AppState::new).
#[derive(Debug, Clone, PartialEq)]
pub struct WebConfig {
    /// Title shown on the control page.
    pub name: String,
    /// Base URL of the processor API.
    pub dirac_url: String,
    pub host: String,
    pub port: u16,
    /// Companion CamillaDSP UI, linked from the page when set.
    pub camilla_url: Option<String>,
    /// Companion level meter UI, linked from the page when set.
    pub uvmeter_url: Option<String>,
    /// Per-request timeout for processor calls. `None` keeps transport defaults.
    pub timeout: Option<Duration>,
}

impl WebConfig {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from a variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let dirac_url = match var("DIRAC_URL") {
            Some(url) => url,
            None => bail!("DIRAC_URL is required (set it in the environment or .env)"),
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("invalid PORT '{}'", raw))?,
            None => DEFAULT_PORT,
        };

        let timeout = match var("DIRAC_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<f64>()
                    .with_context(|| format!("invalid DIRAC_TIMEOUT_SECS '{}'", raw))?;
                if !secs.is_finite() || secs <= 0.0 {
                    bail!("DIRAC_TIMEOUT_SECS must be a positive number, got '{}'", raw);
                }
                let timeout = Duration::try_from_secs_f64(secs)
                    .with_context(|| format!("DIRAC_TIMEOUT_SECS '{}' is out of range", raw))?;
                Some(timeout)
            }
            None => None,
        };

        Ok(Self {
            name: var("NAME").unwrap_or_else(|| DEFAULT_NAME.to_string()),
            dirac_url,
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            camilla_url: var("CAMILLA_URL"),
            uvmeter_url: var("UVMETER_URL"),
            timeout,
        })
    }

    /// Address the HTTP server binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
