use std::sync::Arc;

use dirac_client::{ProcessorClient, ProcessorError};

use crate::config::WebConfig;

/// Shared application state accessible by all handlers
pub struct AppState {
    client: ProcessorClient,
    config: WebConfig,
}

impl AppState {
    /// Build the processor client for `config.dirac_url`.
    ///
    /// Fails with a configuration error when the URL has no http(s) scheme.
    pub fn new(config: WebConfig) -> Result<Arc<Self>, ProcessorError> {
        let client = match config.timeout {
            Some(timeout) => ProcessorClient::with_timeout(&config.dirac_url, timeout)?,
            None => ProcessorClient::new(&config.dirac_url)?,
        };
        Ok(Arc::new(Self { client, config }))
    }

    pub fn client(&self) -> &ProcessorClient {
        &self.client
    }

    pub fn config(&self) -> &WebConfig {
        &self.config
    }
}
