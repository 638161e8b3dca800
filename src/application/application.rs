// Everything the binaries need to get going: configuration, logging and the
// client which talks to the world

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::agency::agency::{Agency, SharedClient};
use crate::rctogether::client::RestApiClient;

use super::{config::configuration::Configuration, logging::tracing::tracing_subscribe};

static LOGGER_INSTALLED: OnceCell<bool> = OnceCell::new();

#[derive(Clone)]
pub struct Application {
    pub config: Arc<Configuration>,
    pub client: SharedClient,
}

impl Application {
    pub fn initialize(config: Configuration) -> Self {
        debug!(endpoint = %config.endpoint, genie = %config.genie_name, "effective configuration");
        let client = RestApiClient::new(
            config.endpoint.to_owned(),
            config.app_id.to_owned(),
            config.app_secret.to_owned(),
        );
        Self {
            config: Arc::new(config),
            client: Arc::new(client),
        }
    }

    pub fn install_logging(config: &Configuration) {
        if let Some(true) = LOGGER_INSTALLED.get() {
            return;
        }

        if !tracing_subscribe(config) {
            warn!("Failed to install tracing_subscriber. There's probably one already...");
        };

        if color_eyre::install().is_err() {
            warn!("Failed to install color-eyre. Oh well...");
        };

        _ = LOGGER_INSTALLED.set(true);
    }

    pub async fn open_agency(&self) -> anyhow::Result<Agency> {
        let agency = Agency::create(
            self.client.clone(),
            self.config.agency_settings(),
            self.config.queue_settings(),
        )
        .await?;
        Ok(agency)
    }
}
