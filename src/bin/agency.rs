// Runs the pet agency. The api channel is read as json lines from stdin, pipe
// the channel subscription into this binary.

use anyhow::Result;
use clap::Parser;
use futures::StreamExt;
use pet_agency::{
    application::{application::Application, config::configuration::Configuration},
    rctogether::events::entity_stream,
};
use tokio::io::BufReader;
use tokio::signal;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let configuration = Configuration::parse();

    // We get the logging setup first
    Application::install_logging(&configuration);
    info!("Pet Agency 🧞");

    let application = Application::initialize(configuration);
    let mut agency = application.open_agency().await?;
    debug!(genie_id = agency.genie().id, "agency initialized");

    let entities = entity_stream(BufReader::new(tokio::io::stdin()));
    tokio::pin!(entities);

    let mut result = Ok(());
    loop {
        tokio::select! {
            entity = entities.next() => {
                let Some(entity) = entity else {
                    info!("api channel is done");
                    break;
                };
                if let Err(err) = agency.handle_entity(entity).await {
                    error!(?err, "agency state went out of sync");
                    result = Err(err.into());
                    break;
                }
            }
            _ = signal::ctrl_c() => {
                debug!("Signal received, cleaning up...");
                break;
            }
        }
    }

    // let the pets finish whatever they were doing
    agency.close().await;
    result
}
