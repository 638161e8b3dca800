// Maintenance chores for the agency which don't need it running

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pet_agency::{
    agency::{
        content::Content,
        maintenance::{reset_agency, restore_emoji, save_bots},
    },
    application::{application::Application, config::configuration::Configuration},
};
use tracing::info;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Admin {
    #[clap(flatten)]
    configuration: Configuration,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every bot in the world as json
    Save,
    /// Delete every pet nobody has adopted, the genie stays
    Reset,
    /// Give pets which changed their looks their original emoji back
    RestoreEmoji {
        #[clap(long, default_value_t = 200)]
        /// Pause between two writes
        pace_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let admin = Admin::parse();
    Application::install_logging(&admin.configuration);
    let application = Application::initialize(admin.configuration);
    let client = application.client.as_ref();

    match admin.command {
        Command::Save => println!("{}", save_bots(client).await?),
        Command::Reset => {
            let deleted = reset_agency(client).await?;
            info!(deleted = deleted.len(), "agency reset");
        }
        Command::RestoreEmoji { pace_ms } => {
            let restored =
                restore_emoji(client, &Content::default(), Duration::from_millis(pace_ms)).await?;
            info!(restored = restored.len(), "emoji restored");
        }
    }
    Ok(())
}
