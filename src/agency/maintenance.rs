//! One off chores for whoever runs the agency, none of these go through the
//! agency itself, they talk straight to the world

use std::time::Duration;

use tracing::{info, warn};

use crate::rctogether::client::WorldClient;
use crate::rctogether::errors::RcTogetherError;
use crate::rctogether::types::{BotUpdate, EntityId};

use super::content::{Content, GENIE_EMOJI};

/// Species we don't stock any more but which still live with their owners
const RETIRED_SPECIES: &[(&str, &str)] = &[("sheep", "🐑"), ("duck", "🦆")];

/// Every bot as the server sees it, pretty printed
pub async fn save_bots(client: &(dyn WorldClient + Send + Sync)) -> Result<String, RcTogetherError> {
    let bots = client.list_bots().await?;
    Ok(serde_json::to_string_pretty(&bots)?)
}

/// Clears out the stock. The genie stays and so does every pet which has said
/// something, pets only talk once they have an owner.
pub async fn reset_agency(
    client: &(dyn WorldClient + Send + Sync),
) -> Result<Vec<EntityId>, RcTogetherError> {
    let mut deleted = vec![];
    for bot in client.list_bots().await? {
        if bot.emoji == GENIE_EMOJI || bot.message.is_some() {
            continue;
        }
        info!(bot_id = bot.id, name = %bot.name, "deleting bot");
        client.delete_bot(bot.id).await?;
        deleted.push(bot.id);
    }
    Ok(deleted)
}

/// Puts back the emoji of every pet which no longer looks like the species in
/// its name
pub async fn restore_emoji(
    client: &(dyn WorldClient + Send + Sync),
    content: &Content,
    pace: Duration,
) -> Result<Vec<EntityId>, RcTogetherError> {
    let mut restored = vec![];
    for bot in client.list_bots().await? {
        if bot.emoji == GENIE_EMOJI {
            continue;
        }
        let species = bot.name.split(' ').last().unwrap_or_default();
        let original = content
            .species_named(species)
            .map(|species| species.emoji.as_str())
            .or_else(|| {
                RETIRED_SPECIES
                    .iter()
                    .find(|(name, _)| *name == species)
                    .map(|(_, emoji)| *emoji)
            });

        let Some(original) = original else {
            warn!(bot_id = bot.id, name = %bot.name, "original emoji unavailable");
            continue;
        };
        if original == bot.emoji {
            continue;
        }

        info!(bot_id = bot.id, species, from = %bot.emoji, to = original, "restoring emoji");
        let update = BotUpdate {
            emoji: Some(original.to_owned()),
            ..Default::default()
        };
        client.update_bot(bot.id, &update).await?;
        restored.push(bot.id);
        tokio::time::sleep(pace).await;
    }
    Ok(restored)
}
