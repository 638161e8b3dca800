//! The api channel delivers envelopes of entities, we read them as newline
//! delimited json so anything which can pipe the channel (a websocket bridge,
//! a recorded session file) can drive the agency

use futures::Stream;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use super::types::Entity;

#[derive(Deserialize, Debug)]
struct ChannelMessage {
    #[serde(rename = "type")]
    kind: String,
    payload: serde_json::Value,
}

#[derive(Deserialize, Debug)]
struct WorldPayload {
    #[serde(default)]
    entities: Vec<serde_json::Value>,
}

/// Parses a single line from the channel, a `world` message carries the whole
/// world at once while every other message carries a single entity. One odd
/// entity in the world doesn't cost us the rest of it.
pub fn parse_channel_line(line: &str) -> Result<Vec<Entity>, serde_json::Error> {
    let message: ChannelMessage = serde_json::from_str(line)?;
    if message.kind == "world" {
        let world: WorldPayload = serde_json::from_value(message.payload)?;
        Ok(world
            .entities
            .into_iter()
            .filter_map(|entity| match serde_json::from_value(entity) {
                Ok(entity) => Some(entity),
                Err(err) => {
                    warn!(?err, "skipping malformed entity in world snapshot");
                    None
                }
            })
            .collect())
    } else {
        Ok(vec![serde_json::from_value(message.payload)?])
    }
}

pub fn entity_stream<R>(reader: R) -> impl Stream<Item = Entity>
where
    R: AsyncBufRead + Unpin,
{
    async_stream::stream! {
        let mut lines = reader.lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("api channel closed");
                    break;
                }
                Err(err) => {
                    warn!(?err, "failed to read from the api channel");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_channel_line(&line) {
                Ok(entities) => {
                    for entity in entities {
                        yield entity;
                    }
                }
                Err(err) => warn!(?err, %line, "skipping malformed channel message"),
            }
        }
    }
}
