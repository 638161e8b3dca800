use crate::rctogether::types::{BotUpdate, EntityId, Position};

use super::content::Species;

/// Something we want to happen out in the world, the sync logic only ever
/// describes these and the agency goes and makes them happen, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SendMessage {
        /// name of the person we are talking to
        recipient: String,
        text: String,
        /// who is talking, the genie when not set
        sender: Option<EntityId>,
    },
    /// Goes through the pet's update queue
    UpdatePet { pet_id: EntityId, update: BotUpdate },
    /// Written straight away, skipping the queue
    SyncUpdatePet { pet_id: EntityId, update: BotUpdate },
    DeletePet { pet_id: EntityId },
    CreatePet { species: Species, position: Position },
}

impl Effect {
    pub fn message(recipient: &str, text: impl Into<String>) -> Self {
        Effect::SendMessage {
            recipient: recipient.to_owned(),
            text: text.into(),
            sender: None,
        }
    }

    pub fn message_from(recipient: &str, text: impl Into<String>, sender: EntityId) -> Self {
        Effect::SendMessage {
            recipient: recipient.to_owned(),
            text: text.into(),
            sender: Some(sender),
        }
    }
}

/// What a command handler hands back, either a plain answer for whoever asked
/// or the effects to run
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Effects(Vec<Effect>),
}

impl Reply {
    pub fn into_effects(self, requester: &str) -> Vec<Effect> {
        match self {
            Reply::Text(text) => vec![Effect::message(requester, text)],
            Reply::Effects(effects) => effects,
        }
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Text(text.to_owned())
    }
}

impl From<Vec<Effect>> for Reply {
    fn from(effects: Vec<Effect>) -> Self {
        Reply::Effects(effects)
    }
}
