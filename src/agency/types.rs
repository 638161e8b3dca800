use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

use crate::rctogether::types::{AvatarRecord, BotRecord, EntityId, Position};

/// Axis aligned rectangle, both corners are inside the region
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub top_left: Position,
    pub bottom_right: Position,
}

impl Region {
    pub fn new(top_left: Position, bottom_right: Position) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    pub fn contains(&self, point: &Position) -> bool {
        self.top_left.x <= point.x
            && point.x <= self.bottom_right.x
            && self.top_left.y <= point.y
            && point.y <= self.bottom_right.y
    }

    pub fn random_point(&self) -> Position {
        let mut rng = thread_rng();
        Position {
            x: rng.gen_range(self.top_left.x..=self.bottom_right.x),
            y: rng.gen_range(self.top_left.y..=self.bottom_right.y),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.top_left, self.bottom_right)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseRegionError {
    #[error("invalid region `{0}`, expected `x1,y1:x2,y2`")]
    Format(String),
    #[error("region `{0}` has its corners the wrong way around")]
    Inverted(String),
}

impl FromStr for Region {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (top_left, bottom_right) = s
            .split_once(':')
            .ok_or_else(|| ParseRegionError::Format(s.to_owned()))?;
        let top_left: Position = top_left
            .parse()
            .map_err(|_| ParseRegionError::Format(s.to_owned()))?;
        let bottom_right: Position = bottom_right
            .parse()
            .map_err(|_| ParseRegionError::Format(s.to_owned()))?;
        if top_left.x > bottom_right.x || top_left.y > bottom_right.y {
            return Err(ParseRegionError::Inverted(s.to_owned()));
        }
        Ok(Self::new(top_left, bottom_right))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub id: EntityId,
    pub name: String,
    pub emoji: String,
    pub pos: Position,
    pub owner: Option<EntityId>,
    pub in_day_care: bool,
}

impl Pet {
    /// Rebuilds a pet from what the server knows about the bot. Pets always
    /// talk to their owner, so the last message tells us who that is, and the
    /// day care drop off line asks the owner not to forget them.
    pub fn from_record(record: BotRecord) -> Self {
        let (owner, in_day_care) = match &record.message {
            Some(message) => (
                message.mentioned_entity_ids.first().copied(),
                message.text.contains("forget"),
            ),
            None => (None, false),
        };
        Self {
            id: record.id,
            name: record.name,
            emoji: record.emoji,
            pos: record.pos,
            owner,
            in_day_care,
        }
    }

    /// The species is always the last word of the name, "Faker's rocket" is
    /// still a rocket
    pub fn species(&self) -> &str {
        self.name.split(' ').last().unwrap_or_default()
    }

    /// Pets which get bored go wander, only owned pets outside of day care
    pub fn wanders(&self) -> bool {
        self.owner.is_some() && !self.in_day_care
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvatarMessage {
    pub recipients: Vec<EntityId>,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub id: EntityId,
    pub name: String,
    pub pos: Position,
    pub message: Option<AvatarMessage>,
}

impl From<AvatarRecord> for Avatar {
    fn from(record: AvatarRecord) -> Self {
        Self {
            id: record.id,
            name: record.person_name,
            pos: record.pos,
            message: record.message.map(|message| AvatarMessage {
                recipients: message.mentioned_entity_ids,
                text: message.text,
                sent_at: message.sent_at,
            }),
        }
    }
}

impl Avatar {
    pub fn owned_pet_name(&self, pet: &Pet) -> String {
        format!("{}'s {}", self.name, pet.species())
    }
}
