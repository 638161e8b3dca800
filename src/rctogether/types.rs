//! Wire records for the RC Together API, these are the shapes which come over
//! the REST endpoints and the api channel.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

pub type EntityId = u64;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Chebyshev adjacency, a position counts as adjacent to itself
    pub fn is_adjacent(&self, other: &Position) -> bool {
        (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }

    /// One of the 8 cells surrounding this position, picked at random
    pub fn random_neighbour(&self) -> Self {
        let (dx, dy) = NEIGHBOUR_DELTAS[thread_rng().gen_range(0..NEIGHBOUR_DELTAS.len())];
        self.offset(dx, dy)
    }
}

const NEIGHBOUR_DELTAS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid position `{0}`, expected `x,y`")]
pub struct ParsePositionError(String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| ParsePositionError(s.to_owned()))?;
        let x = x
            .trim()
            .parse()
            .map_err(|_| ParsePositionError(s.to_owned()))?;
        let y = y
            .trim()
            .parse()
            .map_err(|_| ParsePositionError(s.to_owned()))?;
        Ok(Self { x, y })
    }
}

/// A message as attached to an avatar or bot, bots keep the last message they
/// sent around which is how we remember who a pet belongs to
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageRecord {
    #[serde(default)]
    pub mentioned_entity_ids: Vec<EntityId>,
    pub sent_at: DateTime<Utc>,
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BotRecord {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    pub pos: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AvatarRecord {
    pub id: EntityId,
    pub person_name: String,
    pub pos: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageRecord>,
}

/// Everything the api channel streams at us, we only care about people and
/// bots, the rest of the world (notes, walls, links) is ignored
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Entity {
    Avatar(AvatarRecord),
    Bot(BotRecord),
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CreateBot {
    pub name: String,
    pub emoji: String,
    pub x: i64,
    pub y: i64,
    pub direction: String,
    pub can_be_mentioned: bool,
}

impl CreateBot {
    pub fn new(name: String, emoji: String, position: Position, can_be_mentioned: bool) -> Self {
        Self {
            name,
            emoji,
            x: position.x,
            y: position.y,
            direction: "right".to_owned(),
            can_be_mentioned,
        }
    }
}

/// Partial update for a bot, only the fields which are set get sent over
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BotUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl BotUpdate {
    pub fn moved_to(position: Position) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Default::default()
        }
    }

    pub fn renamed(name: String) -> Self {
        Self {
            name: Some(name),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn position(&self) -> Option<Position> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Position { x, y }),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.name.is_none() && self.emoji.is_none()
    }
}
