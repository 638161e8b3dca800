//! In memory client which records every request in the order it was made,
//! this is what the agency tests run against

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

use async_trait::async_trait;

use super::client::WorldClient;
use super::errors::RcTogetherError;
use super::types::{BotRecord, BotUpdate, CreateBot, EntityId, Position};

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Create(CreateBot),
    Update(EntityId, BotUpdate),
    Delete(EntityId),
    Message(EntityId, String),
}

pub struct RecordingClient {
    bots: Vec<BotRecord>,
    requests: Mutex<Vec<Request>>,
    next_id: AtomicU64,
    fail_updates: bool,
    fail_creates: bool,
}

impl RecordingClient {
    pub fn new(bots: Vec<BotRecord>) -> Self {
        let next_id = bots.iter().map(|bot| bot.id).max().unwrap_or(0) + 1000;
        Self {
            bots,
            requests: Mutex::new(vec![]),
            next_id: AtomicU64::new(next_id),
            fail_updates: false,
            fail_creates: false,
        }
    }

    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    pub fn failing_creates(mut self) -> Self {
        self.fail_creates = true;
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().expect("lock to work").clone()
    }

    fn record(&self, request: Request) {
        self.requests.lock().expect("lock to work").push(request);
    }
}

#[async_trait]
impl WorldClient for RecordingClient {
    async fn list_bots(&self) -> Result<Vec<BotRecord>, RcTogetherError> {
        Ok(self.bots.clone())
    }

    async fn create_bot(&self, bot: CreateBot) -> Result<BotRecord, RcTogetherError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = BotRecord {
            id,
            name: bot.name.clone(),
            emoji: bot.emoji.clone(),
            pos: Position::new(bot.x, bot.y),
            message: None,
        };
        self.record(Request::Create(bot));
        if self.fail_creates {
            return Err(RcTogetherError::Http {
                status: 403,
                body: "nope".to_owned(),
            });
        }
        Ok(record)
    }

    async fn update_bot(
        &self,
        bot_id: EntityId,
        update: &BotUpdate,
    ) -> Result<(), RcTogetherError> {
        self.record(Request::Update(bot_id, update.clone()));
        if self.fail_updates {
            return Err(RcTogetherError::Http {
                status: 500,
                body: "nope".to_owned(),
            });
        }
        Ok(())
    }

    async fn delete_bot(&self, bot_id: EntityId) -> Result<(), RcTogetherError> {
        self.record(Request::Delete(bot_id));
        Ok(())
    }

    async fn send_message(&self, bot_id: EntityId, text: &str) -> Result<(), RcTogetherError> {
        self.record(Request::Message(bot_id, text.to_owned()));
        Ok(())
    }
}
