//! The client which talks to the RC Together REST api, everything the agency
//! wants to change in the world goes through the `WorldClient` trait so we can
//! swap it out when testing

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::errors::RcTogetherError;
use super::types::{BotRecord, BotUpdate, CreateBot, EntityId};

#[async_trait]
pub trait WorldClient {
    async fn list_bots(&self) -> Result<Vec<BotRecord>, RcTogetherError>;

    async fn create_bot(&self, bot: CreateBot) -> Result<BotRecord, RcTogetherError>;

    async fn update_bot(&self, bot_id: EntityId, update: &BotUpdate)
        -> Result<(), RcTogetherError>;

    async fn delete_bot(&self, bot_id: EntityId) -> Result<(), RcTogetherError>;

    async fn send_message(&self, bot_id: EntityId, text: &str) -> Result<(), RcTogetherError>;
}

pub struct RestApiClient {
    pub client: reqwest::Client,
    pub endpoint: String,
    app_id: String,
    app_secret: String,
}

#[derive(serde::Serialize)]
struct BotEnvelope<'a, T> {
    bot: &'a T,
}

#[derive(serde::Serialize)]
struct MessageRequest<'a> {
    bot_id: EntityId,
    text: &'a str,
}

impl RestApiClient {
    pub fn new(endpoint: String, app_id: String, app_secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            app_id,
            app_secret,
        }
    }

    pub fn api_url(&self, resource: &str, resource_id: Option<EntityId>) -> String {
        let resource = match resource_id {
            Some(resource_id) => format!("{}/{}", resource, resource_id),
            None => resource.to_owned(),
        };
        format!(
            "https://{}/api/{}?app_id={}&app_secret={}",
            self.endpoint, resource, self.app_id, self.app_secret
        )
    }

    async fn check_response(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, RcTogetherError> {
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(RcTogetherError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RcTogetherError> {
        let response = Self::check_response(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl WorldClient for RestApiClient {
    async fn list_bots(&self) -> Result<Vec<BotRecord>, RcTogetherError> {
        let response = self.client.get(self.api_url("bots", None)).send().await?;
        Self::parse_response(response).await
    }

    async fn create_bot(&self, bot: CreateBot) -> Result<BotRecord, RcTogetherError> {
        debug!(name = %bot.name, x = bot.x, y = bot.y, "creating bot");
        let response = self
            .client
            .post(self.api_url("bots", None))
            .json(&BotEnvelope { bot: &bot })
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn update_bot(
        &self,
        bot_id: EntityId,
        update: &BotUpdate,
    ) -> Result<(), RcTogetherError> {
        let response = self
            .client
            .patch(self.api_url("bots", Some(bot_id)))
            .json(&BotEnvelope { bot: update })
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn delete_bot(&self, bot_id: EntityId) -> Result<(), RcTogetherError> {
        let response = self
            .client
            .delete(self.api_url("bots", Some(bot_id)))
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn send_message(&self, bot_id: EntityId, text: &str) -> Result<(), RcTogetherError> {
        let response = self
            .client
            .post(self.api_url("messages", None))
            .json(&MessageRequest { bot_id, text })
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }
}
