//! The agency proper, it feeds what happens in the world into the sync logic
//! and makes the effects which come out of it happen through the client

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::rctogether::client::WorldClient;
use crate::rctogether::errors::RcTogetherError;
use crate::rctogether::types::{BotUpdate, CreateBot, Entity, EntityId, Position};
use crate::scheduler::update_queues::{QueueSettings, UpdateConsumer, UpdateQueues};

use super::content::{Species, GENIE_EMOJI};
use super::directory::PetDirectory;
use super::effects::Effect;
use super::errors::AgencyError;
use super::sync::{AgencySettings, AgencySync};
use super::types::{Avatar, Pet, Region};

pub type SharedClient = Arc<dyn WorldClient + Send + Sync>;

/// Writes queued pet updates and sends bored pets off to the corral
pub struct PetUpdater {
    client: SharedClient,
    /// pet id to whether the pet may wander, kept up to date by the agency
    wanderers: Arc<scc::HashMap<EntityId, bool>>,
    corral: Region,
}

#[async_trait]
impl UpdateConsumer<EntityId, BotUpdate> for PetUpdater {
    type Error = RcTogetherError;

    async fn apply(&self, pet_id: &EntityId, update: BotUpdate) -> Result<(), RcTogetherError> {
        self.client.update_bot(*pet_id, &update).await
    }

    fn idle_update(&self, pet_id: &EntityId) -> Option<BotUpdate> {
        let wanders = self
            .wanderers
            .read(pet_id, |_, wanders| *wanders)
            .unwrap_or_default();
        wanders.then(|| BotUpdate::moved_to(self.corral.random_point()))
    }
}

pub struct Agency {
    client: SharedClient,
    genie: Pet,
    sync: AgencySync,
    /// mentions sent at or before this have been dealt with already
    processed_message_dt: DateTime<Utc>,
    pet_update_queues: UpdateQueues<EntityId, BotUpdate, PetUpdater>,
    wanderers: Arc<scc::HashMap<EntityId, bool>>,
}

impl Agency {
    /// Picks up every bot which is already out there, the genie included. If
    /// there is no genie yet we summon one.
    pub async fn create(
        client: SharedClient,
        settings: AgencySettings,
        queue_settings: QueueSettings,
    ) -> Result<Self, AgencyError> {
        let mut genie = None;
        let mut pet_directory = PetDirectory::new(settings.spawn_points.clone());

        for bot in client.list_bots().await? {
            if bot.emoji == GENIE_EMOJI {
                info!(genie_id = bot.id, name = %bot.name, "found the genie");
                genie = Some(Pet::from_record(bot));
            } else {
                pet_directory.add(Pet::from_record(bot));
            }
        }

        let genie = match genie {
            Some(genie) => genie,
            None => {
                let bot = client
                    .create_bot(CreateBot::new(
                        settings.genie_name.to_owned(),
                        GENIE_EMOJI.to_owned(),
                        settings.genie_home,
                        true,
                    ))
                    .await?;
                info!(genie_id = bot.id, "summoned a new genie");
                Pet::from_record(bot)
            }
        };

        info!(
            pets = pet_directory.len(),
            available = pet_directory.available().len(),
            "agency is open"
        );

        let wanderers = Arc::new(scc::HashMap::default());
        let updater = PetUpdater {
            client: client.clone(),
            wanderers: wanderers.clone(),
            corral: settings.corral,
        };
        let sync = AgencySync::new(settings, genie.id, pet_directory)?;

        let agency = Self {
            client,
            genie,
            sync,
            processed_message_dt: Utc::now(),
            pet_update_queues: UpdateQueues::new(Arc::new(updater), queue_settings),
            wanderers,
        };
        agency.refresh_wanderers();
        Ok(agency)
    }

    pub fn genie(&self) -> &Pet {
        &self.genie
    }

    pub fn pet_directory(&self) -> &PetDirectory {
        self.sync.pet_directory()
    }

    pub async fn handle_entity(&mut self, entity: Entity) -> Result<(), AgencyError> {
        match entity {
            Entity::Avatar(record) => {
                let avatar = Avatar::from(record);
                self.sync.observe_avatar(&avatar);

                if let Some(message) = avatar.message.clone() {
                    if message.recipients.contains(&self.genie.id)
                        && message.sent_at > self.processed_message_dt
                    {
                        debug!(from = %avatar.name, text = %message.text, "genie was mentioned");
                        let effects = self.sync.handle_mention(
                            &avatar,
                            &message.text,
                            &message.recipients,
                            Utc::now(),
                        )?;
                        self.apply_effects(effects).await;
                        self.processed_message_dt = message.sent_at;
                    }
                }

                let effects = self.sync.handle_avatar_move(&avatar, Utc::now())?;
                self.apply_effects(effects).await;
            }
            Entity::Bot(record) => self.sync.handle_bot(&record)?,
            Entity::Unknown => {}
        }
        self.refresh_wanderers();
        Ok(())
    }

    async fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.apply_effect(effect).await;
        }
    }

    async fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SendMessage {
                recipient,
                text,
                sender,
            } => self.send_message(&recipient, &text, sender).await,
            Effect::UpdatePet { pet_id, update } => {
                self.pet_update_queues.add_task(pet_id, Some(update));
            }
            Effect::SyncUpdatePet { pet_id, update } => {
                if let Err(err) = self.client.update_bot(pet_id, &update).await {
                    error!(pet_id, ?err, "failed to update pet");
                }
            }
            Effect::DeletePet { pet_id } => self.delete_pet(pet_id).await,
            Effect::CreatePet { species, position } => self.spawn_pet(species, position).await,
        }
    }

    async fn send_message(&self, recipient: &str, text: &str, sender: Option<EntityId>) {
        let sender = sender.unwrap_or(self.genie.id);
        let text = format!("@**{}** {}", recipient, text);
        if let Err(err) = self.client.send_message(sender, &text).await {
            error!(sender, ?err, "failed to send message");
        }
    }

    async fn delete_pet(&mut self, pet_id: EntityId) {
        self.pet_update_queues.add_task(pet_id, None);
        let _ = self.wanderers.remove(&pet_id);
        if let Err(err) = self.client.delete_bot(pet_id).await {
            error!(pet_id, ?err, "failed to delete pet");
        }
    }

    async fn spawn_pet(&mut self, species: Species, position: Position) {
        let bot = CreateBot::new(species.name, species.emoji, position, false);
        match self.client.create_bot(bot).await {
            Ok(record) => {
                debug!(pet_id = record.id, name = %record.name, %position, "new pet in stock");
                self.sync.handle_created(Pet::from_record(record));
            }
            Err(err) => error!(%position, ?err, "failed to create pet"),
        }
    }

    fn refresh_wanderers(&self) {
        for (pet_id, wanders) in self.sync.wander_states() {
            match self.wanderers.entry(pet_id) {
                scc::hash_map::Entry::Occupied(mut value) => *value.get_mut() = wanders,
                scc::hash_map::Entry::Vacant(vacant) => {
                    vacant.insert_entry(wanders);
                }
            }
        }
    }

    /// Lets every pending pet update go out before we stop
    pub async fn close(&mut self) {
        info!(
            pipelines = self.pet_update_queues.pipelines(),
            "closing the agency"
        );
        self.pet_update_queues.close().await;
    }
}
