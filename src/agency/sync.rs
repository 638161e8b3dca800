//! The rules of the agency. Everything in here works on the in-memory state
//! and answers with effects, nothing in here talks to the outside world which
//! keeps all of it testable without a server.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::thread_rng;
use tracing::debug;

use crate::rctogether::types::{BotRecord, BotUpdate, EntityId, Position};

use super::content::{a_an, upfirst, Content};
use super::directory::PetDirectory;
use super::effects::{Effect, Reply};
use super::errors::DirectoryError;
use super::lure::LureTracker;
use super::parser::{CommandKind, CommandParser, ParsedCommand};
use super::types::{Avatar, Pet, Region};

const NOT_UNDERSTOOD: &str = "Sorry, I don't understand. Would you like to adopt a pet?";
const OUT_OF_STOCK: &str =
    "Sorry, we don't have any pets at the moment, perhaps it's time to restock?";

#[derive(Debug, Clone)]
pub struct AgencySettings {
    pub genie_name: String,
    pub genie_home: Position,
    pub spawn_points: Vec<Position>,
    pub day_care_center: Region,
    /// where neglected pets go wander
    pub corral: Region,
    pub lure_duration: Duration,
    pub content: Content,
}

/// Everything a command handler gets to look at
pub struct CommandContext<'a> {
    pub requester: &'a Avatar,
    pub command: &'a ParsedCommand,
    pub text: &'a str,
    /// people mentioned in the message, the genie is already filtered out
    pub mentioned: &'a [EntityId],
    pub now: DateTime<Utc>,
}

impl CommandContext<'_> {
    fn species(&self) -> &str {
        self.command.species.as_deref().unwrap_or_default()
    }
}

type HandlerResult = Result<Reply, DirectoryError>;
type Handler = fn(&mut AgencySync, &CommandContext<'_>) -> HandlerResult;

fn handler_for(kind: CommandKind) -> Handler {
    match kind {
        CommandKind::Restock => AgencySync::handle_restock,
        CommandKind::Adoption => AgencySync::handle_adoption,
        CommandKind::DayCareDropOff => AgencySync::handle_day_care_drop_off,
        CommandKind::DayCarePickUp => AgencySync::handle_day_care_pick_up,
        CommandKind::Thanks => AgencySync::handle_thanks,
        CommandKind::Abandon => AgencySync::handle_abandon,
        CommandKind::SocialRules => AgencySync::handle_social_rules,
        CommandKind::PetAPet => AgencySync::handle_pet_a_pet,
        CommandKind::GivePet => AgencySync::handle_give_pet,
        CommandKind::Help => AgencySync::handle_help,
    }
}

fn find_by_species<'a>(pets: &[&'a Pet], species: &str) -> Option<&'a Pet> {
    pets.iter().find(|pet| pet.species() == species).copied()
}

fn random_species(pets: &[&Pet]) -> Option<String> {
    pets.choose(&mut thread_rng())
        .map(|pet| pet.species().to_owned())
}

pub struct AgencySync {
    settings: AgencySettings,
    parser: CommandParser,
    genie_id: EntityId,
    pet_directory: PetDirectory,
    lures: LureTracker,
    avatars: HashMap<EntityId, Avatar>,
}

impl AgencySync {
    pub fn new(
        settings: AgencySettings,
        genie_id: EntityId,
        pet_directory: PetDirectory,
    ) -> Result<Self, regex::Error> {
        let parser = CommandParser::new(&settings.content)?;
        Ok(Self {
            settings,
            parser,
            genie_id,
            pet_directory,
            lures: LureTracker::default(),
            avatars: HashMap::new(),
        })
    }

    pub fn settings(&self) -> &AgencySettings {
        &self.settings
    }

    pub fn pet_directory(&self) -> &PetDirectory {
        &self.pet_directory
    }

    pub fn genie_id(&self) -> EntityId {
        self.genie_id
    }

    /// Remembers the avatar so we can find them when someone gives them a pet
    pub fn observe_avatar(&mut self, avatar: &Avatar) {
        self.avatars.insert(avatar.id, avatar.clone());
    }

    pub fn handle_mention(
        &mut self,
        requester: &Avatar,
        text: &str,
        mentioned: &[EntityId],
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, DirectoryError> {
        let Some(command) = self.parser.parse(text) else {
            return Ok(vec![Effect::message(&requester.name, NOT_UNDERSTOOD)]);
        };
        debug!(?command, requester = %requester.name, "handling command");

        let mentioned = mentioned
            .iter()
            .copied()
            .filter(|id| *id != self.genie_id)
            .collect::<Vec<_>>();
        let context = CommandContext {
            requester,
            command: &command,
            text,
            mentioned: &mentioned,
            now,
        };
        let reply = handler_for(command.kind)(self, &context)?;
        Ok(reply.into_effects(&requester.name))
    }

    pub fn handle_help(&mut self, _context: &CommandContext<'_>) -> HandlerResult {
        Ok(self.settings.content.help_text.as_str().into())
    }

    pub fn handle_thanks(&mut self, _context: &CommandContext<'_>) -> HandlerResult {
        Ok(self.settings.content.thanks().into())
    }

    pub fn handle_social_rules(&mut self, _context: &CommandContext<'_>) -> HandlerResult {
        Ok("Oh, you're right. Sorry!".into())
    }

    pub fn handle_restock(&mut self, context: &CommandContext<'_>) -> HandlerResult {
        let requester = &context.requester.name;
        let mut effects = vec![];

        // we are full up, the pet which has been waiting the longest goes
        let directory = &self.pet_directory;
        if !directory.spawn_points().is_empty() && directory.empty_spawn_points().is_empty() {
            let oldest = self.pet_directory.available().first().map(|pet| pet.id);
            if let Some(pet_id) = oldest {
                let pet = self.pet_directory.remove(pet_id)?;
                self.lures.forget(pet_id);
                effects.push(Effect::DeletePet { pet_id });
                effects.push(Effect::message(
                    requester,
                    format!(
                        "{} was unwanted and has been sent to the farm.",
                        upfirst(&a_an(pet.species()))
                    ),
                ));
            }
        }

        // never put two of the same kind of pet on display
        let mut in_stock = self
            .pet_directory
            .available()
            .iter()
            .map(|pet| pet.emoji.to_owned())
            .collect::<HashSet<_>>();
        for position in self.pet_directory.empty_spawn_points() {
            let candidates = self
                .settings
                .content
                .species
                .iter()
                .filter(|species| !in_stock.contains(&species.emoji))
                .collect::<Vec<_>>();
            let Some(species) = candidates.choose(&mut thread_rng()) else {
                break;
            };
            in_stock.insert(species.emoji.to_owned());
            effects.push(Effect::CreatePet {
                species: (*species).clone(),
                position,
            });
        }

        effects.push(Effect::message(requester, "New pets now in stock!"));
        Ok(effects.into())
    }

    pub fn handle_adoption(&mut self, context: &CommandContext<'_>) -> HandlerResult {
        let content = &self.settings.content;
        if !content.is_polite(context.text) {
            return Ok("No please? Our pets are only available to polite homes.".into());
        }

        let wanted = context.command.species.as_deref();
        if let Some(refusal) = wanted.and_then(|species| content.refusal(species)) {
            return Ok(refusal.into());
        }

        let available = self.pet_directory.available();
        let pet = match wanted {
            None => available.choose(&mut thread_rng()).copied(),
            Some(species) => find_by_species(&available, species),
        };

        let Some(pet) = pet else {
            let (Some(species), Some(alternative)) = (wanted, random_species(&available)) else {
                return Ok(OUT_OF_STOCK.into());
            };
            return Ok(format!(
                "Sorry, we don't have {} at the moment, perhaps you'd like {} instead?",
                a_an(species),
                a_an(&alternative)
            )
            .into());
        };

        let pet_id = pet.id;
        let noise = content.noise_for(&pet.emoji).to_owned();
        let pet_name = context.requester.owned_pet_name(pet);

        self.pet_directory
            .set_owner(pet_id, Some(context.requester.id))?;
        self.pet_directory
            .update(pet_id, |pet| pet.name = pet_name.to_owned())?;

        // the rename skips the queue so it lands before any movement of the pet
        Ok(vec![
            Effect::message_from(&context.requester.name, noise, pet_id),
            Effect::SyncUpdatePet {
                pet_id,
                update: BotUpdate::renamed(pet_name),
            },
        ]
        .into())
    }

    pub fn handle_abandon(&mut self, context: &CommandContext<'_>) -> HandlerResult {
        let species = context.species();
        let owned = self.pet_directory.owned(context.requester.id);

        let Some(pet) = find_by_species(&owned, species) else {
            return Ok(match random_species(&owned) {
                None => "Sorry, you don't have any pets to abandon, perhaps you'd like to adopt one?"
                    .to_owned(),
                Some(alternative) => format!(
                    "Sorry, you don't have {}. Would you like to abandon your {} instead?",
                    a_an(species),
                    alternative
                ),
            }
            .into());
        };

        let pet_id = pet.id;
        self.pet_directory.remove(pet_id)?;
        self.lures.forget(pet_id);

        Ok(vec![
            Effect::message_from(
                &context.requester.name,
                self.settings.content.sad_message(species),
                pet_id,
            ),
            Effect::DeletePet { pet_id },
        ]
        .into())
    }

    pub fn handle_day_care_drop_off(&mut self, context: &CommandContext<'_>) -> HandlerResult {
        let species = context.species();
        let not_in_day_care = self
            .pet_directory
            .owned(context.requester.id)
            .into_iter()
            .filter(|pet| !pet.in_day_care)
            .collect::<Vec<_>>();

        let Some(pet) = find_by_species(&not_in_day_care, species) else {
            return Ok(match random_species(&not_in_day_care) {
                None => "Sorry, you don't have any pets to drop off, perhaps you'd like to adopt one?"
                    .to_owned(),
                Some(alternative) => format!(
                    "Sorry, you don't have {}. Would you like to drop off your {} instead?",
                    a_an(species),
                    alternative
                ),
            }
            .into());
        };

        let pet_id = pet.id;
        let position = self.settings.day_care_center.random_point();
        self.pet_directory
            .update(pet_id, |pet| pet.in_day_care = true)?;

        Ok(vec![
            Effect::message_from(
                &context.requester.name,
                "Please don't forget about me!",
                pet_id,
            ),
            Effect::UpdatePet {
                pet_id,
                update: BotUpdate::moved_to(position),
            },
        ]
        .into())
    }

    pub fn handle_day_care_pick_up(&mut self, context: &CommandContext<'_>) -> HandlerResult {
        let species = context.species();
        let in_day_care = self
            .pet_directory
            .owned(context.requester.id)
            .into_iter()
            .filter(|pet| pet.in_day_care)
            .collect::<Vec<_>>();

        let Some(pet) = find_by_species(&in_day_care, species) else {
            return Ok(match random_species(&in_day_care) {
                None => "Sorry, you have no pets in day care. Would you like to drop one off?"
                    .to_owned(),
                Some(alternative) => format!(
                    "Sorry, you don't have {} to collect. Would you like to collect your {} instead?",
                    a_an(species),
                    alternative
                ),
            }
            .into());
        };

        let pet_id = pet.id;
        let noise = self.settings.content.noise_for(&pet.emoji).to_owned();
        self.pet_directory
            .update(pet_id, |pet| pet.in_day_care = false)?;

        Ok(vec![Effect::message_from(&context.requester.name, noise, pet_id)].into())
    }

    pub fn handle_give_pet(&mut self, context: &CommandContext<'_>) -> HandlerResult {
        let species = context.species();
        let owned = self.pet_directory.owned(context.requester.id);

        let Some(pet) = find_by_species(&owned, species) else {
            return Ok(match random_species(&owned) {
                None => "Sorry, you don't have any pets to give away, perhaps you'd like to adopt one?"
                    .to_owned(),
                Some(alternative) => format!(
                    "Sorry, you don't have {}. Would you like to give your {} instead?",
                    a_an(species),
                    alternative
                ),
            }
            .into());
        };

        let Some(recipient_id) = context.mentioned.first() else {
            return Ok(format!("Who do you want to give your {} to?", species).into());
        };
        let Some(recipient) = self.avatars.get(recipient_id) else {
            return Ok("Sorry, I don't know who that is! (Are they online?)".into());
        };

        let pet_id = pet.id;
        let noise = self.settings.content.noise_for(&pet.emoji).to_owned();
        let pet_name = recipient.owned_pet_name(pet);
        let recipient_name = recipient.name.to_owned();
        let recipient_id = recipient.id;
        let position = recipient.pos.random_neighbour();

        self.pet_directory.set_owner(pet_id, Some(recipient_id))?;
        self.pet_directory
            .update(pet_id, |pet| pet.name = pet_name.to_owned())?;
        self.lures.forget(pet_id);

        Ok(vec![
            Effect::message_from(&recipient_name, noise, pet_id),
            Effect::SyncUpdatePet {
                pet_id,
                update: BotUpdate::renamed(pet_name),
            },
            Effect::UpdatePet {
                pet_id,
                update: BotUpdate::moved_to(position),
            },
        ]
        .into())
    }

    /// Petting a pet which stands right next to you lures it to follow you for
    /// a while, nobody gets told about it
    pub fn handle_pet_a_pet(&mut self, context: &CommandContext<'_>) -> HandlerResult {
        let species = context.species();
        let petter = context.requester;
        let lured = self
            .pet_directory
            .all_owned()
            .filter(|pet| petter.pos.is_adjacent(&pet.pos) && pet.species() == species)
            .map(|pet| pet.id)
            .collect::<Vec<_>>();

        for pet_id in lured {
            debug!(pet_id, petter = %petter.name, "pet lured");
            self.lures
                .add(pet_id, petter.id, self.settings.lure_duration, context.now);
        }
        Ok(Reply::Effects(vec![]))
    }

    /// Pets follow the people who lured them, and otherwise their owners. An
    /// owner who changed their name gets the pet renamed along the way.
    pub fn handle_avatar_move(
        &mut self,
        avatar: &Avatar,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, DirectoryError> {
        let mut effects = vec![];

        for pet_id in self.lures.by_petter(avatar.id) {
            if !self.lures.check(pet_id, now) {
                continue;
            }
            if self.pet_directory.get_or_none(pet_id).is_none() {
                self.lures.forget(pet_id);
                continue;
            }
            effects.push(Effect::UpdatePet {
                pet_id,
                update: BotUpdate::moved_to(avatar.pos.random_neighbour()),
            });
        }

        let owned = self
            .pet_directory
            .owned(avatar.id)
            .into_iter()
            .map(|pet| {
                let pet_name = avatar.owned_pet_name(pet);
                (pet.id, pet.in_day_care, pet.name != pet_name, pet_name)
            })
            .collect::<Vec<_>>();

        for (pet_id, in_day_care, renamed, pet_name) in owned {
            let mut update = if in_day_care || self.lures.check(pet_id, now) {
                BotUpdate::default()
            } else {
                BotUpdate::moved_to(avatar.pos.random_neighbour())
            };

            if renamed {
                self.pet_directory
                    .update(pet_id, |pet| pet.name = pet_name.to_owned())?;
                update = update.with_name(pet_name);
            }

            // nothing to say, nothing to queue
            if !update.is_empty() {
                effects.push(Effect::UpdatePet { pet_id, update });
            }
        }

        Ok(effects)
    }

    /// Keeps our idea of where the pets are and what they are called in line
    /// with what the server tells us
    pub fn handle_bot(&mut self, bot: &BotRecord) -> Result<(), DirectoryError> {
        let Some(pet) = self.pet_directory.get_or_none(bot.id) else {
            return Ok(());
        };
        if pet.pos != bot.pos {
            self.pet_directory.set_position(bot.id, bot.pos)?;
        }
        let name = bot.name.to_owned();
        self.pet_directory.update(bot.id, |pet| pet.name = name)
    }

    pub fn handle_created(&mut self, pet: Pet) {
        self.pet_directory.add(pet);
    }

    /// Which pets the update queues may send off wandering
    pub fn wander_states(&self) -> impl Iterator<Item = (EntityId, bool)> + '_ {
        self.pet_directory.iter().map(|pet| (pet.id, pet.wanders()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{AgencySettings, AgencySync};
    use crate::agency::content::Content;
    use crate::agency::directory::PetDirectory;
    use crate::agency::effects::Effect;
    use crate::agency::types::{Avatar, Pet, Region};
    use crate::rctogether::types::{BotRecord, BotUpdate, EntityId, Position};

    const GENIE_ID: EntityId = 1;
    const ROCKET_ID: EntityId = 39887;

    fn settings(spawn_points: Vec<Position>, lure_seconds: i64) -> AgencySettings {
        AgencySettings {
            genie_name: "Pet Agency Genie".to_owned(),
            genie_home: Position::new(60, 15),
            spawn_points,
            day_care_center: Region::new(Position::new(0, 62), Position::new(11, 74)),
            corral: Region::new(Position::new(0, 40), Position::new(19, 58)),
            lure_duration: Duration::seconds(lure_seconds),
            content: Content::default(),
        }
    }

    fn pet(id: EntityId, name: &str, emoji: &str, pos: Position, owner: Option<EntityId>) -> Pet {
        Pet {
            id,
            name: name.to_owned(),
            emoji: emoji.to_owned(),
            pos,
            owner,
            in_day_care: false,
        }
    }

    fn agency(pets: Vec<Pet>, spawn_points: Vec<Position>, lure_seconds: i64) -> AgencySync {
        let mut directory = PetDirectory::new(spawn_points.clone());
        for pet in pets {
            directory.add(pet);
        }
        AgencySync::new(settings(spawn_points, lure_seconds), GENIE_ID, directory)
            .expect("parser to build")
    }

    fn rocket() -> Pet {
        pet(ROCKET_ID, "rocket", "🚀", Position::new(1, 1), None)
    }

    fn person(id: EntityId, name: &str, pos: Position) -> Avatar {
        Avatar {
            id,
            name: name.to_owned(),
            pos,
            message: None,
        }
    }

    fn faker() -> Avatar {
        person(91, "Faker McFakeface", Position::new(15, 27))
    }

    fn say(sync: &mut AgencySync, avatar: &Avatar, text: &str) -> Vec<Effect> {
        sync.handle_mention(avatar, text, &[GENIE_ID], Utc::now())
            .expect("directory to stay consistent")
    }

    fn walk(sync: &mut AgencySync, avatar: &Avatar) -> Vec<Effect> {
        sync.handle_avatar_move(avatar, Utc::now())
            .expect("directory to stay consistent")
    }

    fn reply(text: &str) -> Vec<Effect> {
        vec![Effect::message("Faker McFakeface", text)]
    }

    fn moved_next_to(effect: &Effect, pet: EntityId, position: Position) -> bool {
        match effect {
            Effect::UpdatePet { pet_id, update } => {
                *pet_id == pet
                    && update
                        .position()
                        .map(|moved| moved.is_adjacent(&position) && moved != position)
                        .unwrap_or(false)
            }
            _ => false,
        }
    }

    #[test]
    fn test_adopt_unavailable() {
        let mut sync = agency(vec![rocket()], vec![], 600);
        let effects = say(&mut sync, &faker(), "adopt the dog, please!");
        assert_eq!(
            effects,
            reply("Sorry, we don't have a dog at the moment, perhaps you'd like a rocket instead?")
        );
        assert_eq!(sync.pet_directory().available().len(), 1);
    }

    #[test]
    fn test_successful_adoption() {
        let mut sync = agency(vec![rocket()], vec![], 600);
        let faker = faker();
        let mut effects = say(&mut sync, &faker, "adopt the rocket, please!");
        effects.extend(walk(&mut sync, &faker));

        assert_eq!(effects.len(), 3);
        assert_eq!(
            effects[0],
            Effect::message_from("Faker McFakeface", "💖", ROCKET_ID)
        );
        assert_eq!(
            effects[1],
            Effect::SyncUpdatePet {
                pet_id: ROCKET_ID,
                update: BotUpdate::renamed("Faker McFakeface's rocket".to_owned()),
            }
        );
        assert!(moved_next_to(&effects[2], ROCKET_ID, faker.pos));

        let rocket = sync.pet_directory().get(ROCKET_ID).expect("still here");
        assert_eq!(rocket.owner, Some(91));
        assert!(sync.pet_directory().available().is_empty());
    }

    #[test]
    fn test_adoption_needs_manners() {
        let mut sync = agency(vec![rocket()], vec![], 600);
        assert_eq!(
            say(&mut sync, &faker(), "adopt the rocket"),
            reply("No please? Our pets are only available to polite homes.")
        );
        assert_eq!(
            say(&mut sync, &faker(), "adopt the horse please"),
            reply("Sorry, that's just a picture of a horse.")
        );
        assert_eq!(sync.pet_directory().available().len(), 1);
    }

    #[test]
    fn test_adopt_any_pet() {
        let mut sync = agency(vec![], vec![], 600);
        assert_eq!(
            say(&mut sync, &faker(), "adopt a pet please"),
            reply("Sorry, we don't have any pets at the moment, perhaps it's time to restock?")
        );

        sync.handle_created(rocket());
        let effects = say(&mut sync, &faker(), "adopt a pet please");
        assert_eq!(effects.len(), 2);
        assert_eq!(sync.pet_directory().owned(91).len(), 1);
    }

    #[test]
    fn test_not_understood() {
        let mut sync = agency(vec![], vec![], 600);
        assert_eq!(
            say(&mut sync, &faker(), "what's up?"),
            reply("Sorry, I don't understand. Would you like to adopt a pet?")
        );
    }

    #[test]
    fn test_restock_when_full() {
        let spawn_points = vec![Position::new(1, 1), Position::new(3, 1)];
        let pets = vec![
            pet(5, "cat", "🐈", Position::new(1, 1), None),
            pet(3, "dog", "🐕", Position::new(3, 1), None),
        ];
        let mut sync = agency(pets, spawn_points, 600);
        let effects = say(&mut sync, &faker(), "time to restock");

        assert_eq!(effects.len(), 4);
        assert_eq!(effects[0], Effect::DeletePet { pet_id: 3 });
        assert_eq!(
            effects[1],
            Effect::message(
                "Faker McFakeface",
                "A dog was unwanted and has been sent to the farm."
            )
        );
        match &effects[2] {
            Effect::CreatePet { species, position } => {
                assert_eq!(*position, Position::new(3, 1));
                assert_ne!(species.emoji, "🐈");
            }
            other => panic!("expected a new pet, got {:?}", other),
        }
        assert_eq!(effects[3], Effect::message("Faker McFakeface", "New pets now in stock!"));
        assert!(sync.pet_directory().get_or_none(3).is_none());
    }

    #[test]
    fn test_restock_fills_every_empty_point_without_duplicates() {
        let spawn_points = (0..7).map(|x| Position::new(x * 2, 0)).collect::<Vec<_>>();
        let pets = vec![pet(5, "cat", "🐈", Position::new(0, 0), None)];
        let mut sync = agency(pets, spawn_points, 600);
        let effects = say(&mut sync, &faker(), "time to restock");

        let created = effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::CreatePet { species, position } => Some((species.emoji.to_owned(), *position)),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(created.len(), 6);
        let mut emoji = created.iter().map(|(emoji, _)| emoji.to_owned()).collect::<Vec<_>>();
        emoji.push("🐈".to_owned());
        emoji.sort();
        emoji.dedup();
        assert_eq!(emoji.len(), 7);
        assert!(!effects.iter().any(|effect| matches!(effect, Effect::DeletePet { .. })));
    }

    #[test]
    fn test_abandon() {
        let owned = pet(7, "Faker McFakeface's cat", "🐈", Position::new(15, 28), Some(91));
        let mut sync = agency(vec![owned], vec![], 600);

        assert_eq!(
            say(&mut sync, &faker(), "abandon my dog"),
            reply("Sorry, you don't have a dog. Would you like to abandon your cat instead?")
        );

        let effects = say(&mut sync, &faker(), "abandon my cat");
        assert_eq!(effects.len(), 2);
        assert!(matches!(effects[0], Effect::SendMessage { sender: Some(7), .. }));
        assert_eq!(effects[1], Effect::DeletePet { pet_id: 7 });
        assert!(sync.pet_directory().get_or_none(7).is_none());

        assert_eq!(
            say(&mut sync, &faker(), "abandon my cat"),
            reply("Sorry, you don't have any pets to abandon, perhaps you'd like to adopt one?")
        );
    }

    #[test]
    fn test_day_care_round_trip() {
        let owned = pet(7, "Faker McFakeface's dog", "🐕", Position::new(15, 28), Some(91));
        let mut sync = agency(vec![owned], vec![], 600);
        let faker = faker();

        let effects = say(&mut sync, &faker, "please look after my dog");
        assert_eq!(
            effects[0],
            Effect::message_from("Faker McFakeface", "Please don't forget about me!", 7)
        );
        match &effects[1] {
            Effect::UpdatePet { pet_id, update } => {
                assert_eq!(*pet_id, 7);
                let position = update.position().expect("a position");
                assert!(sync.settings().day_care_center.contains(&position));
            }
            other => panic!("expected a move, got {:?}", other),
        }
        assert!(sync.pet_directory().get(7).expect("present").in_day_care);

        // pets in day care don't follow their owner around
        assert!(walk(&mut sync, &faker).is_empty());

        assert_eq!(
            say(&mut sync, &faker, "look after my dog"),
            reply("Sorry, you don't have any pets to drop off, perhaps you'd like to adopt one?")
        );

        let effects = say(&mut sync, &faker, "collect my dog");
        assert_eq!(effects, vec![Effect::message_from("Faker McFakeface", "woof!", 7)]);
        assert!(!sync.pet_directory().get(7).expect("present").in_day_care);
        assert_eq!(walk(&mut sync, &faker).len(), 1);
    }

    #[test]
    fn test_give_pet() {
        let owned = pet(7, "Faker McFakeface's dog", "🐕", Position::new(15, 28), Some(91));
        let mut sync = agency(vec![owned], vec![], 600);
        let faker = faker();
        let friend = person(92, "Friend", Position::new(30, 30));

        let unknown = sync
            .handle_mention(&faker, "give my dog to @**Friend**", &[GENIE_ID, 92], Utc::now())
            .expect("to work");
        assert_eq!(unknown, reply("Sorry, I don't know who that is! (Are they online?)"));

        let nobody = say(&mut sync, &faker, "give my dog to");
        assert_eq!(nobody, reply("Who do you want to give your dog to?"));

        sync.observe_avatar(&friend);
        let effects = sync
            .handle_mention(&faker, "give my dog to @**Friend**", &[GENIE_ID, 92], Utc::now())
            .expect("to work");
        assert_eq!(effects.len(), 3);
        assert_eq!(effects[0], Effect::message_from("Friend", "woof!", 7));
        assert_eq!(
            effects[1],
            Effect::SyncUpdatePet {
                pet_id: 7,
                update: BotUpdate::renamed("Friend's dog".to_owned()),
            }
        );
        assert!(moved_next_to(&effects[2], 7, friend.pos));
        assert_eq!(sync.pet_directory().owned(92).len(), 1);
        assert!(sync.pet_directory().owned(91).is_empty());
    }

    #[test]
    fn test_lured_pet_follows_petter() {
        let owned = pet(7, "Faker McFakeface's cat", "🐈", Position::new(15, 28), Some(91));
        let mut sync = agency(vec![owned], vec![], 600);
        let petter = person(92, "Petter", Position::new(16, 28));

        assert!(say(&mut sync, &petter, "pet the cat").is_empty());

        let effects = walk(&mut sync, &petter);
        assert_eq!(effects.len(), 1);
        assert!(moved_next_to(&effects[0], 7, petter.pos));

        // the owner walking off doesn't pull the pet away while it is lured
        let mut owner = faker();
        owner.pos = Position::new(40, 40);
        assert!(walk(&mut sync, &owner).is_empty());
    }

    #[test]
    fn test_expired_lure_returns_pet_to_owner() {
        let owned = pet(7, "Faker McFakeface's cat", "🐈", Position::new(15, 28), Some(91));
        let mut sync = agency(vec![owned], vec![], -10);
        let petter = person(92, "Petter", Position::new(16, 28));

        say(&mut sync, &petter, "pet the cat");
        assert!(walk(&mut sync, &petter).is_empty());

        let mut owner = faker();
        owner.pos = Position::new(40, 40);
        let effects = walk(&mut sync, &owner);
        assert_eq!(effects.len(), 1);
        assert!(moved_next_to(&effects[0], 7, owner.pos));
    }

    #[test]
    fn test_owner_rename_is_folded_into_move() {
        let owned = pet(7, "Faker McFakeface's cat", "🐈", Position::new(15, 28), Some(91));
        let mut sync = agency(vec![owned], vec![], 600);
        sync.pet_directory.update(7, |pet| pet.in_day_care = true).expect("present");

        let renamed = person(91, "Real Name", Position::new(15, 27));
        let effects = walk(&mut sync, &renamed);
        assert_eq!(
            effects,
            vec![Effect::UpdatePet {
                pet_id: 7,
                update: BotUpdate::renamed("Real Name's cat".to_owned()),
            }]
        );
        assert!(walk(&mut sync, &renamed).is_empty());
    }

    #[test]
    fn test_bot_events_rebucket_available_pets() {
        let spawn_points = vec![Position::new(1, 1)];
        let mut sync = agency(vec![rocket()], spawn_points, 600);
        assert!(sync.pet_directory().empty_spawn_points().is_empty());

        sync.handle_bot(&BotRecord {
            id: ROCKET_ID,
            name: "rocket".to_owned(),
            emoji: "🚀".to_owned(),
            pos: Position::new(9, 9),
            message: None,
        })
        .expect("to work");
        assert_eq!(sync.pet_directory().empty_spawn_points(), vec![Position::new(1, 1)]);

        // bots we don't look after are ignored
        sync.handle_bot(&BotRecord {
            id: GENIE_ID,
            name: "Pet Agency Genie".to_owned(),
            emoji: "🧞".to_owned(),
            pos: Position::new(60, 15),
            message: None,
        })
        .expect("to work");
    }

    #[test]
    fn test_canned_replies() {
        let mut sync = agency(vec![], vec![], 600);
        let content = Content::default();
        match &say(&mut sync, &faker(), "thanks!")[0] {
            Effect::SendMessage { text, sender, .. } => {
                assert!(content.thanks_responses.contains(text));
                assert_eq!(*sender, None);
            }
            other => panic!("expected a message, got {:?}", other),
        }
        assert_eq!(
            say(&mut sync, &faker(), "well actually"),
            reply("Oh, you're right. Sorry!")
        );
        assert_eq!(say(&mut sync, &faker(), "help"), reply(&content.help_text));
    }

    #[test]
    fn test_lure_on_pet_which_went_away() {
        let owned = pet(7, "Faker McFakeface's cat", "🐈", Position::new(15, 28), Some(91));
        let mut sync = agency(vec![owned], vec![], 600);
        let petter = person(92, "Petter", Position::new(16, 28));

        say(&mut sync, &petter, "pet the cat");
        say(&mut sync, &faker(), "abandon my cat");
        assert!(walk(&mut sync, &petter).is_empty());
    }
}
