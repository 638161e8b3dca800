//! In memory index of every pet we look after. Available pets are bucketed by
//! where they stand (that is how we know which spawn points are taken), owned
//! pets are listed under their owner. A pet is always in exactly one of those.

use std::collections::{BTreeSet, HashMap};

use crate::rctogether::types::{EntityId, Position};

use super::errors::DirectoryError;
use super::types::Pet;

#[derive(Debug, Default)]
pub struct PetDirectory {
    available_pets: HashMap<Position, Vec<EntityId>>,
    owned_pets: HashMap<EntityId, Vec<EntityId>>,
    pets_by_id: HashMap<EntityId, Pet>,
    spawn_points: BTreeSet<Position>,
}

impl PetDirectory {
    pub fn new(spawn_points: impl IntoIterator<Item = Position>) -> Self {
        Self {
            spawn_points: spawn_points.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn add(&mut self, pet: Pet) {
        // re-adding replaces whatever we had so the indices stay consistent
        if let Some(previous) = self.pets_by_id.remove(&pet.id) {
            self.unindex(&previous);
        }
        match pet.owner {
            Some(owner) => self.owned_pets.entry(owner).or_default().push(pet.id),
            None => self.available_pets.entry(pet.pos).or_default().push(pet.id),
        }
        self.pets_by_id.insert(pet.id, pet);
    }

    pub fn remove(&mut self, pet_id: EntityId) -> Result<Pet, DirectoryError> {
        let pet = self
            .pets_by_id
            .remove(&pet_id)
            .ok_or(DirectoryError::NotFound(pet_id))?;
        self.unindex(&pet);
        Ok(pet)
    }

    fn unindex(&mut self, pet: &Pet) {
        match pet.owner {
            Some(owner) => {
                if let Some(pets) = self.owned_pets.get_mut(&owner) {
                    pets.retain(|id| *id != pet.id);
                    if pets.is_empty() {
                        self.owned_pets.remove(&owner);
                    }
                }
            }
            None => {
                if let Some(pets) = self.available_pets.get_mut(&pet.pos) {
                    pets.retain(|id| *id != pet.id);
                    if pets.is_empty() {
                        self.available_pets.remove(&pet.pos);
                    }
                }
            }
        }
    }

    /// Every pet nobody owns yet, in id order
    pub fn available(&self) -> Vec<&Pet> {
        let mut pets = self
            .available_pets
            .values()
            .flatten()
            .filter_map(|id| self.pets_by_id.get(id))
            .collect::<Vec<_>>();
        pets.sort_by_key(|pet| pet.id);
        pets
    }

    /// Pets belonging to the owner, owners we have never heard of just don't
    /// have any pets
    pub fn owned(&self, owner_id: EntityId) -> Vec<&Pet> {
        self.owned_pets
            .get(&owner_id)
            .map(|pets| {
                pets.iter()
                    .filter_map(|id| self.pets_by_id.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn all_owned(&self) -> impl Iterator<Item = &Pet> + '_ {
        self.owned_pets
            .values()
            .flatten()
            .filter_map(|id| self.pets_by_id.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pet> + '_ {
        self.pets_by_id.values()
    }

    pub fn len(&self) -> usize {
        self.pets_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets_by_id.is_empty()
    }

    pub fn get(&self, pet_id: EntityId) -> Result<&Pet, DirectoryError> {
        self.pets_by_id
            .get(&pet_id)
            .ok_or(DirectoryError::NotFound(pet_id))
    }

    pub fn get_or_none(&self, pet_id: EntityId) -> Option<&Pet> {
        self.pets_by_id.get(&pet_id)
    }

    pub fn spawn_points(&self) -> &BTreeSet<Position> {
        &self.spawn_points
    }

    /// Spawn points which don't have an available pet standing on them
    pub fn empty_spawn_points(&self) -> Vec<Position> {
        self.spawn_points
            .iter()
            .filter(|point| !self.available_pets.contains_key(point))
            .copied()
            .collect()
    }

    pub fn set_owner(
        &mut self,
        pet_id: EntityId,
        owner: Option<EntityId>,
    ) -> Result<(), DirectoryError> {
        self.reindex(pet_id, |pet| pet.owner = owner)
    }

    pub fn set_position(&mut self, pet_id: EntityId, pos: Position) -> Result<(), DirectoryError> {
        self.reindex(pet_id, |pet| pet.pos = pos)
    }

    /// Changes which don't touch the indices (name, day care)
    pub fn update<F>(&mut self, pet_id: EntityId, f: F) -> Result<(), DirectoryError>
    where
        F: FnOnce(&mut Pet),
    {
        let pet = self
            .pets_by_id
            .get_mut(&pet_id)
            .ok_or(DirectoryError::NotFound(pet_id))?;
        let (owner, pos) = (pet.owner, pet.pos);
        f(pet);
        // owner and position are index keys, they go through reindex
        pet.owner = owner;
        pet.pos = pos;
        Ok(())
    }

    fn reindex<F>(&mut self, pet_id: EntityId, f: F) -> Result<(), DirectoryError>
    where
        F: FnOnce(&mut Pet),
    {
        let mut pet = self.remove(pet_id)?;
        f(&mut pet);
        self.add(pet);
        Ok(())
    }
}
