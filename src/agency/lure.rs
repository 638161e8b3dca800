//! Petting someone else's pet lures it away for a while, this keeps track of
//! who lured which pet and until when

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::rctogether::types::EntityId;

#[derive(Debug, Default)]
pub struct LureTracker {
    lured_pets: HashMap<EntityId, DateTime<Utc>>,
    lured_pets_by_petter: HashMap<EntityId, Vec<EntityId>>,
}

impl LureTracker {
    /// Claims the pet for the petter, claiming again just moves the expiry and
    /// a pet only ever follows its latest petter
    pub fn add(
        &mut self,
        pet_id: EntityId,
        petter_id: EntityId,
        duration: Duration,
        now: DateTime<Utc>,
    ) {
        self.lured_pets.insert(pet_id, now + duration);
        for (other_petter, pets) in self.lured_pets_by_petter.iter_mut() {
            if *other_petter != petter_id {
                pets.retain(|id| *id != pet_id);
            }
        }
        let pets = self.lured_pets_by_petter.entry(petter_id).or_default();
        if !pets.contains(&pet_id) {
            pets.push(pet_id);
        }
        self.lured_pets_by_petter.retain(|_, pets| !pets.is_empty());
    }

    /// Is the pet still under someone's spell, expired lures are cleaned up
    /// as we notice them
    pub fn check(&mut self, pet_id: EntityId, now: DateTime<Utc>) -> bool {
        let Some(expiry) = self.lured_pets.get(&pet_id) else {
            return false;
        };
        if *expiry <= now {
            self.forget(pet_id);
            return false;
        }
        true
    }

    pub fn by_petter(&self, petter_id: EntityId) -> Vec<EntityId> {
        self.lured_pets_by_petter
            .get(&petter_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Drops every trace of the pet
    pub fn forget(&mut self, pet_id: EntityId) {
        self.lured_pets.remove(&pet_id);
        for pets in self.lured_pets_by_petter.values_mut() {
            pets.retain(|id| *id != pet_id);
        }
        self.lured_pets_by_petter.retain(|_, pets| !pets.is_empty());
    }
}
