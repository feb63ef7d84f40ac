//! Cooldowns and spell slots.

use std::time::Duration;

use bevy::prelude::*;

use crate::constants::SPELL_SLOT_COUNT;
use crate::database::Databases;
use crate::engine::schedule::TimeElapsed;
use crate::error::DatabaseError;

/// Recurring countdown. `remaining_cooldown` never goes below zero and the
/// flag clears exactly once per start.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cooldown {
    pub is_in_cooldown: bool,
    pub cooldown: Duration,
    pub remaining_cooldown: Duration,
}

impl Cooldown {
    /// Ready immediately
    pub fn new(cooldown: Duration) -> Self {
        Self {
            is_in_cooldown: false,
            cooldown,
            remaining_cooldown: Duration::ZERO,
        }
    }

    /// Already counting down
    pub fn started(cooldown: Duration) -> Self {
        let mut cd = Self::new(cooldown);
        cd.start();
        cd
    }

    pub fn start(&mut self) {
        self.is_in_cooldown = true;
        self.remaining_cooldown = self.cooldown;
    }

    pub fn is_ready(&self) -> bool {
        !self.is_in_cooldown
    }

    /// Returns true only on the call that clears the flag
    pub fn decay(&mut self, elapsed: Duration) -> bool {
        if !self.is_in_cooldown {
            return false;
        }
        self.remaining_cooldown = self.remaining_cooldown.saturating_sub(elapsed);
        if self.remaining_cooldown.is_zero() {
            self.is_in_cooldown = false;
            return true;
        }
        false
    }
}

/// A spell definition bound to its own cooldown state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellInstance {
    pub id: String,
    pub cooldown: Cooldown,
}

impl SpellInstance {
    pub fn new(id: &str, db: &Databases) -> Result<Self, DatabaseError> {
        let def = db.spell(id)?;
        Ok(Self {
            id: def.name.clone(),
            cooldown: Cooldown::new(def.cooldown()),
        })
    }
}

/// Fixed set of optional spells. An empty slot is skipped forever.
#[derive(Component, Debug, Clone, PartialEq, Eq, Default)]
pub struct SpellSlots {
    pub slots: [Option<SpellInstance>; SPELL_SLOT_COUNT],
}

impl SpellSlots {
    /// Fill slots in order; spells past the last slot are ignored
    pub fn from_spells(spells: &[String], db: &Databases) -> Result<Self, DatabaseError> {
        let mut slots = Self::default();
        for (slot, id) in slots.slots.iter_mut().zip(spells) {
            *slot = Some(SpellInstance::new(id, db)?);
        }
        Ok(slots)
    }

    pub fn get(&self, index: usize) -> Option<&SpellInstance> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SpellInstance> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn set(&mut self, index: usize, spell: SpellInstance) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(spell);
                true
            }
            None => false,
        }
    }

    /// Put each spell into the next empty slot. Returns how many were placed.
    pub fn fill_empty(&mut self, spells: impl IntoIterator<Item = SpellInstance>) -> usize {
        let mut placed = 0;
        let mut spells = spells.into_iter();
        for slot in self.slots.iter_mut().filter(|s| s.is_none()) {
            match spells.next() {
                Some(spell) => {
                    *slot = Some(spell);
                    placed += 1;
                }
                None => break,
            }
        }
        placed
    }

    pub fn ready_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().filter(|s| s.cooldown.is_ready()).map(|_| i))
            .collect()
    }
}

/// System: decay spell slot and effect cooldowns
pub fn decay_cooldowns(
    elapsed: Res<TimeElapsed>,
    mut slots: Query<&mut SpellSlots>,
    mut cooldowns: Query<&mut Cooldown>,
) {
    for mut spell_slots in &mut slots {
        for spell in spell_slots.slots.iter_mut().flatten() {
            spell.cooldown.decay(elapsed.0);
        }
    }
    for mut cooldown in &mut cooldowns {
        cooldown.decay(elapsed.0);
    }
}
