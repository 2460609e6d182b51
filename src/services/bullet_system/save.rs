//! Saving and loading
//!
//! Unit references are not stable across a save, so they are written as
//! world save ids. Loading is two-phase: `deserialize` rebuilds bullets and
//! containers, `finish_load` resolves the ids once the unit world is loaded.
//! Bullet handles do survive: the arena is saved with its generations.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::bullet::{Bullet, BulletId};
use crate::models::config::BulletConfig;
use crate::models::constants::SAVE_VERSION;
use crate::models::errors::{BulletError, BulletResult};
use crate::models::unit::UnitId;
use crate::models::weapon::WeaponTable;

use super::super::world::UnitWorld;
use super::{BulletSystem, Slot};

/// Weak unit references of a bullet, as save ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedRefs {
    pub target: Option<u32>,
    pub previous_target: Option<u32>,
    pub parent: Option<u32>,
    pub move_target_unit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBullet {
    pub id: BulletId,
    /// The bullet with every unit reference cleared.
    pub bullet: Bullet,
    pub refs: SavedRefs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBulletSystem {
    pub version: u32,
    /// Generation of every arena slot.
    pub generations: Vec<u32>,
    /// Empty slots, in reuse order.
    pub free: Vec<u32>,
    /// In `active_bullets` order.
    pub bullets: Vec<SavedBullet>,
}

fn save_ref<W: UnitWorld>(world: &W, unit: Option<UnitId>) -> Option<u32> {
    unit.map(|unit| world.save_id(unit))
}

impl BulletSystem {
    pub fn serialize<W: UnitWorld>(&self, world: &W) -> SavedBulletSystem {
        let bullets = self
            .active_bullets()
            .map(|bullet| {
                let refs = SavedRefs {
                    target: save_ref(world, bullet.target),
                    previous_target: save_ref(world, bullet.previous_target),
                    parent: save_ref(world, bullet.parent),
                    move_target_unit: save_ref(world, bullet.move_target_unit),
                };
                let mut bullet = bullet.clone();
                bullet.target = None;
                bullet.previous_target = None;
                bullet.parent = None;
                bullet.move_target_unit = None;
                SavedBullet {
                    id: bullet.id(),
                    bullet,
                    refs,
                }
            })
            .collect();
        SavedBulletSystem {
            version: SAVE_VERSION,
            generations: self.slots.iter().map(|slot| slot.generation).collect(),
            free: self.free.clone(),
            bullets,
        }
    }

    /// Rebuild a system from a save. Unit references stay pending until
    /// `finish_load`; the system refuses to progress before that.
    pub fn deserialize(
        saved: SavedBulletSystem,
        config: BulletConfig,
        weapons: WeaponTable,
    ) -> BulletResult<Self> {
        if saved.version != SAVE_VERSION {
            return Err(BulletError::UnsupportedSaveVersion {
                found: saved.version,
                expected: SAVE_VERSION,
            });
        }
        let mut system = BulletSystem::new(config, weapons);
        system.slots = saved
            .generations
            .iter()
            .map(|&generation| Slot {
                generation,
                bullet: None,
            })
            .collect();

        let mut pending = Vec::with_capacity(saved.bullets.len());
        for SavedBullet { id, mut bullet, refs } in saved.bullets {
            if system.weapons.get(bullet.weapon).is_none() {
                return Err(BulletError::InvalidWeaponTable(format!(
                    "saved bullet uses unknown weapon {}",
                    bullet.weapon.0
                )));
            }
            let Some(slot) = system
                .slots
                .get_mut(id.index())
                .filter(|slot| slot.generation == id.generation() && slot.bullet.is_none())
            else {
                return Err(BulletError::CorruptSave(format!(
                    "bullet {:?} does not match its slot",
                    id
                )));
            };
            bullet.id = id;
            system.containers[bullet.state.container_index()].push(id);
            slot.bullet = Some(bullet);
            pending.push((id, refs));
        }

        let empty = system.slots.iter().filter(|slot| slot.bullet.is_none()).count();
        let mut seen = HashSet::new();
        for &index in &saved.free {
            let is_empty = system
                .slots
                .get(index as usize)
                .is_some_and(|slot| slot.bullet.is_none());
            if !is_empty || !seen.insert(index) {
                return Err(BulletError::CorruptSave(format!(
                    "free slot {} is occupied or listed twice",
                    index
                )));
            }
        }
        if seen.len() != empty {
            return Err(BulletError::CorruptSave(
                "free list does not cover every empty slot".to_string(),
            ));
        }
        system.free = saved.free;
        system.pending_refs = Some(pending);
        Ok(system)
    }

    /// Resolve the pending unit references against the loaded world.
    /// References to units that no longer exist are dropped.
    pub fn finish_load<W: UnitWorld>(&mut self, world: &W) {
        let Some(pending) = self.pending_refs.take() else {
            return;
        };
        let resolve = |id: Option<u32>| id.and_then(|id| world.unit_from_save_id(id));
        for (id, refs) in &pending {
            if let Some(bullet) = self.get_mut(*id) {
                bullet.target = resolve(refs.target);
                bullet.previous_target = resolve(refs.previous_target);
                bullet.parent = resolve(refs.parent);
                bullet.move_target_unit = resolve(refs.move_target_unit);
            }
        }
        info!(bullets = pending.len(), "bullet load finished");
    }

    pub fn to_json<W: UnitWorld>(&self, world: &W) -> BulletResult<String> {
        Ok(serde_json::to_string(&self.serialize(world))?)
    }

    pub fn from_json(json: &str, config: BulletConfig, weapons: WeaponTable) -> BulletResult<Self> {
        let saved: SavedBulletSystem = serde_json::from_str(json)?;
        Self::deserialize(saved, config, weapons)
    }
}
