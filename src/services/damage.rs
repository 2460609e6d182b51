//! Frame-scoped damage bookkeeping
//!
//! Bullets never touch unit health while they advance. They record
//! `BulletHit`s into `ProgressBulletBufs`; the resolution phase folds every
//! hit on a unit into a single `DamagedUnit` and writes the result back
//! once, so no unit is ever read with half-applied damage.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::bullet::BulletId;
use crate::models::constants::{FIXED_ONE, MIN_DAMAGE};
use crate::models::spell::SpellCast;
use crate::models::unit::{UnitId, UnitInfo};
use crate::models::weapon::{DamageType, WeaponData, WeaponId};

use super::bullet_state::Transition;
use super::claimable::Reset;
use super::world::UnitWorld;

/// Damage a bullet wants to deal. `damage` is before armor and shields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletHit {
    pub target: UnitId,
    pub bullet: BulletId,
    pub attacker: Option<UnitId>,
    pub damage: i32,
    pub weapon: WeaponId,
    pub player: u8,
    pub direction: u8,
}

/// Damage dealt outside of bullets (melee strikes and the like),
/// precomputed by the caller and resolved together with bullet hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponDamage {
    pub target: UnitId,
    pub attacker: Option<UnitId>,
    pub damage: i32,
    pub weapon: WeaponId,
    pub player: u8,
    pub direction: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallucinationHit {
    pub target: UnitId,
    pub attacker: UnitId,
    pub direction: u8,
}

/// One hit after armor, shields and coalescing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHit {
    pub target: UnitId,
    pub attacker: Option<UnitId>,
    pub weapon: WeaponId,
    pub hp_loss: i32,
    pub shield_loss: i32,
}

/// Raw weapon damage of `player`'s `weapon`, fixed-point, before the
/// target's armor.
/// Saturates at `i32::MAX`.
pub fn weapon_damage<W: UnitWorld>(world: &W, data: &WeaponData, weapon: WeaponId, player: u8) -> i32 {
    let upgrades = world.upgrade_level(player, weapon) as i64;
    let base = data.damage as i64 + data.upgrade_bonus as i64 * upgrades;
    clamp_damage(base * data.factor as i64 * FIXED_ONE as i64)
}

/// `percent`% of `damage`, saturating.
pub(crate) fn scale_percent(damage: i32, percent: i32) -> i32 {
    clamp_damage(damage as i64 * percent as i64 / 100)
}

fn clamp_damage(damage: i64) -> i32 {
    damage.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Every hit one unit takes during a single `progress_frames` call.
///
/// Starts from the unit's health when first hit and applies each further
/// hit against the running totals, so N hits lose exactly the sum of their
/// individual losses and death is decided once.
#[derive(Debug, Clone)]
pub struct DamagedUnit {
    pub unit: UnitId,
    info: UnitInfo,
    hitpoints: i32,
    shields: i32,
    hits: u32,
    killer: Option<u8>,
}

impl DamagedUnit {
    fn new(unit: UnitId, info: UnitInfo) -> Self {
        DamagedUnit {
            unit,
            hitpoints: info.hitpoints,
            shields: info.shields,
            info,
            hits: 0,
            killer: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hitpoints <= 0
    }

    pub fn hitpoints(&self) -> i32 {
        self.hitpoints
    }

    pub fn shields(&self) -> i32 {
        self.shields
    }

    pub fn hit_count(&self) -> u32 {
        self.hits
    }

    /// Apply one hit. Returns (hp_loss, shield_loss).
    fn add_hit(&mut self, damage: i32, damage_type: DamageType, player: u8) -> (i32, i32) {
        if self.info.is_invincible || self.is_dead() {
            return (0, 0);
        }
        self.hits += 1;
        self.killer = Some(player);

        if damage_type == DamageType::Independent {
            return (self.add_damage(FIXED_ONE), 0);
        }

        let mut dmg = damage;
        if self.info.is_hallucination {
            dmg = dmg.saturating_mul(2);
        }
        dmg = dmg.saturating_add(self.info.acid_spores as i32 * FIXED_ONE);

        let ignores_armor = damage_type == DamageType::IgnoreArmor;
        let mut shield_loss = 0;
        if self.shields > 0 {
            let absorbed = if ignores_armor {
                dmg
            } else {
                dmg.saturating_sub(self.info.shield_armor as i32 * FIXED_ONE).max(0)
            };
            if absorbed <= self.shields {
                self.shields -= absorbed;
                return (0, absorbed);
            }
            shield_loss = self.shields;
            dmg = absorbed - self.shields;
            self.shields = 0;
        }

        if !ignores_armor {
            dmg = dmg.saturating_sub(self.info.armor as i32 * FIXED_ONE);
        }
        dmg = scale_percent(dmg, damage_type.size_multiplier(self.info.size));
        (self.add_damage(dmg.max(MIN_DAMAGE)), shield_loss)
    }

    fn add_damage(&mut self, dmg: i32) -> i32 {
        let loss = dmg.min(self.hitpoints);
        self.hitpoints = self.hitpoints.saturating_sub(dmg);
        loss
    }
}

/// Per-call map from unit to its accumulator. Iterates in first-hit order.
#[derive(Debug, Default)]
pub struct DamagedUnits {
    units: Vec<DamagedUnit>,
    index: HashMap<UnitId, usize>,
}

impl DamagedUnits {
    /// Accumulator of `unit`, created on first use. None if the unit is gone.
    pub fn get_or_insert<W: UnitWorld>(&mut self, world: &W, unit: UnitId) -> Option<&mut DamagedUnit> {
        let index = match self.index.get(&unit) {
            Some(&index) => index,
            None => {
                let info = world.unit(unit)?;
                self.units.push(DamagedUnit::new(unit, info));
                self.index.insert(unit, self.units.len() - 1);
                self.units.len() - 1
            }
        };
        Some(&mut self.units[index])
    }

    pub fn get(&self, unit: UnitId) -> Option<&DamagedUnit> {
        self.index.get(&unit).map(|&index| &self.units[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &DamagedUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn clear(&mut self) {
        self.units.clear();
        self.index.clear();
    }
}

/// Deferred side effects of one frame.
#[derive(Debug, Default)]
pub struct ProgressBulletBufs {
    pub(crate) transitions: Vec<Transition>,
    /// Applied after the hits of the old target were recorded.
    pub(crate) bounce_targets: Vec<(BulletId, UnitId)>,
    pub(crate) hits: Vec<BulletHit>,
    pub(crate) hallucination_hits: Vec<HallucinationHit>,
    pub(crate) spells: Vec<SpellCast>,
    /// target, attacker
    pub(crate) unit_was_hit: Vec<(UnitId, UnitId)>,
    /// target, attacker, main_target_reactions
    pub(crate) ai_react: Vec<(UnitId, UnitId, bool)>,
    /// unit, killing player
    pub(crate) killed_units: Vec<(UnitId, Option<u8>)>,
    pub(crate) damaged_units: DamagedUnits,
    pub(crate) resolved: Vec<ResolvedHit>,
    /// (lurker, victim) pairs already hit this frame
    pub(crate) lurker_hits: HashSet<(UnitId, UnitId)>,
    /// Units already hit by a ground damage pulse this frame
    pub(crate) ground_hits: HashSet<UnitId>,
    pub(crate) area_scratch: Vec<UnitId>,
}

impl Reset for ProgressBulletBufs {
    fn reset(&mut self) {
        self.transitions.clear();
        self.bounce_targets.clear();
        self.hits.clear();
        self.hallucination_hits.clear();
        self.spells.clear();
        self.unit_was_hit.clear();
        self.ai_react.clear();
        self.killed_units.clear();
        self.damaged_units.clear();
        self.resolved.clear();
        self.lurker_hits.clear();
        self.ground_hits.clear();
        self.area_scratch.clear();
    }
}

impl ProgressBulletBufs {
    pub fn damaged_units(&self) -> &DamagedUnits {
        &self.damaged_units
    }

    /// Record a unit death, once.
    pub fn add_killed(&mut self, unit: UnitId, killer: Option<u8>) {
        if !self.killed_units.iter().any(|&(dead, _)| dead == unit) {
            self.killed_units.push((unit, killer));
        }
    }

    /// Fold one hit into the target's accumulator and queue the
    /// "unit was hit" notification. Hits on units that are gone or already
    /// dead this frame are dropped.
    #[allow(clippy::too_many_arguments)]
    pub fn add_hit<W: UnitWorld>(
        &mut self,
        world: &W,
        target: UnitId,
        attacker: Option<UnitId>,
        damage: i32,
        weapon: WeaponId,
        damage_type: DamageType,
        player: u8,
    ) {
        let Some(unit) = self.damaged_units.get_or_insert(world, target) else {
            return;
        };
        if unit.is_dead() {
            return;
        }
        let (hp_loss, shield_loss) = unit.add_hit(damage, damage_type, player);
        self.resolved.push(ResolvedHit {
            target,
            attacker,
            weapon,
            hp_loss,
            shield_loss,
        });
        if let Some(attacker) = attacker {
            if attacker != target {
                self.unit_was_hit.push((target, attacker));
            }
        }
    }

    /// Write every accumulator back to the world, in first-hit order,
    /// and queue the units that died.
    pub(crate) fn commit_damage<W: UnitWorld>(&mut self, world: &mut W) {
        let mut dead = Vec::new();
        for unit in self.damaged_units.iter() {
            world.set_health(unit.unit, unit.hitpoints.max(0), unit.shields);
            if unit.is_dead() {
                dead.push((unit.unit, unit.killer));
            }
        }
        for (unit, killer) in dead {
            self.add_killed(unit, killer);
        }
    }
}

/// Damage `target` without an attacker (burning, plague ticks).
/// Prefer hits through `progress_frames`; this exists for damage sources
/// that run outside of it.
pub fn damage_unit<W: UnitWorld>(
    world: &mut W,
    damage: i32,
    target: UnitId,
    killed_units: &mut Vec<UnitId>,
) {
    let Some(info) = world.unit(target) else {
        return;
    };
    if info.is_dead() || info.is_invincible {
        return;
    }
    let hitpoints = info.hitpoints.saturating_sub(damage);
    world.set_health(target, hitpoints.max(0), info.shields);
    if hitpoints <= 0 && !killed_units.contains(&target) {
        killed_units.push(target);
    }
}
