//! In-memory unit world
//!
//! A small, deterministic `UnitWorld` and `AiHandler` for tests and headless
//! drivers. Units live in a `BTreeMap`, the RNG is a seeded `StdRng`, and
//! every side effect the bullet system causes is recorded for inspection.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::models::order::Order;
use crate::models::position::{Point, Rect};
use crate::models::spell::SpellCast;
use crate::models::unit::{UnitId, UnitInfo};
use crate::models::weapon::WeaponId;
use crate::services::ai::AiHit;
use crate::services::world::{AiHandler, UnitWorld};

#[derive(Debug, Clone)]
pub struct SandboxWorld {
    units: BTreeMap<UnitId, UnitInfo>,
    next_id: u32,
    rng: StdRng,
    alliances: BTreeSet<(u8, u8)>,
    upgrades: BTreeMap<(u8, WeaponId), u8>,
    higher_ground: BTreeSet<UnitId>,
    /// Spells cast, in order
    pub spells: Vec<SpellCast>,
    /// (unit, killing player), in order
    pub kills: Vec<(UnitId, Option<u8>)>,
    /// (target, attacker) notifications, in order
    pub hits: Vec<(UnitId, UnitId)>,
    pub hallucination_hits: Vec<(UnitId, UnitId)>,
}

impl SandboxWorld {
    pub fn new(seed: u64) -> Self {
        SandboxWorld {
            units: BTreeMap::new(),
            next_id: 1,
            rng: StdRng::seed_from_u64(seed),
            alliances: BTreeSet::new(),
            upgrades: BTreeMap::new(),
            higher_ground: BTreeSet::new(),
            spells: Vec::new(),
            kills: Vec::new(),
            hits: Vec::new(),
            hallucination_hits: Vec::new(),
        }
    }

    pub fn spawn(&mut self, info: UnitInfo) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.units.insert(id, info);
        id
    }

    pub fn remove(&mut self, unit: UnitId) -> Option<UnitInfo> {
        self.units.remove(&unit)
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.keys().copied()
    }

    pub fn set_hitpoints(&mut self, unit: UnitId, hitpoints: i32) {
        if let Some(info) = self.units.get_mut(&unit) {
            info.hitpoints = hitpoints;
        }
    }

    pub fn set_target(&mut self, unit: UnitId, target: Option<UnitId>) {
        if let Some(info) = self.units.get_mut(&unit) {
            info.target = target;
        }
    }

    pub fn set_allied(&mut self, player: u8, other: u8) {
        self.alliances.insert((player.min(other), player.max(other)));
    }

    pub fn set_upgrade(&mut self, player: u8, weapon: WeaponId, level: u8) {
        self.upgrades.insert((player, weapon), level);
    }

    pub fn set_higher_ground(&mut self, unit: UnitId, higher: bool) {
        if higher {
            self.higher_ground.insert(unit);
        } else {
            self.higher_ground.remove(&unit);
        }
    }
}

impl UnitWorld for SandboxWorld {
    fn unit(&self, id: UnitId) -> Option<UnitInfo> {
        self.units.get(&id).cloned()
    }

    fn units_in_area(&self, area: Rect, out: &mut Vec<UnitId>) {
        out.clear();
        out.extend(
            self.units
                .iter()
                .filter(|(_, info)| area.contains(info.position))
                .map(|(&id, _)| id),
        );
    }

    fn are_allies(&self, player: u8, other: u8) -> bool {
        player == other || self.alliances.contains(&(player.min(other), player.max(other)))
    }

    fn upgrade_level(&self, player: u8, weapon: WeaponId) -> u8 {
        self.upgrades.get(&(player, weapon)).copied().unwrap_or(0)
    }

    fn is_on_higher_ground(&self, unit: UnitId, _from: Point) -> bool {
        self.higher_ground.contains(&unit)
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }

    fn set_health(&mut self, unit: UnitId, hitpoints: i32, shields: i32) {
        if let Some(info) = self.units.get_mut(&unit) {
            info.hitpoints = hitpoints;
            info.shields = shields;
        }
    }

    fn unit_was_hit(&mut self, target: UnitId, attacker: UnitId, _notify: bool) -> bool {
        self.hits.push((target, attacker));
        self.units.get(&target).is_some_and(|info| !info.is_dead())
    }

    fn hallucination_hit(&mut self, target: UnitId, attacker: UnitId, _direction: u8) {
        self.hallucination_hits.push((target, attacker));
    }

    fn cast_spell(&mut self, spell: &SpellCast) {
        self.spells.push(spell.clone());
    }

    fn unit_killed(&mut self, unit: UnitId, killer: Option<u8>) {
        if let Some(info) = self.units.get_mut(&unit) {
            info.hitpoints = 0;
            info.order = Order::Die;
        }
        self.kills.push((unit, killer));
    }
}

/// Records every reaction it is asked for.
#[derive(Debug, Clone, Default)]
pub struct SandboxAi {
    pub hits: Vec<AiHit>,
}

impl AiHandler for SandboxAi {
    fn react_to_hits(&mut self, hits: &[AiHit]) {
        self.hits.extend_from_slice(hits);
    }
}
