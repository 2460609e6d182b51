//! Collaborator interfaces
//!
//! The bullet system never owns units. Everything it needs from the unit
//! and AI subsystems goes through these two traits.

use rand::RngCore;

use crate::models::position::{Point, Rect};
use crate::models::spell::SpellCast;
use crate::models::unit::{UnitId, UnitInfo};
use crate::models::weapon::WeaponId;

use super::ai::{find_nearby_helping_units, AiHit};

/// The unit subsystem as seen from bullets.
///
/// Read methods are used while bullets advance. Mutating methods are only
/// called from the resolution phase of `BulletSystem::progress_frames`.
pub trait UnitWorld {
    /// Snapshot of a unit, None once the unit no longer exists.
    fn unit(&self, id: UnitId) -> Option<UnitInfo>;

    /// Clear `out` and fill it with the units positioned inside `area`.
    /// Order does not matter; callers sort.
    fn units_in_area(&self, area: Rect, out: &mut Vec<UnitId>);

    fn are_allies(&self, player: u8, other: u8) -> bool;

    /// Damage upgrade level of `player` for `weapon`.
    fn upgrade_level(&self, player: u8, weapon: WeaponId) -> u8;

    /// Whether `unit` stands on higher ground than `from`.
    fn is_on_higher_ground(&self, _unit: UnitId, _from: Point) -> bool {
        false
    }

    /// Shared simulation RNG. Only consulted when bullets are created.
    fn rng(&mut self) -> &mut dyn RngCore;

    /// Store the resolved health of a damaged unit.
    fn set_health(&mut self, unit: UnitId, hitpoints: i32, shields: i32);

    /// Notification that `target` was attacked by `attacker`.
    /// Returns true when the AI has to react.
    fn unit_was_hit(&mut self, target: UnitId, attacker: UnitId, notify: bool) -> bool;

    /// A hallucination "hit" `target`: no damage, only the visual.
    fn hallucination_hit(&mut self, _target: UnitId, _attacker: UnitId, _direction: u8) {}

    fn cast_spell(&mut self, spell: &SpellCast);

    /// `unit` died this frame; `killer` is the attacking player if any.
    fn unit_killed(&mut self, unit: UnitId, killer: Option<u8>);

    /// Identity of `unit` inside a save file.
    fn save_id(&self, unit: UnitId) -> u32 {
        unit.0
    }

    /// Live unit for a saved identity, None if it is gone.
    fn unit_from_save_id(&self, id: u32) -> Option<UnitId> {
        let unit = UnitId(id);
        self.unit(unit).map(|_| unit)
    }
}

/// The AI subsystem as seen from bullets.
pub trait AiHandler {
    /// Allies of `unit` that should react when it is attacked.
    fn helping_units<W: UnitWorld>(
        &self,
        world: &W,
        unit: UnitId,
        scratch: &mut Vec<UnitId>,
    ) -> Vec<UnitId> {
        find_nearby_helping_units(world, unit, scratch)
    }

    /// Reactions collected during one frame, in resolution order.
    fn react_to_hits(&mut self, hits: &[AiHit]);
}
