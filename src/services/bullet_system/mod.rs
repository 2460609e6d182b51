//! Bullet orchestration
//!
//! `BulletSystem` owns every live bullet. Bullets sit in an arena and are
//! listed, by id, in exactly one of seven per-state containers. The
//! containers are processed in `BulletState::PROCESS_ORDER` and keep
//! insertion order, which is what makes two runs of the same input produce
//! the same side effects in the same order.

mod active;
mod save;

use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::models::bullet::{Bullet, BulletId};
use crate::models::config::BulletConfig;
use crate::models::constants::{BulletState, NUM_STATES};
use crate::models::position::Point;
use crate::models::spell::SpellCast;
use crate::models::sprite::Animation;
use crate::models::unit::UnitId;
use crate::models::weapon::{DamageType, WeaponBehaviour, WeaponId, WeaponTable};

use super::ai::{process_ai_react_to_hit, AiHit, HelpingUnits};
use super::bullet_state::{Step, Transition};
use super::claimable::Claimable;
use super::damage::{HallucinationHit, ProgressBulletBufs, ResolvedHit, WeaponDamage};
use super::missile_damage::do_missile_dmg;
use super::world::{AiHandler, UnitWorld};

pub use active::{ActiveBullets, ActiveCursor};
pub use save::{SavedBullet, SavedBulletSystem, SavedRefs};

/// Caller-supplied work for one `progress_frames` call.
#[derive(Debug, Clone, Default)]
pub struct BulletFramesInput {
    /// Non-bullet damage, resolved before any bullet hit.
    pub weapon_damages: Vec<WeaponDamage>,
    pub hallucination_hits: Vec<HallucinationHit>,
    /// Allies of every unit that may be hit this frame.
    pub helping_units: HelpingUnits,
}

/// Everything that happened during one `progress_frames` call, in the
/// order it was applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub hits: Vec<ResolvedHit>,
    /// Deduplicated (target, attacker) pairs passed to `UnitWorld::unit_was_hit`.
    pub unit_was_hit: Vec<(UnitId, UnitId)>,
    pub ai_hits: Vec<AiHit>,
    pub spells: Vec<SpellCast>,
    pub killed: Vec<UnitId>,
    pub deleted: usize,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    bullet: Option<Bullet>,
}

#[derive(Debug)]
pub struct BulletSystem {
    slots: Vec<Slot>,
    free: Vec<u32>,
    containers: [Vec<BulletId>; NUM_STATES],
    config: BulletConfig,
    weapons: WeaponTable,
    bufs: Claimable<ProgressBulletBufs>,
    /// Unresolved unit references of a freshly deserialized system.
    pending_refs: Option<Vec<(BulletId, SavedRefs)>>,
}

impl Default for BulletSystem {
    fn default() -> Self {
        Self::new(BulletConfig::default(), WeaponTable::default())
    }
}

impl BulletSystem {
    pub fn new(config: BulletConfig, weapons: WeaponTable) -> Self {
        BulletSystem {
            slots: Vec::new(),
            free: Vec::new(),
            containers: Default::default(),
            config,
            weapons,
            bufs: Claimable::default(),
            pending_refs: None,
        }
    }

    pub fn config(&self) -> &BulletConfig {
        &self.config
    }

    pub fn weapons(&self) -> &WeaponTable {
        &self.weapons
    }

    pub fn bullet_count(&self) -> usize {
        self.containers.iter().map(Vec::len).sum()
    }

    pub fn get(&self, id: BulletId) -> Option<&Bullet> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.bullet.as_ref()
    }

    pub fn get_mut(&mut self, id: BulletId) -> Option<&mut Bullet> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.bullet.as_mut()
    }

    /// Ids in the container of `state`, in processing order.
    pub fn state_vector(&self, state: BulletState) -> &[BulletId] {
        &self.containers[state.container_index()]
    }

    /// State whose container lists `id`.
    pub fn owning_vector(&self, id: BulletId) -> Option<BulletState> {
        BulletState::PROCESS_ORDER
            .into_iter()
            .find(|state| self.state_vector(*state).contains(&id))
    }

    pub fn is_loading(&self) -> bool {
        self.pending_refs.is_some()
    }

    /// Live bullets in container order, then insertion order.
    pub fn active_bullets(&self) -> ActiveBullets<'_> {
        ActiveBullets::new(self)
    }

    pub fn active_cursor(&self) -> ActiveCursor {
        ActiveCursor::default()
    }

    fn insert(&mut self, mut bullet: Bullet) -> BulletId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                BulletId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot::default());
                BulletId::new(self.slots.len() as u32 - 1, 0)
            }
        };
        bullet.id = id;
        self.containers[bullet.state.container_index()].push(id);
        self.slots[id.index()].bullet = Some(bullet);
        id
    }

    fn release(&mut self, id: BulletId) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            if slot.generation == id.generation() && slot.bullet.take().is_some() {
                self.free.push(id.index() as u32);
            }
        }
    }

    /// Transfer `id` between containers, keeping the order of the rest.
    fn move_bullet(&mut self, id: BulletId, from: BulletState, to: BulletState) {
        let container = &mut self.containers[from.container_index()];
        let Some(position) = container.iter().position(|&other| other == id) else {
            panic!("bullet {:?} is not in the {} container", id, from.name());
        };
        container.remove(position);
        self.containers[to.container_index()].push(id);
        if let Some(bullet) = self.get_mut(id) {
            bullet.state = to;
        }
    }

    /// Spawn a bullet of `weapon` fired by `parent`.
    ///
    /// The target is taken from the parent's current attack target, or its
    /// order position when it has none. Returns None when the weapon is
    /// unknown, the bullet limit is reached, or an attacker-anchored weapon
    /// has no living parent.
    pub fn allocate_bullet<W: UnitWorld>(
        &mut self,
        world: &mut W,
        parent: Option<UnitId>,
        player: u8,
        direction: u8,
        weapon: WeaponId,
        pos: Point,
    ) -> Option<BulletId> {
        assert!(!self.is_loading(), "allocate_bullet called before finish_load");
        if self.bullet_count() >= self.config.max_bullets {
            warn!(weapon = weapon.0, limit = self.config.max_bullets, "bullet limit reached");
            return None;
        }
        let Some(data) = self.weapons.get(weapon) else {
            debug!(weapon = weapon.0, "bullet spawn refused: unknown weapon");
            return None;
        };

        let parent_info = parent.and_then(|unit| world.unit(unit));
        let needs_parent = matches!(
            data.behaviour,
            WeaponBehaviour::AppearOnAttacker | WeaponBehaviour::AttackAndSelfDestruct
        );
        if needs_parent && parent_info.as_ref().map_or(true, |info| info.is_dead()) {
            debug!(weapon = weapon.0, "bullet spawn refused: parent is gone");
            return None;
        }

        let mut bullet = Bullet::new(
            BulletId::new(u32::MAX, 0),
            weapon,
            data,
            player,
            parent,
            pos,
            direction,
        );
        if let Some(info) = &parent_info {
            bullet.flags.hallucinated = info.is_hallucination;
            let target = info
                .target
                .and_then(|target| world.unit(target).map(|unit| (target, unit)))
                .filter(|(_, unit)| !unit.is_dead());
            match target {
                Some((target, unit)) => {
                    bullet.set_target(Some(target));
                    bullet.move_target = unit.position;
                }
                None => bullet.move_target = info.order_target_pos,
            }
        }

        if let Some(target) = bullet.target {
            let miss_chance = self.config.miss_chance as u32;
            if world.is_on_higher_ground(target, pos) && world.rng().gen_range(0..256) < miss_chance {
                let spread = self.config.near_unit_spread;
                let rng = world.rng();
                let dx = rng.gen_range(-spread..=spread);
                let dy = rng.gen_range(-spread..=spread);
                bullet.flags.missed = true;
                bullet.move_target = bullet.move_target.offset(dx, dy);
            }
        }
        if data.behaviour == WeaponBehaviour::AttackTarget3x3 {
            let spread = self.config.near_unit_spread;
            let rng = world.rng();
            bullet.spread_seed = rng.gen();
            bullet.near_offset = Point::new(
                rng.gen_range(-spread..=spread),
                rng.gen_range(-spread..=spread),
            );
            bullet.move_target = bullet.move_target.offset(bullet.near_offset.x, bullet.near_offset.y);
        }

        let id = self.insert(bullet);
        debug!(bullet = ?id, weapon = weapon.0, player, "bullet spawned");
        Some(id)
    }

    /// Advance every bullet by one frame and resolve everything it caused.
    ///
    /// # Panics
    ///
    /// If called reentrantly or before `finish_load`.
    pub fn progress_frames<W: UnitWorld, A: AiHandler>(
        &mut self,
        world: &mut W,
        ai: &mut A,
        input: BulletFramesInput,
    ) -> FrameReport {
        assert!(!self.is_loading(), "progress_frames called before finish_load");
        let mut claimed = self.bufs.claim();
        let bufs: &mut ProgressBulletBufs = &mut claimed;

        self.step_bullets(world, bufs);
        self.apply_transitions(world, bufs);
        self.process_hits(world, &input, bufs);

        for spell in &bufs.spells {
            world.cast_spell(spell);
        }

        let mut unit_was_hit = Vec::new();
        let mut seen = HashSet::new();
        for &(target, attacker) in &bufs.unit_was_hit {
            if !seen.insert((target, attacker)) {
                continue;
            }
            unit_was_hit.push((target, attacker));
            if world.unit_was_hit(target, attacker, true) {
                bufs.ai_react.push((target, attacker, true));
            }
        }

        let mut ai_hits = Vec::new();
        process_ai_react_to_hit(&bufs.ai_react, &input.helping_units, &mut ai_hits);
        if !ai_hits.is_empty() {
            ai.react_to_hits(&ai_hits);
        }

        let mut killed = Vec::with_capacity(bufs.killed_units.len());
        for &(unit, killer) in &bufs.killed_units {
            world.unit_killed(unit, killer);
            self.remove_from_bullet_targets(unit);
            killed.push(unit);
        }

        let dying = std::mem::take(&mut self.containers[BulletState::Die.container_index()]);
        for &id in &dying {
            self.release(id);
        }

        debug!(
            bullets = self.bullet_count(),
            hits = bufs.resolved.len(),
            killed = killed.len(),
            deleted = dying.len(),
            "frame progressed"
        );
        FrameReport {
            hits: std::mem::take(&mut bufs.resolved),
            unit_was_hit,
            ai_hits,
            spells: std::mem::take(&mut bufs.spells),
            killed,
            deleted: dying.len(),
        }
    }

    fn step_bullets<W: UnitWorld>(&mut self, world: &W, bufs: &mut ProgressBulletBufs) {
        for state in BulletState::PROCESS_ORDER {
            for &id in &self.containers[state.container_index()] {
                let Some(bullet) = self.slots[id.index()].bullet.as_mut() else {
                    panic!("container lists deleted bullet {:?}", id);
                };
                let step = match self.weapons.get(bullet.weapon) {
                    Some(data) => bullet.step(world, data, &self.config, &mut bufs.area_scratch),
                    None => Step {
                        new_state: BulletState::Die,
                        hit_count: 0,
                        bounce_target: None,
                    },
                };
                bufs.transitions.push(Transition {
                    bullet: id,
                    old_state: state,
                    step,
                });
            }
        }
    }

    /// Missile damage against the old targets first, then retargeting,
    /// then container moves.
    fn apply_transitions<W: UnitWorld>(&mut self, world: &W, bufs: &mut ProgressBulletBufs) {
        let transitions = std::mem::take(&mut bufs.transitions);
        for transition in &transitions {
            let Some(bullet) = self.get(transition.bullet) else {
                continue;
            };
            if let Some(data) = self.weapons.get(bullet.weapon) {
                for _ in 0..transition.step.hit_count {
                    do_missile_dmg(bullet, data, world, bufs);
                }
            }
            if let Some(next) = transition.step.bounce_target {
                bufs.bounce_targets.push((transition.bullet, next));
            }
        }

        let bounce_targets = std::mem::take(&mut bufs.bounce_targets);
        for &(id, next) in &bounce_targets {
            let spent = transitions
                .iter()
                .any(|transition| transition.bullet == id && transition.step.hit_count > 0);
            if let Some(bullet) = self.get_mut(id) {
                if spent {
                    bullet.bounces_remaining = bullet.bounces_remaining.saturating_sub(1);
                }
                bullet.set_target(Some(next));
            }
        }
        bufs.bounce_targets = bounce_targets;

        for transition in &transitions {
            if transition.step.new_state != transition.old_state {
                self.move_bullet(transition.bullet, transition.old_state, transition.step.new_state);
            }
        }
        bufs.transitions = transitions;
    }

    /// Resolve the frame's hits: caller weapon damage first, then bullet
    /// hits in processing order, then hallucination hits.
    fn process_hits<W: UnitWorld>(
        &self,
        world: &mut W,
        input: &BulletFramesInput,
        bufs: &mut ProgressBulletBufs,
    ) {
        let damage_type = |weapon: WeaponId| {
            self.weapons
                .get(weapon)
                .map_or(DamageType::Normal, |data| data.damage_type)
        };

        for hit in &input.weapon_damages {
            bufs.add_hit(
                &*world,
                hit.target,
                hit.attacker,
                hit.damage,
                hit.weapon,
                damage_type(hit.weapon),
                hit.player,
            );
        }
        let hits = std::mem::take(&mut bufs.hits);
        for hit in &hits {
            bufs.add_hit(
                &*world,
                hit.target,
                hit.attacker,
                hit.damage,
                hit.weapon,
                damage_type(hit.weapon),
                hit.player,
            );
        }
        bufs.hits = hits;

        let bullet_hallucinations = std::mem::take(&mut bufs.hallucination_hits);
        for hit in input.hallucination_hits.iter().chain(&bullet_hallucinations) {
            world.hallucination_hit(hit.target, hit.attacker, hit.direction);
            bufs.unit_was_hit.push((hit.target, hit.attacker));
        }
        bufs.hallucination_hits = bullet_hallucinations;

        bufs.commit_damage(world);
    }

    /// Forget `unit` in every bullet. Bullets chasing it fly on to its last
    /// known position.
    pub fn remove_from_bullet_targets(&mut self, unit: UnitId) {
        let referencing = self
            .slots
            .iter_mut()
            .filter_map(|slot| slot.bullet.as_mut())
            .filter(|bullet| bullet.references(unit));
        for bullet in referencing {
            if bullet.target == Some(unit) {
                bullet.target = None;
            }
            if bullet.previous_target == Some(unit) {
                bullet.previous_target = None;
            }
            if bullet.move_target_unit == Some(unit) {
                bullet.move_target_unit = None;
            }
            if bullet.parent == Some(unit) {
                bullet.parent = None;
            }
        }
    }

    /// Destroy a bullet from outside; it is deleted at the end of the next
    /// frame without dealing damage. Returns false for unknown ids.
    pub fn kill_bullet(&mut self, id: BulletId) -> bool {
        let Some(bullet) = self.get_mut(id) else {
            return false;
        };
        let state = bullet.state;
        bullet.sprite.set_animation(Animation::Death, false);
        if state != BulletState::Die {
            self.move_bullet(id, state, BulletState::Die);
        }
        true
    }

    /// Damage a bullet that has hit points. Returns true if it was destroyed.
    /// Bullets without hit points cannot be destroyed this way.
    pub fn damage_bullet(&mut self, id: BulletId, amount: u32) -> bool {
        let Some(bullet) = self.get_mut(id) else {
            return false;
        };
        if bullet.hitpoints == 0 {
            return false;
        }
        bullet.hitpoints = bullet.hitpoints.saturating_sub(amount);
        if bullet.hitpoints == 0 {
            return self.kill_bullet(id);
        }
        false
    }

    /// Remove every bullet, e.g. when a game ends. Slots keep their
    /// generation so old handles stay dead.
    pub fn delete_all(&mut self) {
        let count = self.bullet_count();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.bullet.take().is_some() {
                self.free.push(index as u32);
            }
        }
        for container in &mut self.containers {
            container.clear();
        }
        self.pending_refs = None;
        info!(count, "deleted all bullets");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::constants::FIXED_ONE;
    use crate::models::unit::UnitInfo;
    use crate::sandbox::{SandboxAi, SandboxWorld};

    fn setup_duel() -> (BulletSystem, SandboxWorld, UnitId, UnitId) {
        let mut world = SandboxWorld::new(42);
        let target = world.spawn(UnitInfo {
            position: Point::new(200, 100),
            player: 2,
            hitpoints: 40 * FIXED_ONE,
            dimensions: [8, 9, 8, 10],
            ..Default::default()
        });
        let shooter = world.spawn(UnitInfo {
            position: Point::new(100, 100),
            player: 1,
            hitpoints: 40 * FIXED_ONE,
            dimensions: [8, 9, 8, 10],
            target: Some(target),
            ..Default::default()
        });
        (BulletSystem::default(), world, shooter, target)
    }

    fn assert_single_ownership(system: &BulletSystem) {
        assert_eq!(system.bullet_count(), system.active_bullets().count());
        for bullet in system.active_bullets() {
            assert_eq!(system.owning_vector(bullet.id()), Some(bullet.state()));
        }
    }

    #[test]
    fn allocate_puts_bullet_in_init() {
        let (mut system, mut world, shooter, target) = setup_duel();
        let id = system
            .allocate_bullet(&mut world, Some(shooter), 1, 64, WeaponId::GAUSS_RIFLE, Point::new(100, 100))
            .unwrap();
        assert_eq!(system.state_vector(BulletState::Init), &[id]);
        assert_eq!(system.get(id).unwrap().target, Some(target));
        assert_single_ownership(&system);
    }

    #[test]
    fn unknown_weapon_is_refused() {
        let (mut system, mut world, shooter, _) = setup_duel();
        let id = system.allocate_bullet(&mut world, Some(shooter), 1, 0, WeaponId::NONE, Point::new(0, 0));
        assert!(id.is_none());
        assert_eq!(system.bullet_count(), 0);
    }

    #[test]
    fn bullet_limit_is_enforced() {
        let (_, mut world, shooter, _) = setup_duel();
        let config = BulletConfig {
            max_bullets: 2,
            ..Default::default()
        };
        let mut system = BulletSystem::new(config, WeaponTable::default());
        let pos = Point::new(100, 100);
        assert!(system.allocate_bullet(&mut world, Some(shooter), 1, 0, WeaponId::GAUSS_RIFLE, pos).is_some());
        assert!(system.allocate_bullet(&mut world, Some(shooter), 1, 0, WeaponId::GAUSS_RIFLE, pos).is_some());
        assert!(system.allocate_bullet(&mut world, Some(shooter), 1, 0, WeaponId::GAUSS_RIFLE, pos).is_none());
    }

    #[test]
    fn attacker_anchored_weapon_needs_parent() {
        let (mut system, mut world, _, _) = setup_duel();
        let id = system.allocate_bullet(&mut world, None, 1, 0, WeaponId::FLAME_THROWER, Point::new(0, 0));
        assert!(id.is_none());
    }

    #[test]
    fn gauss_rifle_hits_and_is_deleted_in_one_frame() {
        let (mut system, mut world, shooter, target) = setup_duel();
        let mut ai = SandboxAi::default();
        system.allocate_bullet(&mut world, Some(shooter), 1, 64, WeaponId::GAUSS_RIFLE, Point::new(100, 100));

        let report = system.progress_frames(&mut world, &mut ai, BulletFramesInput::default());
        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].hp_loss, 6 * FIXED_ONE);
        assert_eq!(report.deleted, 1);
        assert_eq!(system.bullet_count(), 0);
        assert_eq!(world.unit(target).unwrap().hitpoints, 34 * FIXED_ONE);
        assert_eq!(report.unit_was_hit, vec![(target, shooter)]);
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let (mut system, mut world, shooter, _) = setup_duel();
        let mut ai = SandboxAi::default();
        let pos = Point::new(100, 100);
        let first = system
            .allocate_bullet(&mut world, Some(shooter), 1, 0, WeaponId::GAUSS_RIFLE, pos)
            .unwrap();
        system.progress_frames(&mut world, &mut ai, BulletFramesInput::default());
        let second = system
            .allocate_bullet(&mut world, Some(shooter), 1, 0, WeaponId::GAUSS_RIFLE, pos)
            .unwrap();
        assert_eq!(first.index(), second.index());
        assert_ne!(first.generation(), second.generation());
        assert!(system.get(first).is_none());
        assert!(system.get(second).is_some());
    }

    #[test]
    fn killed_bullet_is_deleted_without_damage() {
        let (mut system, mut world, shooter, target) = setup_duel();
        let mut ai = SandboxAi::default();
        let id = system
            .allocate_bullet(&mut world, Some(shooter), 1, 64, WeaponId::YAMATO_GUN, Point::new(100, 100))
            .unwrap();
        system.progress_frames(&mut world, &mut ai, BulletFramesInput::default());
        assert_eq!(system.owning_vector(id), Some(BulletState::MoveToTarget));

        assert!(system.kill_bullet(id));
        assert_eq!(system.owning_vector(id), Some(BulletState::Die));
        let report = system.progress_frames(&mut world, &mut ai, BulletFramesInput::default());
        assert!(report.hits.is_empty());
        assert_eq!(report.deleted, 1);
        assert_eq!(world.unit(target).unwrap().hitpoints, 40 * FIXED_ONE);
    }

    #[test]
    fn damage_bullet_destroys_at_zero() {
        let (mut system, mut world, shooter, _) = setup_duel();
        let id = system
            .allocate_bullet(&mut world, Some(shooter), 1, 64, WeaponId::SCARAB, Point::new(100, 100))
            .unwrap();
        system.get_mut(id).unwrap().hitpoints = 20;
        assert!(!system.damage_bullet(id, 5));
        assert!(system.damage_bullet(id, 30));
        assert_eq!(system.owning_vector(id), Some(BulletState::Die));
    }

    #[test]
    fn bullets_without_hitpoints_ignore_damage() {
        let (mut system, mut world, shooter, _) = setup_duel();
        let id = system
            .allocate_bullet(&mut world, Some(shooter), 1, 64, WeaponId::YAMATO_GUN, Point::new(100, 100))
            .unwrap();
        assert_eq!(system.get(id).unwrap().hitpoints, 0);
        assert!(!system.damage_bullet(id, 1));
        assert_eq!(system.owning_vector(id), Some(BulletState::Init));
    }

    #[test]
    fn dead_target_is_forgotten() {
        let (mut system, mut world, shooter, target) = setup_duel();
        let id = system
            .allocate_bullet(&mut world, Some(shooter), 1, 64, WeaponId::YAMATO_GUN, Point::new(100, 100))
            .unwrap();
        system.remove_from_bullet_targets(target);
        assert_eq!(system.get(id).unwrap().target, None);
        assert_eq!(system.get(id).unwrap().parent, Some(shooter));
    }

    #[test]
    fn delete_all_empties_every_container() {
        let (mut system, mut world, shooter, _) = setup_duel();
        let mut ai = SandboxAi::default();
        let pos = Point::new(100, 100);
        system.allocate_bullet(&mut world, Some(shooter), 1, 64, WeaponId::YAMATO_GUN, pos);
        system.progress_frames(&mut world, &mut ai, BulletFramesInput::default());
        system.allocate_bullet(&mut world, Some(shooter), 1, 64, WeaponId::GAUSS_RIFLE, pos);
        assert_eq!(system.bullet_count(), 2);

        system.delete_all();
        assert_eq!(system.bullet_count(), 0);
        assert_eq!(system.active_bullets().count(), 0);
    }

    #[test]
    fn handles_from_before_delete_all_stay_dead() {
        let (mut system, mut world, shooter, _) = setup_duel();
        let pos = Point::new(100, 100);
        let old = system
            .allocate_bullet(&mut world, Some(shooter), 1, 64, WeaponId::YAMATO_GUN, pos)
            .unwrap();
        system.delete_all();
        let new = system
            .allocate_bullet(&mut world, Some(shooter), 1, 64, WeaponId::SCARAB, pos)
            .unwrap();
        assert_ne!(old, new);
        assert!(system.get(old).is_none());
        assert_eq!(system.get(new).unwrap().weapon, WeaponId::SCARAB);
        assert_single_ownership(&system);
    }
}
