//! Frame driver
//!
//! `Simulation` bundles a `BulletSystem` with the unit world and AI it runs
//! against and counts frames. It is the explicit context that replaces any
//! process-wide bullet state: two simulations never share anything.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::bullet::BulletId;
use crate::models::config::BulletConfig;
use crate::models::errors::BulletResult;
use crate::models::position::direction_between;
use crate::models::unit::UnitId;
use crate::models::weapon::{WeaponId, WeaponTable};
use crate::services::ai::collect_helping_units;
use crate::services::bullet_system::{BulletFramesInput, BulletSystem, FrameReport, SavedBulletSystem};
use crate::services::damage::{HallucinationHit, WeaponDamage};
use crate::services::world::{AiHandler, UnitWorld};

/// Bullet state of a saved simulation. The unit world saves itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSimulation {
    pub frame: u32,
    pub bullets: SavedBulletSystem,
}

pub struct Simulation<W: UnitWorld, A: AiHandler> {
    bullets: BulletSystem,
    world: W,
    ai: A,
    frame: u32,
}

impl<W: UnitWorld, A: AiHandler> Simulation<W, A> {
    /// Creates a simulation with the built-in weapons and default tunables
    pub fn new(world: W, ai: A) -> Self {
        Self::with_system(BulletSystem::default(), world, ai)
    }

    pub fn with_system(bullets: BulletSystem, world: W, ai: A) -> Self {
        Simulation {
            bullets,
            world,
            ai,
            frame: 0,
        }
    }

    pub fn bullets(&self) -> &BulletSystem {
        &self.bullets
    }

    pub fn bullets_mut(&mut self) -> &mut BulletSystem {
        &mut self.bullets
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn ai(&self) -> &A {
        &self.ai
    }

    /// Frames progressed so far
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Fire `weapon` from `shooter` at its current target.
    ///
    /// The bullet starts at the shooter's position, facing its target.
    pub fn fire(&mut self, shooter: UnitId, weapon: WeaponId) -> Option<BulletId> {
        let info = self.world.unit(shooter)?;
        let aim = info
            .target
            .and_then(|target| self.world.unit(target))
            .map_or(info.order_target_pos, |target| target.position);
        let direction = direction_between(info.position, aim);
        self.bullets.allocate_bullet(
            &mut self.world,
            Some(shooter),
            info.player,
            direction,
            weapon,
            info.position,
        )
    }

    /// Progress one frame with no outside damage.
    pub fn step(&mut self) -> FrameReport {
        self.step_with(Vec::new(), Vec::new())
    }

    /// Progress one frame, resolving `weapon_damages` and
    /// `hallucination_hits` along with the bullets' own hits.
    ///
    /// Helping units are looked up for every unit a bullet is aimed at and
    /// every unit named in the outside damage.
    pub fn step_with(
        &mut self,
        weapon_damages: Vec<WeaponDamage>,
        hallucination_hits: Vec<HallucinationHit>,
    ) -> FrameReport {
        let targets: Vec<UnitId> = self
            .bullets
            .active_bullets()
            .filter_map(|bullet| bullet.target)
            .chain(weapon_damages.iter().map(|hit| hit.target))
            .chain(hallucination_hits.iter().map(|hit| hit.target))
            .collect();
        let helping_units = collect_helping_units(&self.world, &self.ai, targets);

        let input = BulletFramesInput {
            weapon_damages,
            hallucination_hits,
            helping_units,
        };
        let report = self
            .bullets
            .progress_frames(&mut self.world, &mut self.ai, input);
        self.frame += 1;
        debug!(frame = self.frame, deleted = report.deleted, "simulation frame");
        report
    }

    /// Progress `frames` frames, returning every report in order.
    pub fn run(&mut self, frames: u32) -> Vec<FrameReport> {
        (0..frames).map(|_| self.step()).collect()
    }

    pub fn save(&self) -> SavedSimulation {
        SavedSimulation {
            frame: self.frame,
            bullets: self.bullets.serialize(&self.world),
        }
    }

    pub fn save_json(&self) -> BulletResult<String> {
        Ok(serde_json::to_string(&self.save())?)
    }

    /// Rebuild a simulation around an already loaded `world`.
    pub fn load(
        saved: SavedSimulation,
        world: W,
        ai: A,
        config: BulletConfig,
        weapons: WeaponTable,
    ) -> BulletResult<Self> {
        let mut bullets = BulletSystem::deserialize(saved.bullets, config, weapons)?;
        bullets.finish_load(&world);
        Ok(Simulation {
            bullets,
            world,
            ai,
            frame: saved.frame,
        })
    }

    pub fn load_json(
        json: &str,
        world: W,
        ai: A,
        config: BulletConfig,
        weapons: WeaponTable,
    ) -> BulletResult<Self> {
        let saved: SavedSimulation = serde_json::from_str(json)?;
        Self::load(saved, world, ai, config, weapons)
    }
}
