//! Per-state step functions
//!
//! A step only moves the bullet itself and decides what happens next. All
//! damage and every container move is applied afterwards by the bullet
//! system, so a step never observes another bullet's hit of this frame.

use tracing::trace;

use crate::models::bullet::{Bullet, BulletId};
use crate::models::config::BulletConfig;
use crate::models::constants::BulletState;
use crate::models::position::{direction_between, direction_vector, Rect};
use crate::models::sprite::Animation;
use crate::models::unit::{UnitId, UnitInfo};
use crate::models::weapon::{WeaponBehaviour, WeaponData};

use super::world::UnitWorld;

/// Outcome of stepping one bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub new_state: BulletState,
    /// Times the bullet's payload goes off this frame.
    pub hit_count: u8,
    /// Next bounce victim, applied after the current hit.
    pub bounce_target: Option<UnitId>,
}

impl Step {
    fn stay(state: BulletState) -> Self {
        Step {
            new_state: state,
            hit_count: 0,
            bounce_target: None,
        }
    }

    fn to(state: BulletState, hit_count: u8) -> Self {
        Step {
            new_state: state,
            hit_count,
            bounce_target: None,
        }
    }
}

/// A step, remembered until the bullet system applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub bullet: BulletId,
    pub old_state: BulletState,
    pub step: Step,
}

fn live_unit<W: UnitWorld>(world: &W, unit: Option<UnitId>) -> Option<UnitInfo> {
    world.unit(unit?).filter(|info| !info.is_dead())
}

impl Bullet {
    /// Advance this bullet by one frame in its current state.
    pub(crate) fn step<W: UnitWorld>(
        &mut self,
        world: &W,
        data: &WeaponData,
        config: &BulletConfig,
        scratch: &mut Vec<UnitId>,
    ) -> Step {
        let step = match self.state {
            BulletState::Init => self.state_init(world, data),
            BulletState::MoveToPoint => self.state_move_to_point(),
            BulletState::MoveToTarget => self.state_move_to_target(world),
            BulletState::Bounce => self.state_bounce(world, config, scratch),
            BulletState::MoveNearUnit => self.state_move_near_unit(world),
            BulletState::GroundDamage => self.state_ground_damage(config),
            BulletState::Die => Step::stay(BulletState::Die),
        };
        if step.new_state != self.state {
            trace!(
                bullet = ?self.id,
                from = self.state.name(),
                to = step.new_state.name(),
                hits = step.hit_count,
                "bullet state change"
            );
        }
        if step.new_state == BulletState::Die {
            self.sprite.set_animation(Animation::Death, false);
        }
        step
    }

    fn state_init<W: UnitWorld>(&mut self, world: &W, data: &WeaponData) -> Step {
        self.sprite.set_animation(Animation::Flying, false);
        match data.behaviour {
            WeaponBehaviour::FlyToPoint => Step::to(BulletState::MoveToPoint, 0),
            WeaponBehaviour::FlyToTarget => {
                if live_unit(world, self.target).is_some() {
                    Step::to(BulletState::MoveToTarget, 0)
                } else {
                    Step::to(BulletState::MoveToPoint, 0)
                }
            }
            WeaponBehaviour::AppearOnTargetUnit => {
                let pos = live_unit(world, self.target)
                    .map(|target| target.position)
                    .unwrap_or(self.move_target);
                self.move_to(pos);
                Step::to(BulletState::Die, 1)
            }
            WeaponBehaviour::PersistOnTargetSite => {
                self.move_to(self.move_target);
                self.time_remaining = data.lifetime;
                self.pulse_cooldown = 0;
                self.sprite.set_animation(Animation::Persisting, false);
                Step::to(BulletState::GroundDamage, 0)
            }
            WeaponBehaviour::AppearOnTargetSite => {
                self.move_to(self.move_target);
                Step::to(BulletState::Die, 1)
            }
            WeaponBehaviour::AppearOnAttacker => {
                if let Some(parent) = live_unit(world, self.parent) {
                    self.move_to(parent.position);
                }
                Step::to(BulletState::Die, 1)
            }
            WeaponBehaviour::AttackAndSelfDestruct => Step::to(BulletState::Die, 1),
            WeaponBehaviour::Bounce => {
                if live_unit(world, self.target).is_some() {
                    Step::to(BulletState::Bounce, 0)
                } else {
                    Step::to(BulletState::MoveToPoint, 0)
                }
            }
            WeaponBehaviour::AttackTarget3x3 => Step::to(BulletState::MoveNearUnit, 0),
            WeaponBehaviour::GoToMaxRange => {
                let (dx, dy) = direction_vector(self.facing_direction, data.max_range);
                self.move_target = self.position.offset(dx, dy);
                Step::to(BulletState::MoveToPoint, 0)
            }
        }
    }

    /// Accelerate and fly toward `self.move_target`. True on arrival.
    fn advance(&mut self) -> bool {
        self.current_speed = (self.current_speed + self.acceleration).min(self.top_speed);
        self.next_speed = (self.current_speed + self.acceleration).min(self.top_speed);
        if self.position != self.move_target {
            let direction = direction_between(self.position, self.move_target);
            self.facing_direction = direction;
            self.movement_direction = direction;
            self.sprite.direction = direction;
        }
        let arrived = self
            .exact_position
            .step_toward(self.move_target.to_exact(), self.current_speed);
        self.position = self.exact_position.to_point();
        self.sprite.position = self.position;
        arrived
    }

    /// Count down the lifetime. True when it ran out this frame.
    /// A lifetime of 0 never runs out.
    fn tick_lifetime(&mut self) -> bool {
        if self.time_remaining == 0 {
            return false;
        }
        self.time_remaining -= 1;
        self.time_remaining == 0
    }

    fn state_move_to_point(&mut self) -> Step {
        let arrived = self.advance();
        if arrived || self.tick_lifetime() {
            return Step::to(BulletState::Die, 1);
        }
        Step::stay(BulletState::MoveToPoint)
    }

    fn state_move_to_target<W: UnitWorld>(&mut self, world: &W) -> Step {
        let Some(target) = live_unit(world, self.target) else {
            // Target is gone; finish the flight to where it was last seen.
            let step = self.state_move_to_point();
            return match step.new_state {
                BulletState::Die => step,
                _ => Step::to(BulletState::MoveToPoint, 0),
            };
        };
        self.move_target = target.position;
        let arrived = self.advance();
        if arrived || self.tick_lifetime() {
            return Step::to(BulletState::Die, 1);
        }
        Step::stay(BulletState::MoveToTarget)
    }

    fn state_bounce<W: UnitWorld>(
        &mut self,
        world: &W,
        config: &BulletConfig,
        scratch: &mut Vec<UnitId>,
    ) -> Step {
        let target = live_unit(world, self.target);
        if let Some(target) = &target {
            self.move_target = target.position;
        }
        let arrived = self.advance();
        let expired = self.tick_lifetime();
        if !arrived {
            if expired {
                return Step::to(BulletState::Die, 1);
            }
            return Step::stay(BulletState::Bounce);
        }

        if target.is_none() {
            // Nothing to hit here; hop on without spending a bounce.
            return match self.choose_bounce_target(world, config, scratch) {
                Some(next) if !expired => Step {
                    new_state: BulletState::Bounce,
                    hit_count: 0,
                    bounce_target: Some(next),
                },
                _ => Step::to(BulletState::Die, 0),
            };
        }

        if self.bounces_remaining == 0 || expired {
            return Step::to(BulletState::Die, 1);
        }
        match self.choose_bounce_target(world, config, scratch) {
            Some(next) => Step {
                new_state: BulletState::Bounce,
                hit_count: 1,
                bounce_target: Some(next),
            },
            None => Step::to(BulletState::Die, 1),
        }
    }

    fn state_move_near_unit<W: UnitWorld>(&mut self, world: &W) -> Step {
        if let Some(target) = live_unit(world, self.target) {
            self.move_target = target
                .position
                .offset(self.near_offset.x, self.near_offset.y);
        }
        let arrived = self.advance();
        if arrived || self.tick_lifetime() {
            return Step::to(BulletState::Die, 1);
        }
        Step::stay(BulletState::MoveNearUnit)
    }

    fn state_ground_damage(&mut self, config: &BulletConfig) -> Step {
        if self.tick_lifetime() {
            return Step::to(BulletState::Die, 0);
        }
        if self.pulse_cooldown == 0 {
            self.pulse_cooldown = config.ground_pulse_interval.saturating_sub(1);
            return Step::to(BulletState::GroundDamage, 1);
        }
        self.pulse_cooldown -= 1;
        Step::stay(BulletState::GroundDamage)
    }

    /// Closest living enemy around the bullet that is neither the current
    /// nor the previous target. Ties go to the lowest (y, x, id).
    pub(crate) fn choose_bounce_target<W: UnitWorld>(
        &self,
        world: &W,
        config: &BulletConfig,
        scratch: &mut Vec<UnitId>,
    ) -> Option<UnitId> {
        let radius = config.bounce_search_radius;
        world.units_in_area(Rect::around(self.position, radius), scratch);
        scratch
            .iter()
            .copied()
            .filter(|&unit| {
                Some(unit) != self.target
                    && Some(unit) != self.previous_target
                    && Some(unit) != self.parent
            })
            .filter_map(|unit| {
                let info = world.unit(unit)?;
                if !info.is_targetable() || world.are_allies(self.player, info.player) {
                    return None;
                }
                let distance = info.position.distance(self.position);
                (distance <= radius)
                    .then_some(((distance, info.position.y, info.position.x, unit), unit))
            })
            .min_by_key(|&(key, _)| key)
            .map(|(_, unit)| unit)
    }
}
