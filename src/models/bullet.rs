use serde::{Deserialize, Serialize};

use super::constants::BulletState;
use super::position::{ExactPoint, Point};
use super::sprite::Sprite;
use super::unit::UnitId;
use super::weapon::{WeaponData, WeaponId};

/// Handle of a bullet inside a `BulletSystem`.
///
/// The generation changes every time an arena slot is reused, so a
/// handle to a deleted bullet never resolves to its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BulletId {
    index: u32,
    generation: u32,
}

impl BulletId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        BulletId { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulletFlags {
    /// Rolled a miss at launch; a normal hit does nothing.
    pub missed: bool,
    /// Fired by a hallucination; hits deal no damage.
    pub hallucinated: bool,
}

/// A single projectile.
///
/// Unit references are weak: they are identities that the unit world may
/// no longer know, so every read goes through `UnitWorld::unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    #[serde(skip, default = "placeholder_id")]
    pub(crate) id: BulletId,
    pub(crate) state: BulletState,
    pub weapon: WeaponId,
    pub player: u8,
    pub hitpoints: u32,
    pub sprite: Sprite,

    pub position: Point,
    pub exact_position: ExactPoint,
    pub facing_direction: u8,
    pub movement_direction: u8,
    pub current_speed: i32,
    pub next_speed: i32,
    pub top_speed: i32,
    pub acceleration: i32,
    pub move_target: Point,
    pub move_target_unit: Option<UnitId>,

    pub target: Option<UnitId>,
    /// Target before the last bounce; the next bounce skips it.
    pub previous_target: Option<UnitId>,
    pub parent: Option<UnitId>,
    pub time_remaining: u8,
    pub pulse_cooldown: u8,
    pub bounces_remaining: u8,
    pub flags: BulletFlags,
    pub spread_seed: u8,
    /// Aim offset from the target for near-unit bullets.
    pub near_offset: Point,
}

fn placeholder_id() -> BulletId {
    BulletId::new(u32::MAX, 0)
}

impl Bullet {
    pub(crate) fn new(
        id: BulletId,
        weapon: WeaponId,
        data: &WeaponData,
        player: u8,
        parent: Option<UnitId>,
        pos: Point,
        direction: u8,
    ) -> Self {
        Bullet {
            id,
            state: BulletState::Init,
            weapon,
            player,
            hitpoints: data.hitpoints,
            sprite: Sprite::new(data.sprite, pos, direction),
            position: pos,
            exact_position: pos.to_exact(),
            facing_direction: direction,
            movement_direction: direction,
            current_speed: 0,
            next_speed: 0,
            top_speed: data.top_speed,
            acceleration: data.acceleration,
            move_target: pos,
            move_target_unit: None,
            target: None,
            previous_target: None,
            parent,
            time_remaining: data.lifetime,
            pulse_cooldown: 0,
            bounces_remaining: data.bounces,
            flags: BulletFlags::default(),
            spread_seed: 0,
            near_offset: Point::default(),
        }
    }

    pub fn id(&self) -> BulletId {
        self.id
    }

    pub fn state(&self) -> BulletState {
        self.state
    }

    /// Retarget; the old target is remembered as `previous_target`.
    pub fn set_target(&mut self, new_target: Option<UnitId>) {
        if self.target != new_target {
            self.previous_target = self.target;
        }
        self.target = new_target;
        self.move_target_unit = new_target;
    }

    /// Teleport to `pos`, dragging the sprite along.
    pub fn move_to(&mut self, pos: Point) {
        self.position = pos;
        self.exact_position = pos.to_exact();
        self.sprite.position = pos;
    }

    /// True if `unit` is referenced in any way.
    pub fn references(&self, unit: UnitId) -> bool {
        self.target == Some(unit)
            || self.previous_target == Some(unit)
            || self.parent == Some(unit)
            || self.move_target_unit == Some(unit)
    }
}
