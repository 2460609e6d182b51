use serde::{Deserialize, Serialize};

/// Number of bullet state containers. Every bullet lives in exactly one.
pub const NUM_STATES: usize = 7;

/// Default cap on live bullets. Spawns past this are refused.
pub const MAX_BULLETS: usize = 100;

/// Radius in which idle allies are asked to help an attacked unit.
pub const CALL_FRIENDS_RADIUS: i32 = 0x60;

/// Search radius for the next bounce victim.
pub const BOUNCE_SEARCH_RADIUS: i32 = 0x60;

/// Frames between two pulses of a ground damage bullet.
pub const GROUND_PULSE_INTERVAL: u8 = 8;

/// Miss chance (out of 256) against a target standing on higher ground.
pub const HIGH_GROUND_MISS_CHANCE: u8 = 136;

/// Half-size of the box a "near unit" bullet aims into.
pub const NEAR_UNIT_SPREAD: i32 = 16;

/// Hit points and speeds are fixed-point with 8 fractional bits.
pub const FIXED_ONE: i32 = 256;

/// Smallest damage a landed hit can deal after armor (half a hit point).
pub const MIN_DAMAGE: i32 = 128;

/// Bumped whenever the saved bullet layout changes.
pub const SAVE_VERSION: u32 = 2;

/// The state a bullet is in. Decides which step function runs each frame
/// and which container owns the bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BulletState {
    Init,
    MoveToPoint,
    MoveToTarget,
    Bounce,
    Die,
    MoveNearUnit,
    GroundDamage,
}

impl BulletState {
    /// Processing order of the containers. Also the order of
    /// `BulletSystem::active_bullets`.
    pub const PROCESS_ORDER: [BulletState; NUM_STATES] = [
        BulletState::Init,
        BulletState::MoveToPoint,
        BulletState::MoveToTarget,
        BulletState::Bounce,
        BulletState::GroundDamage,
        BulletState::MoveNearUnit,
        BulletState::Die,
    ];

    /// Index of this state's container within `PROCESS_ORDER`.
    pub fn container_index(self) -> usize {
        match self {
            BulletState::Init => 0,
            BulletState::MoveToPoint => 1,
            BulletState::MoveToTarget => 2,
            BulletState::Bounce => 3,
            BulletState::GroundDamage => 4,
            BulletState::MoveNearUnit => 5,
            BulletState::Die => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BulletState::Init => "init",
            BulletState::MoveToPoint => "move_to_point",
            BulletState::MoveToTarget => "move_to_target",
            BulletState::Bounce => "bounce",
            BulletState::Die => "die",
            BulletState::MoveNearUnit => "move_near_unit",
            BulletState::GroundDamage => "ground_damage",
        }
    }
}
