//! Bullet services
//!
//! The state machine, impact resolution and frame orchestration, plus the
//! collaborator traits the bullet code is driven through.

pub mod ai;
pub mod bullet_state;
pub mod bullet_system;
pub mod claimable;
pub mod damage;
pub mod missile_damage;
pub mod world;
