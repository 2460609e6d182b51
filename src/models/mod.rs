//! Domain models
//!
//! Plain data describing bullets, weapons and the parts of units the
//! bullet code reads. Behaviour lives in `services`.

pub mod bullet;
pub mod config;
pub mod constants;
pub mod errors;
pub mod order;
pub mod position;
pub mod spell;
pub mod sprite;
pub mod unit;
pub mod weapon;
