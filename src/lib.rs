//! Volley
//!
//! A deterministic projectile simulation for real-time strategy combat.
//!
//! # Overview
//!
//! Every in-flight bullet is owned by a [`BulletSystem`]. Each frame the
//! system advances all bullets through their state machines, buffers every
//! hit, resolves the hits against the units in a fixed order and hands the
//! resulting notifications to the unit world and the AI. Identical input
//! produces identical output, so independent simulations stay in lockstep.
//!
//! # Modules
//!
//! - [`models`] - Bullets, weapons, unit snapshots and configuration
//! - [`services`] - State machine, damage resolution and orchestration
//! - [`game_engine`] - [`Simulation`], a frame-counting driver
//! - [`sandbox`] - In-memory unit world for tests and headless runs
//!
//! # Example
//!
//! ```rust
//! use volley::models::position::Point;
//! use volley::models::unit::UnitInfo;
//! use volley::models::weapon::WeaponId;
//! use volley::sandbox::{SandboxAi, SandboxWorld};
//! use volley::Simulation;
//!
//! let mut world = SandboxWorld::new(42);
//! let target = world.spawn(UnitInfo {
//!     position: Point::new(160, 100),
//!     player: 2,
//!     hitpoints: 40 * 256,
//!     ..Default::default()
//! });
//! let marine = world.spawn(UnitInfo {
//!     position: Point::new(100, 100),
//!     player: 1,
//!     hitpoints: 40 * 256,
//!     target: Some(target),
//!     ..Default::default()
//! });
//!
//! let mut sim = Simulation::new(world, SandboxAi::default());
//! sim.fire(marine, WeaponId::GAUSS_RIFLE);
//! let report = sim.step();
//! assert_eq!(report.hits.len(), 1);
//! ```

pub mod game_engine;
pub mod models;
pub mod sandbox;
pub mod services;

// Re-export commonly used types
pub use game_engine::{SavedSimulation, Simulation};
pub use models::bullet::{Bullet, BulletId};
pub use models::config::BulletConfig;
pub use models::constants::BulletState;
pub use models::errors::{BulletError, BulletResult};
pub use models::weapon::{WeaponId, WeaponTable};
pub use services::bullet_system::{BulletFramesInput, BulletSystem, FrameReport};
pub use services::world::{AiHandler, UnitWorld};
