use serde::{Deserialize, Serialize};

use super::position::Point;
use super::unit::UnitId;

/// Status effects and spells a bullet can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tech {
    Lockdown,
    EmpShockwave,
    Irradiate,
    Parasite,
    SpawnBroodlings,
    Ensnare,
    DarkSwarm,
    Plague,
    Consume,
    StasisField,
    Restoration,
    DisruptionWeb,
    AcidSpores,
    MindControl,
    Feedback,
    OpticalFlare,
    Maelstrom,
}

/// A spell to apply once the frame's damage has been resolved.
/// `target` is None for area spells centered on `pos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellCast {
    pub player: u8,
    pub tech: Tech,
    pub pos: Point,
    pub radius: i32,
    pub parent: Option<UnitId>,
    pub target: Option<UnitId>,
}
