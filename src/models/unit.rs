use serde::{Deserialize, Serialize};

use super::order::{is_targetable_order, Order};
use super::position::{Point, Rect};

/// Stable identity of a unit owned by the unit subsystem.
///
/// Bullets only ever hold these, never the unit itself; every use
/// revalidates through `UnitWorld::unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

/// Unit size class, scales concussive and explosive damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSize {
    Independent,
    #[default]
    Small,
    Medium,
    Large,
}

/// Snapshot of what the bullet code reads from a unit.
/// Hit points and shields are fixed-point (256 = 1 hp).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitInfo {
    pub position: Point,
    pub player: u8,
    pub hitpoints: i32,
    pub shields: i32,
    pub armor: u8,
    pub shield_armor: u8,
    pub size: UnitSize,
    pub order: Order,
    /// Half extents of the unit's collision box: left, up, right, down.
    pub dimensions: [i32; 4],
    /// Current attack target, read when the unit fires a bullet.
    pub target: Option<UnitId>,
    pub order_target_pos: Point,
    pub acid_spores: u8,
    pub is_air: bool,
    pub is_building: bool,
    pub is_hallucination: bool,
    pub is_invincible: bool,
    pub is_burrowed: bool,
}

impl UnitInfo {
    pub fn is_dead(&self) -> bool {
        self.hitpoints <= 0 || self.order == Order::Die
    }

    /// Alive, hittable and not busy with an order that hides it.
    pub fn is_targetable(&self) -> bool {
        !self.is_dead() && !self.is_invincible && is_targetable_order(self.order)
    }

    pub fn bounds(&self) -> Rect {
        let [left, up, right, down] = self.dimensions;
        Rect {
            left: self.position.x - left,
            top: self.position.y - up,
            right: self.position.x + right,
            bottom: self.position.y + down,
        }
    }

    /// Edge-to-point distance used by splash radii.
    pub fn distance_to(&self, point: Point) -> i32 {
        self.bounds().distance_to(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_units_are_not_targetable() {
        let mut unit = UnitInfo {
            hitpoints: 40 * 256,
            ..Default::default()
        };
        assert!(unit.is_targetable());

        unit.hitpoints = 0;
        assert!(unit.is_dead());
        assert!(!unit.is_targetable());
    }

    #[test]
    fn harvesting_units_are_not_targetable() {
        let unit = UnitInfo {
            hitpoints: 256,
            order: Order::HarvestGas,
            ..Default::default()
        };
        assert!(!unit.is_targetable());
    }

    #[test]
    fn distance_is_measured_to_box_edge() {
        let unit = UnitInfo {
            position: Point::new(100, 100),
            dimensions: [8, 8, 8, 8],
            ..Default::default()
        };
        assert_eq!(unit.distance_to(Point::new(104, 96)), 0);
        assert_eq!(unit.distance_to(Point::new(128, 100)), 20);
    }
}
