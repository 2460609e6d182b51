use serde::{Deserialize, Serialize};

/// Unit orders the bullet code needs to tell apart.
///
/// Only the classification matters here; the unit subsystem owns the
/// order state machine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Order {
    Die,
    #[default]
    Stop,
    Guard,
    PlayerGuard,
    Move,
    AttackUnit,
    AttackMove,
    Patrol,
    HoldPosition,
    Nothing,
    BeingInfested,
    SpiderMine,
    DroneStartBuild,
    InfestMine4,
    BuildTerran,
    BuildProtoss1,
    BuildProtoss2,
    ConstructingBuilding,
    PlaceAddon,
    BuildNydusExit,
    Land,
    LiftOff,
    DroneLiftOff,
    HarvestObscured,
    MoveToGas,
    WaitForGas,
    HarvestGas,
    MoveToMinerals,
    WaitForMinerals,
    MiningMinerals,
    Harvest3,
    StopHarvest,
    CtfCop2,
}

/// Whether a unit executing `order` may be picked as a bullet victim.
/// Units that are dying, morphing, landing or hidden inside a resource
/// are not.
pub fn is_targetable_order(order: Order) -> bool {
    !matches!(
        order,
        Order::Die
            | Order::BeingInfested
            | Order::SpiderMine
            | Order::DroneStartBuild
            | Order::InfestMine4
            | Order::BuildTerran
            | Order::BuildProtoss1
            | Order::BuildProtoss2
            | Order::ConstructingBuilding
            | Order::PlaceAddon
            | Order::BuildNydusExit
            | Order::Land
            | Order::LiftOff
            | Order::DroneLiftOff
            | Order::HarvestObscured
            | Order::MoveToGas
            | Order::WaitForGas
            | Order::HarvestGas
            | Order::MoveToMinerals
            | Order::WaitForMinerals
            | Order::MiningMinerals
            | Order::Harvest3
            | Order::StopHarvest
            | Order::CtfCop2
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combat_orders_are_targetable() {
        for order in [
            Order::Stop,
            Order::Guard,
            Order::Move,
            Order::AttackUnit,
            Order::Patrol,
        ] {
            assert!(is_targetable_order(order), "{:?}", order);
        }
    }

    #[test]
    fn harvest_and_morph_orders_are_not() {
        for order in [
            Order::Die,
            Order::HarvestGas,
            Order::MiningMinerals,
            Order::DroneStartBuild,
            Order::LiftOff,
        ] {
            assert!(!is_targetable_order(order), "{:?}", order);
        }
    }
}
