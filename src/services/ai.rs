//! Reactions of attacked units and their allies

use std::collections::BTreeMap;

use crate::models::constants::CALL_FRIENDS_RADIUS;
use crate::models::position::Rect;
use crate::models::unit::UnitId;

use super::world::{AiHandler, UnitWorld};

/// One unit that has to respond to `attacker`.
///
/// `main_target_reactions` is true for the unit that was actually hit and
/// false for allies called in to help it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiHit {
    pub unit: UnitId,
    pub attacker: UnitId,
    pub main_target_reactions: bool,
}

/// Allies of each possibly attacked unit, computed before the frame runs.
pub type HelpingUnits = BTreeMap<UnitId, Vec<UnitId>>;

/// Same-player units around `unit` that can help it: alive, targetable,
/// not buildings and not hallucinations. Sorted by id.
pub fn find_nearby_helping_units<W: UnitWorld>(
    world: &W,
    unit: UnitId,
    scratch: &mut Vec<UnitId>,
) -> Vec<UnitId> {
    let Some(info) = world.unit(unit) else {
        return Vec::new();
    };
    world.units_in_area(Rect::around(info.position, CALL_FRIENDS_RADIUS), scratch);

    let mut helpers: Vec<UnitId> = scratch
        .iter()
        .copied()
        .filter(|&other| other != unit)
        .filter(|&other| match world.unit(other) {
            Some(helper) => {
                helper.player == info.player
                    && helper.is_targetable()
                    && !helper.is_building
                    && !helper.is_hallucination
                    && helper.position.distance(info.position) <= CALL_FRIENDS_RADIUS
            }
            None => false,
        })
        .collect();
    helpers.sort();
    helpers.dedup();
    helpers
}

/// Ask `ai` for the helpers of every unit in `units`.
pub fn collect_helping_units<W: UnitWorld, A: AiHandler>(
    world: &W,
    ai: &A,
    units: impl IntoIterator<Item = UnitId>,
) -> HelpingUnits {
    let mut scratch = Vec::new();
    let mut helping = HelpingUnits::new();
    for unit in units {
        if helping.contains_key(&unit) {
            continue;
        }
        let helpers = ai.helping_units(world, unit, &mut scratch);
        helping.insert(unit, helpers);
    }
    helping
}

/// Expand (target, attacker, main_target_reactions) triples into the hit
/// list handed to the AI. Each target is followed by its helpers.
/// A (unit, attacker) pair is only reported once.
pub fn process_ai_react_to_hit(
    ai_react: &[(UnitId, UnitId, bool)],
    helping: &HelpingUnits,
    out: &mut Vec<AiHit>,
) {
    let mut push = |out: &mut Vec<AiHit>, hit: AiHit| {
        if !out
            .iter()
            .any(|old| old.unit == hit.unit && old.attacker == hit.attacker)
        {
            out.push(hit);
        }
    };

    for &(unit, attacker, main_target_reactions) in ai_react {
        push(
            out,
            AiHit {
                unit,
                attacker,
                main_target_reactions,
            },
        );
        let Some(helpers) = helping.get(&unit) else {
            continue;
        };
        for &helper in helpers {
            if helper == attacker {
                continue;
            }
            push(
                out,
                AiHit {
                    unit: helper,
                    attacker,
                    main_target_reactions: false,
                },
            );
        }
    }
}
