//! What a bullet does when it goes off
//!
//! Everything here only records hits, spells and deaths into the frame
//! buffers. Nothing is applied to units until the resolution phase.

use tracing::trace;

use crate::models::bullet::Bullet;
use crate::models::constants::BulletState;
use crate::models::position::Rect;
use crate::models::spell::{SpellCast, Tech};
use crate::models::unit::{UnitId, UnitInfo};
use crate::models::weapon::{ExplosionType, WeaponBehaviour, WeaponData, WeaponId};

use super::damage::{scale_percent, weapon_damage, BulletHit, HallucinationHit, ProgressBulletBufs};
use super::world::UnitWorld;

/// Which units a splash may land on.
#[derive(Debug, Clone, Copy, Default)]
struct SplashFilter {
    hits_own_units: bool,
    include_parent: bool,
    /// Only units whose air flag matches.
    air: Option<bool>,
}

/// Damage of one detonation, with the bounce falloff applied.
fn missile_damage<W: UnitWorld>(bullet: &Bullet, data: &WeaponData, world: &W) -> i32 {
    let mut damage = weapon_damage(world, data, bullet.weapon, bullet.player);
    if data.behaviour == WeaponBehaviour::Bounce {
        let bounces_done = data.bounces.saturating_sub(bullet.bounces_remaining);
        for _ in 0..bounces_done {
            damage /= 3;
        }
    }
    damage
}

fn live_target<W: UnitWorld>(bullet: &Bullet, world: &W) -> Option<(UnitId, UnitInfo)> {
    let target = bullet.target?;
    let info = world.unit(target).filter(|info| !info.is_dead())?;
    Some((target, info))
}

/// Apply one detonation of `bullet`.
pub(crate) fn do_missile_dmg<W: UnitWorld>(
    bullet: &Bullet,
    data: &WeaponData,
    world: &W,
    bufs: &mut ProgressBulletBufs,
) {
    let damage = missile_damage(bullet, data, world);
    trace!(bullet = ?bullet.id(), weapon = %data.name, damage, "missile damage");

    if bullet.state() == BulletState::GroundDamage {
        ground_pulse(bullet, data, world, bufs, damage);
        return;
    }

    match data.explosion {
        ExplosionType::None => {}
        ExplosionType::Normal | ExplosionType::YamatoGun => {
            normal_hit(bullet, data, world, bufs, damage);
        }
        ExplosionType::RadialSplash | ExplosionType::NuclearMissile => {
            let filter = SplashFilter {
                hits_own_units: true,
                ..Default::default()
            };
            splash(bullet, data, world, bufs, damage, filter);
        }
        ExplosionType::EnemySplash => {
            if bullet.weapon == WeaponId::SUBTERRANEAN_SPINES {
                lurker_splash(bullet, data, world, bufs, damage);
            } else {
                splash(bullet, data, world, bufs, damage, SplashFilter::default());
            }
        }
        ExplosionType::AirSplash => air_splash(bullet, data, world, bufs, damage),
        ExplosionType::CorrosiveAcid => {
            cast_spell(bullet, data, world, bufs, Tech::AcidSpores);
            normal_hit(bullet, data, world, bufs, damage);
        }
        ExplosionType::Broodlings | ExplosionType::Consume => {
            if let Some((target, _)) = live_target(bullet, world) {
                if !bullet.flags.hallucinated {
                    bufs.add_killed(target, Some(bullet.player));
                }
            }
            if let Some(tech) = data.explosion.spell() {
                cast_spell(bullet, data, world, bufs, tech);
            }
        }
        other => {
            if let Some(tech) = other.spell() {
                cast_spell(bullet, data, world, bufs, tech);
            }
        }
    }

    if data.behaviour == WeaponBehaviour::AttackAndSelfDestruct {
        if let Some(parent) = bullet.parent {
            bufs.add_killed(parent, None);
        }
    }
}

/// Record a hit of `bullet` on `target`. Hallucinated bullets only
/// produce the visual.
fn hit_unit(bullet: &Bullet, target: UnitId, damage: i32, bufs: &mut ProgressBulletBufs) {
    if bullet.flags.hallucinated {
        if let Some(attacker) = bullet.parent {
            bufs.hallucination_hits.push(HallucinationHit {
                target,
                attacker,
                direction: bullet.facing_direction,
            });
        }
        return;
    }
    bufs.hits.push(BulletHit {
        target,
        bullet: bullet.id(),
        attacker: bullet.parent,
        damage,
        weapon: bullet.weapon,
        player: bullet.player,
        direction: bullet.facing_direction,
    });
}

fn normal_hit<W: UnitWorld>(
    bullet: &Bullet,
    data: &WeaponData,
    world: &W,
    bufs: &mut ProgressBulletBufs,
    damage: i32,
) {
    if bullet.flags.missed {
        return;
    }
    let Some((target, info)) = live_target(bullet, world) else {
        return;
    };
    if data.behaviour == WeaponBehaviour::FlyToPoint && !info.bounds().contains(bullet.position) {
        return;
    }
    hit_unit(bullet, target, damage, bufs);
}

/// Units a splash centered on the bullet lands on, with their damage
/// percentage, sorted by (y, x, id).
fn splash_victims<W: UnitWorld>(
    bullet: &Bullet,
    data: &WeaponData,
    world: &W,
    bufs: &mut ProgressBulletBufs,
    filter: SplashFilter,
) -> Vec<(UnitId, i32)> {
    let radius = data.splash.outer;
    let mut scratch = std::mem::take(&mut bufs.area_scratch);
    world.units_in_area(Rect::around(bullet.position, radius), &mut scratch);

    let mut victims: Vec<(i32, i32, UnitId, i32)> = scratch
        .iter()
        .copied()
        .filter_map(|unit| {
            if !filter.include_parent && Some(unit) == bullet.parent {
                return None;
            }
            let info = world.unit(unit)?;
            if !info.is_targetable() {
                return None;
            }
            let is_target = Some(unit) == bullet.target;
            if info.is_burrowed && !is_target {
                return None;
            }
            if !filter.hits_own_units && world.are_allies(bullet.player, info.player) {
                return None;
            }
            if filter.air.is_some_and(|air| air != info.is_air) {
                return None;
            }
            let percent = if is_target {
                100
            } else {
                data.splash.percent_at(info.distance_to(bullet.position))?
            };
            Some((info.position.y, info.position.x, unit, percent))
        })
        .collect();
    victims.sort();

    bufs.area_scratch = scratch;
    victims
        .into_iter()
        .map(|(_, _, unit, percent)| (unit, percent))
        .collect()
}

fn splash<W: UnitWorld>(
    bullet: &Bullet,
    data: &WeaponData,
    world: &W,
    bufs: &mut ProgressBulletBufs,
    damage: i32,
    filter: SplashFilter,
) {
    for (unit, percent) in splash_victims(bullet, data, world, bufs, filter) {
        hit_unit(bullet, unit, scale_percent(damage, percent), bufs);
    }
}

/// Splash that only touches units on the same layer as the target.
fn air_splash<W: UnitWorld>(
    bullet: &Bullet,
    data: &WeaponData,
    world: &W,
    bufs: &mut ProgressBulletBufs,
    damage: i32,
) {
    let air = match live_target(bullet, world) {
        Some((_, target)) => target.is_air,
        None => true,
    };
    let filter = SplashFilter {
        air: Some(air),
        ..Default::default()
    };
    splash(bullet, data, world, bufs, damage, filter);
}

/// Lurker spines hit every unit at most once per lurker per frame, even
/// when several spines overlap it.
fn lurker_splash<W: UnitWorld>(
    bullet: &Bullet,
    data: &WeaponData,
    world: &W,
    bufs: &mut ProgressBulletBufs,
    damage: i32,
) {
    let victims = splash_victims(bullet, data, world, bufs, SplashFilter::default());
    for (unit, percent) in victims {
        if let Some(parent) = bullet.parent {
            if !bufs.lurker_hits.insert((parent, unit)) {
                continue;
            }
        }
        hit_unit(bullet, unit, scale_percent(damage, percent), bufs);
    }
}

/// One pulse of a persisting bullet. Damage does not stack: a unit standing
/// in several overlapping fields is hit once per frame.
fn ground_pulse<W: UnitWorld>(
    bullet: &Bullet,
    data: &WeaponData,
    world: &W,
    bufs: &mut ProgressBulletBufs,
    damage: i32,
) {
    if let Some(tech) = data.explosion.spell() {
        cast_spell(bullet, data, world, bufs, tech);
        return;
    }
    if damage == 0 {
        return;
    }
    let filter = SplashFilter {
        hits_own_units: data.hits_own_units(),
        include_parent: true,
        air: None,
    };
    for (unit, _) in splash_victims(bullet, data, world, bufs, filter) {
        if bufs.ground_hits.insert(unit) {
            hit_unit(bullet, unit, damage, bufs);
        }
    }
}

/// Queue `tech`. Weapons without splash target the bullet's unit, the rest
/// cover an area around the bullet.
fn cast_spell<W: UnitWorld>(
    bullet: &Bullet,
    data: &WeaponData,
    world: &W,
    bufs: &mut ProgressBulletBufs,
    tech: Tech,
) {
    if bullet.flags.hallucinated {
        return;
    }
    let radius = data.splash.outer;
    let target = if radius == 0 {
        match live_target(bullet, world) {
            Some((target, _)) => Some(target),
            None => return,
        }
    } else {
        None
    };
    bufs.spells.push(SpellCast {
        player: bullet.player,
        tech,
        pos: bullet.position,
        radius,
        parent: bullet.parent,
        target,
    });
}
