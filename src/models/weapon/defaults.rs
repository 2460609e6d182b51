use super::{DamageType, ExplosionType, SplashRadii, WeaponBehaviour, WeaponData, WeaponId};

use DamageType::*;
use ExplosionType as E;
use WeaponBehaviour as B;

fn weapon(
    name: &str,
    damage: u16,
    upgrade_bonus: u16,
    damage_type: DamageType,
    explosion: ExplosionType,
    behaviour: WeaponBehaviour,
) -> WeaponData {
    WeaponData {
        name: name.to_string(),
        damage,
        upgrade_bonus,
        factor: 1,
        damage_type,
        explosion,
        behaviour,
        splash: SplashRadii::default(),
        top_speed: 0,
        acceleration: 0,
        lifetime: 0,
        max_range: 0,
        bounces: 0,
        hitpoints: 0,
        sprite: 0,
    }
}

impl WeaponData {
    fn speed(mut self, top_speed: i32, acceleration: i32) -> Self {
        self.top_speed = top_speed;
        self.acceleration = acceleration;
        self
    }

    fn splash(mut self, inner: i32, medium: i32, outer: i32) -> Self {
        self.splash = SplashRadii { inner, medium, outer };
        self
    }

    fn lifetime(mut self, frames: u8) -> Self {
        self.lifetime = frames;
        self
    }

    fn range(mut self, max_range: i32) -> Self {
        self.max_range = max_range;
        self
    }

    fn bounces(mut self, count: u8) -> Self {
        self.bounces = count;
        self
    }
}

pub(super) fn builtin_weapons() -> Vec<(WeaponId, WeaponData)> {
    vec![
        (
            WeaponId::GAUSS_RIFLE,
            weapon("Gauss Rifle", 6, 1, Normal, E::Normal, B::AppearOnTargetUnit).range(128),
        ),
        (
            WeaponId::FRAGMENTATION_GRENADE,
            weapon("Fragmentation Grenade", 20, 2, Concussive, E::Normal, B::FlyToTarget)
                .speed(2560, 512)
                .lifetime(60)
                .range(160),
        ),
        (
            WeaponId::SPIDER_MINE,
            weapon("Spider Mines", 125, 0, Explosive, E::RadialSplash, B::AttackAndSelfDestruct)
                .splash(50, 75, 100)
                .range(10),
        ),
        (
            WeaponId::FLAME_THROWER,
            weapon("Flame Thrower", 8, 1, Concussive, E::EnemySplash, B::AppearOnAttacker)
                .splash(15, 20, 25)
                .range(32),
        ),
        (
            WeaponId::ARCLITE_SHOCK_CANNON,
            weapon("Arclite Shock Cannon", 70, 5, Explosive, E::EnemySplash, B::AppearOnTargetUnit)
                .splash(10, 25, 40)
                .range(384),
        ),
        (
            WeaponId::YAMATO_GUN,
            weapon("Yamato Gun", 260, 0, Explosive, E::YamatoGun, B::FlyToTarget)
                .speed(2048, 256)
                .lifetime(100)
                .range(320),
        ),
        (
            WeaponId::NUCLEAR_STRIKE,
            weapon("Nuclear Strike", 600, 0, Explosive, E::NuclearMissile, B::AppearOnTargetSite)
                .splash(128, 192, 256),
        ),
        (
            WeaponId::LOCKDOWN,
            weapon("Lockdown", 0, 0, Independent, E::Lockdown, B::FlyToTarget)
                .speed(2048, 512)
                .lifetime(80)
                .range(256),
        ),
        (
            WeaponId::EMP_SHOCKWAVE,
            weapon("EMP Shockwave", 0, 0, Independent, E::EmpShockwave, B::FlyToPoint)
                .speed(2048, 512)
                .splash(64, 64, 64)
                .lifetime(80)
                .range(256),
        ),
        (
            WeaponId::IRRADIATE,
            weapon("Irradiate", 0, 0, Independent, E::Irradiate, B::AppearOnTargetUnit).range(288),
        ),
        (
            WeaponId::ACID_SPORE,
            weapon("Acid Spore", 25, 2, Normal, E::CorrosiveAcid, B::FlyToTarget)
                .speed(1600, 256)
                .splash(0, 0, 32)
                .lifetime(90)
                .range(192),
        ),
        (
            WeaponId::GLAVE_WURM,
            weapon("Glave Wurm", 9, 1, Normal, E::Normal, B::Bounce)
                .speed(2560, 512)
                .lifetime(100)
                .range(96)
                .bounces(2),
        ),
        (
            WeaponId::SUICIDE,
            weapon("Suicide", 110, 0, Normal, E::Normal, B::AttackAndSelfDestruct).range(3),
        ),
        (
            WeaponId::PARASITE,
            weapon("Parasite", 0, 0, Independent, E::Parasite, B::FlyToTarget)
                .speed(2048, 512)
                .lifetime(80)
                .range(384),
        ),
        (
            WeaponId::SPAWN_BROODLINGS,
            weapon("Spawn Broodlings", 0, 0, Independent, E::Broodlings, B::FlyToTarget)
                .speed(2048, 512)
                .lifetime(80)
                .range(288),
        ),
        (
            WeaponId::ENSNARE,
            weapon("Ensnare", 0, 0, Independent, E::Ensnare, B::FlyToPoint)
                .speed(2048, 512)
                .splash(64, 64, 64)
                .lifetime(80)
                .range(288),
        ),
        (
            WeaponId::DARK_SWARM,
            weapon("Dark Swarm", 0, 0, Independent, E::DarkSwarm, B::PersistOnTargetSite)
                .splash(96, 96, 96)
                .lifetime(240)
                .range(288),
        ),
        (
            WeaponId::PLAGUE,
            weapon("Plague", 0, 0, Independent, E::Plague, B::AppearOnTargetSite)
                .splash(64, 64, 64)
                .range(288),
        ),
        (
            WeaponId::CONSUME,
            weapon("Consume", 0, 0, Independent, E::Consume, B::AppearOnTargetUnit).range(16),
        ),
        (
            WeaponId::PSI_ASSAULT,
            weapon("Psi Assault", 20, 3, Normal, E::Normal, B::AppearOnTargetUnit).range(15),
        ),
        (
            WeaponId::SCARAB,
            weapon("Scarab", 100, 25, Normal, E::EnemySplash, B::FlyToTarget)
                .speed(1792, 256)
                .splash(20, 40, 60)
                .lifetime(150)
                .range(256),
        ),
        (
            WeaponId::STASIS_FIELD,
            weapon("Stasis Field", 0, 0, Independent, E::StasisField, B::AppearOnTargetSite)
                .splash(48, 48, 48)
                .range(288),
        ),
        (
            WeaponId::PSI_STORM,
            weapon("Psi Storm", 14, 0, IgnoreArmor, E::RadialSplash, B::PersistOnTargetSite)
                .splash(48, 48, 48)
                .lifetime(72)
                .range(288),
        ),
        (
            WeaponId::HALO_ROCKETS,
            weapon("Halo Rockets", 6, 1, Explosive, E::AirSplash, B::AttackTarget3x3)
                .speed(2048, 512)
                .splash(5, 50, 100)
                .lifetime(60)
                .range(192),
        ),
        (
            WeaponId::DISRUPTION_WEB,
            weapon("Disruption Web", 0, 0, Independent, E::DisruptionWeb, B::PersistOnTargetSite)
                .splash(64, 64, 64)
                .lifetime(180)
                .range(288),
        ),
        (
            WeaponId::RESTORATION,
            weapon("Restoration", 0, 0, Independent, E::Restoration, B::AppearOnTargetUnit)
                .range(192),
        ),
        (
            WeaponId::MIND_CONTROL,
            weapon("Mind Control", 0, 0, Independent, E::MindControl, B::AppearOnTargetUnit)
                .range(256),
        ),
        (
            WeaponId::FEEDBACK,
            weapon("Feedback", 0, 0, Independent, E::Feedback, B::AppearOnTargetUnit).range(320),
        ),
        (
            WeaponId::OPTICAL_FLARE,
            weapon("Optical Flare", 0, 0, Independent, E::OpticalFlare, B::FlyToTarget)
                .speed(2048, 512)
                .lifetime(80)
                .range(288),
        ),
        (
            WeaponId::MAELSTROM,
            weapon("Maelstrom", 0, 0, Independent, E::Maelstrom, B::AppearOnTargetSite)
                .splash(48, 48, 48)
                .range(320),
        ),
        (
            WeaponId::SUBTERRANEAN_SPINES,
            weapon("Subterranean Spines", 20, 2, Normal, E::EnemySplash, B::GoToMaxRange)
                .speed(5120, 5120)
                .splash(20, 20, 20)
                .lifetime(40)
                .range(192),
        ),
    ]
}
