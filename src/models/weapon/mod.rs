//! Weapon data
//!
//! Per-weapon tuning read by bullets: damage, how the projectile travels
//! (behaviour) and what happens on impact (explosion). The built-in table
//! lives in `defaults`; a table can also be loaded from JSON.

mod defaults;

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use super::errors::{BulletError, BulletResult};
use super::spell::Tech;

/// Index into the weapon table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeaponId(pub u8);

impl WeaponId {
    pub const GAUSS_RIFLE: WeaponId = WeaponId(0x00);
    pub const FRAGMENTATION_GRENADE: WeaponId = WeaponId(0x04);
    pub const SPIDER_MINE: WeaponId = WeaponId(0x06);
    pub const FLAME_THROWER: WeaponId = WeaponId(0x19);
    pub const ARCLITE_SHOCK_CANNON: WeaponId = WeaponId(0x1b);
    pub const YAMATO_GUN: WeaponId = WeaponId(0x1e);
    pub const NUCLEAR_STRIKE: WeaponId = WeaponId(0x1f);
    pub const LOCKDOWN: WeaponId = WeaponId(0x20);
    pub const EMP_SHOCKWAVE: WeaponId = WeaponId(0x21);
    pub const IRRADIATE: WeaponId = WeaponId(0x22);
    pub const ACID_SPORE: WeaponId = WeaponId(0x2e);
    pub const GLAVE_WURM: WeaponId = WeaponId(0x30);
    pub const SUICIDE: WeaponId = WeaponId(0x36);
    pub const PARASITE: WeaponId = WeaponId(0x38);
    pub const SPAWN_BROODLINGS: WeaponId = WeaponId(0x39);
    pub const ENSNARE: WeaponId = WeaponId(0x3a);
    pub const DARK_SWARM: WeaponId = WeaponId(0x3b);
    pub const PLAGUE: WeaponId = WeaponId(0x3c);
    pub const CONSUME: WeaponId = WeaponId(0x3d);
    pub const PSI_ASSAULT: WeaponId = WeaponId(0x44);
    pub const SCARAB: WeaponId = WeaponId(0x52);
    pub const STASIS_FIELD: WeaponId = WeaponId(0x53);
    pub const PSI_STORM: WeaponId = WeaponId(0x54);
    pub const HALO_ROCKETS: WeaponId = WeaponId(0x64);
    pub const DISRUPTION_WEB: WeaponId = WeaponId(0x65);
    pub const RESTORATION: WeaponId = WeaponId(0x66);
    pub const MIND_CONTROL: WeaponId = WeaponId(0x69);
    pub const FEEDBACK: WeaponId = WeaponId(0x6a);
    pub const OPTICAL_FLARE: WeaponId = WeaponId(0x6b);
    pub const MAELSTROM: WeaponId = WeaponId(0x6c);
    pub const SUBTERRANEAN_SPINES: WeaponId = WeaponId(0x6d);
    /// Marks "no weapon"; never present in a table.
    pub const NONE: WeaponId = WeaponId(0x82);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageType {
    /// Always deals exactly one hit point
    Independent,
    Explosive,
    Concussive,
    Normal,
    /// Normal, but armor is not subtracted
    IgnoreArmor,
}

impl DamageType {
    /// Percentage of damage dealt against a unit of `size`.
    pub fn size_multiplier(self, size: super::unit::UnitSize) -> i32 {
        use super::unit::UnitSize;
        match (self, size) {
            (DamageType::Explosive, UnitSize::Small) => 50,
            (DamageType::Explosive, UnitSize::Medium) => 75,
            (DamageType::Concussive, UnitSize::Medium) => 50,
            (DamageType::Concussive, UnitSize::Large) => 25,
            _ => 100,
        }
    }
}

/// What happens when the bullet lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionType {
    None,
    Normal,
    RadialSplash,
    EnemySplash,
    Lockdown,
    NuclearMissile,
    Parasite,
    Broodlings,
    EmpShockwave,
    Irradiate,
    Ensnare,
    Plague,
    StasisField,
    DarkSwarm,
    Consume,
    YamatoGun,
    Restoration,
    DisruptionWeb,
    CorrosiveAcid,
    MindControl,
    Feedback,
    OpticalFlare,
    Maelstrom,
    AirSplash,
}

impl ExplosionType {
    /// Spell cast on impact, if this explosion is a spell.
    pub fn spell(self) -> Option<Tech> {
        match self {
            ExplosionType::Lockdown => Some(Tech::Lockdown),
            ExplosionType::Parasite => Some(Tech::Parasite),
            ExplosionType::Broodlings => Some(Tech::SpawnBroodlings),
            ExplosionType::EmpShockwave => Some(Tech::EmpShockwave),
            ExplosionType::Irradiate => Some(Tech::Irradiate),
            ExplosionType::Ensnare => Some(Tech::Ensnare),
            ExplosionType::Plague => Some(Tech::Plague),
            ExplosionType::StasisField => Some(Tech::StasisField),
            ExplosionType::DarkSwarm => Some(Tech::DarkSwarm),
            ExplosionType::Consume => Some(Tech::Consume),
            ExplosionType::Restoration => Some(Tech::Restoration),
            ExplosionType::DisruptionWeb => Some(Tech::DisruptionWeb),
            ExplosionType::CorrosiveAcid => Some(Tech::AcidSpores),
            ExplosionType::MindControl => Some(Tech::MindControl),
            ExplosionType::Feedback => Some(Tech::Feedback),
            ExplosionType::OpticalFlare => Some(Tech::OpticalFlare),
            ExplosionType::Maelstrom => Some(Tech::Maelstrom),
            _ => None,
        }
    }
}

/// How the bullet travels after it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponBehaviour {
    FlyToPoint,
    FlyToTarget,
    AppearOnTargetUnit,
    PersistOnTargetSite,
    AppearOnTargetSite,
    AppearOnAttacker,
    AttackAndSelfDestruct,
    Bounce,
    AttackTarget3x3,
    GoToMaxRange,
}

impl WeaponBehaviour {
    /// Behaviours that travel and therefore need a speed.
    pub fn moves(self) -> bool {
        matches!(
            self,
            WeaponBehaviour::FlyToPoint
                | WeaponBehaviour::FlyToTarget
                | WeaponBehaviour::Bounce
                | WeaponBehaviour::AttackTarget3x3
                | WeaponBehaviour::GoToMaxRange
        )
    }
}

/// Splash radii in pixels: full, half and quarter damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SplashRadii {
    pub inner: i32,
    pub medium: i32,
    pub outer: i32,
}

impl SplashRadii {
    /// Damage percentage at `distance`, or None when out of reach.
    pub fn percent_at(&self, distance: i32) -> Option<i32> {
        if distance <= self.inner {
            Some(100)
        } else if distance <= self.medium {
            Some(50)
        } else if distance <= self.outer {
            Some(25)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponData {
    pub name: String,
    /// Base damage in whole hit points
    pub damage: u16,
    /// Extra damage per upgrade level
    #[serde(default)]
    pub upgrade_bonus: u16,
    #[serde(default = "default_factor")]
    pub factor: u8,
    pub damage_type: DamageType,
    pub explosion: ExplosionType,
    pub behaviour: WeaponBehaviour,
    #[serde(default)]
    pub splash: SplashRadii,
    /// Exact units (1/256 px) per frame
    #[serde(default)]
    pub top_speed: i32,
    #[serde(default)]
    pub acceleration: i32,
    /// Frames before the bullet expires, 0 = never
    #[serde(default)]
    pub lifetime: u8,
    #[serde(default)]
    pub max_range: i32,
    /// Extra hops after the first hit
    #[serde(default)]
    pub bounces: u8,
    #[serde(default)]
    pub hitpoints: u32,
    #[serde(default)]
    pub sprite: u16,
}

fn default_factor() -> u8 {
    1
}

impl WeaponData {
    /// Whether splash from this weapon also lands on the firer's allies.
    pub fn hits_own_units(&self) -> bool {
        matches!(
            self.explosion,
            ExplosionType::RadialSplash | ExplosionType::NuclearMissile
        )
    }
}

/// All weapons known to the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponTable {
    weapons: BTreeMap<WeaponId, WeaponData>,
}

impl Default for WeaponTable {
    fn default() -> Self {
        WeaponTable {
            weapons: defaults::builtin_weapons().into_iter().collect(),
        }
    }
}

impl WeaponTable {
    pub fn empty() -> Self {
        WeaponTable {
            weapons: BTreeMap::new(),
        }
    }

    pub fn get(&self, id: WeaponId) -> Option<&WeaponData> {
        self.weapons.get(&id)
    }

    pub fn insert(&mut self, id: WeaponId, data: WeaponData) {
        self.weapons.insert(id, data);
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WeaponId, &WeaponData)> {
        self.weapons.iter().map(|(id, data)| (*id, data))
    }

    /// Parse and validate a table from JSON.
    pub fn from_json_str(json: &str) -> BulletResult<Self> {
        let table: WeaponTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> BulletResult<Self> {
        let table: WeaponTable = serde_json::from_reader(reader)?;
        table.validate()?;
        Ok(table)
    }

    pub fn to_json(&self) -> BulletResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject entries the bullet code cannot run.
    pub fn validate(&self) -> BulletResult<()> {
        if self.weapons.contains_key(&WeaponId::NONE) {
            return Err(BulletError::InvalidWeaponTable(
                "weapon id 0x82 is reserved for \"no weapon\"".to_string(),
            ));
        }
        for (id, data) in &self.weapons {
            let SplashRadii { inner, medium, outer } = data.splash;
            if inner < 0 || inner > medium || medium > outer {
                return Err(BulletError::InvalidWeaponTable(format!(
                    "{} ({:#x}): splash radii must grow inner <= medium <= outer",
                    data.name, id.0
                )));
            }
            if data.behaviour.moves() && data.top_speed <= 0 {
                return Err(BulletError::InvalidWeaponTable(format!(
                    "{} ({:#x}): moving behaviour without a top speed",
                    data.name, id.0
                )));
            }
            if data.factor == 0 {
                return Err(BulletError::InvalidWeaponTable(format!(
                    "{} ({:#x}): damage factor must be at least 1",
                    data.name, id.0
                )));
            }
        }
        Ok(())
    }
}
