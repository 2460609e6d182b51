use serde::{Deserialize, Serialize};

use super::constants::{
    BOUNCE_SEARCH_RADIUS, GROUND_PULSE_INTERVAL, HIGH_GROUND_MISS_CHANCE, MAX_BULLETS,
    NEAR_UNIT_SPREAD,
};
use super::errors::{BulletError, BulletResult};

/// Tunables of the bullet system. Missing JSON fields fall back to the
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub max_bullets: usize,
    pub bounce_search_radius: i32,
    pub ground_pulse_interval: u8,
    /// Out of 256
    pub miss_chance: u8,
    pub near_unit_spread: i32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        BulletConfig {
            max_bullets: MAX_BULLETS,
            bounce_search_radius: BOUNCE_SEARCH_RADIUS,
            ground_pulse_interval: GROUND_PULSE_INTERVAL,
            miss_chance: HIGH_GROUND_MISS_CHANCE,
            near_unit_spread: NEAR_UNIT_SPREAD,
        }
    }
}

impl BulletConfig {
    pub fn from_json_str(json: &str) -> BulletResult<Self> {
        let config: BulletConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BulletResult<()> {
        if self.ground_pulse_interval == 0 {
            return Err(BulletError::InvalidConfig(
                "ground_pulse_interval must be at least 1".to_string(),
            ));
        }
        if self.bounce_search_radius < 0 || self.near_unit_spread < 0 {
            return Err(BulletError::InvalidConfig(
                "radii must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = BulletConfig::from_json_str(r#"{ "max_bullets": 12 }"#).unwrap();
        assert_eq!(config.max_bullets, 12);
        assert_eq!(config.ground_pulse_interval, GROUND_PULSE_INTERVAL);
    }

    #[test]
    fn zero_pulse_interval_is_rejected() {
        let result = BulletConfig::from_json_str(r#"{ "ground_pulse_interval": 0 }"#);
        assert!(matches!(result, Err(BulletError::InvalidConfig(_))));
    }
}
