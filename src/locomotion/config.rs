// src/locomotion/config.rs
//! Data-driven creature tuning + `.gecko.ron` loader.
//!
//! Angles are in degrees, angular speeds in degrees per second, smoothing
//! rates per second, distances in world units.

use bevy::asset::{io::Reader, AssetLoader, LoadContext};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ---------- Public plugin to register asset+loader ----------

pub struct CreatureConfigAssetPlugin;

impl Plugin for CreatureConfigAssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<CreatureConfig>()
            .register_asset_loader(CreatureConfigLoader);
    }
}

// ---------- Config (data form) ----------

#[derive(Asset, TypePath, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    pub head: HeadConfig,
    pub eyes: EyeConfig,
    pub legs: LegConfig,
    pub steering: SteeringConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadConfig {
    /// Largest angle the head may turn away from its rest forward.
    pub max_turn_angle: f32,
    pub tracking_speed: f32,
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            max_turn_angle: 70.0,
            tracking_speed: 8.0,
        }
    }
}

/// Allowed local yaw range for one eye. Positive yaw turns the eye to its left.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct YawWindow {
    pub min: f32,
    pub max: f32,
}

impl YawWindow {
    #[inline]
    pub fn clamp(&self, yaw: f32) -> f32 {
        yaw.clamp(self.min, self.max)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeConfig {
    pub tracking_speed: f32,
    pub left: YawWindow,
    pub right: YawWindow,
}

impl Default for EyeConfig {
    fn default() -> Self {
        Self {
            tracking_speed: 12.0,
            // each eye may swing further outward than inward
            left: YawWindow { min: -10.0, max: 30.0 },
            right: YawWindow { min: -30.0, max: 10.0 },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegConfig {
    /// Foot starts a step once it drifts this far from its home anchor.
    pub want_step_at_distance: f32,
    /// Seconds a single step takes.
    pub move_duration: f32,
    /// Fraction of `want_step_at_distance` to land past the anchor.
    pub step_overshoot_fraction: f32,
}

impl Default for LegConfig {
    fn default() -> Self {
        Self {
            want_step_at_distance: 0.35,
            move_duration: 0.2,
            step_overshoot_fraction: 0.6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    pub turn_speed: f32,
    pub move_speed: f32,
    pub turn_acceleration: f32,
    pub move_acceleration: f32,
    pub min_distance_to_target: f32,
    pub max_distance_to_target: f32,
    /// Heading error tolerated before turning.
    pub max_angle_to_target: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            turn_speed: 120.0,
            move_speed: 1.5,
            turn_acceleration: 5.0,
            move_acceleration: 5.0,
            min_distance_to_target: 2.0,
            max_distance_to_target: 4.0,
            max_angle_to_target: 15.0,
        }
    }
}

impl CreatureConfig {
    /// Parse a RON document and reject degenerate tuning.
    pub fn from_ron_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: CreatureConfig =
            ron::de::from_bytes(bytes).map_err(|e| ConfigError::Ron(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("head.max_turn_angle", self.head.max_turn_angle),
            ("head.tracking_speed", self.head.tracking_speed),
            ("eyes.tracking_speed", self.eyes.tracking_speed),
            ("legs.want_step_at_distance", self.legs.want_step_at_distance),
            ("legs.step_overshoot_fraction", self.legs.step_overshoot_fraction),
            ("steering.turn_speed", self.steering.turn_speed),
            ("steering.move_speed", self.steering.move_speed),
            ("steering.turn_acceleration", self.steering.turn_acceleration),
            ("steering.move_acceleration", self.steering.move_acceleration),
            ("steering.min_distance_to_target", self.steering.min_distance_to_target),
            ("steering.max_distance_to_target", self.steering.max_distance_to_target),
            ("steering.max_angle_to_target", self.steering.max_angle_to_target),
        ];
        for (field, value) in non_negative {
            // also rejects NaN
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let duration = self.legs.move_duration;
        if !(duration > 0.0 && duration.is_finite()) {
            return Err(ConfigError::NonPositive { field: "legs.move_duration", value: duration });
        }

        let (min, max) = (self.steering.min_distance_to_target, self.steering.max_distance_to_target);
        if min > max {
            return Err(ConfigError::StandoffBand { min, max });
        }

        for (eye, window) in [("left", self.eyes.left), ("right", self.eyes.right)] {
            if !(window.min <= window.max) {
                return Err(ConfigError::YawWindow { eye, min: window.min, max: window.max });
            }
        }

        Ok(())
    }
}

// ---------- Asset loader for `.gecko.ron` ----------

#[derive(Default)]
pub struct CreatureConfigLoader;

impl AssetLoader for CreatureConfigLoader {
    type Asset = CreatureConfig;
    type Settings = ();
    type Error = ConfigError;

    fn extensions(&self) -> &[&str] {
        &["gecko.ron"]
    }

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        CreatureConfig::from_ron_bytes(&bytes)
    }
}

// ---------- Config errors ----------

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("I/O while reading creature config: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
    #[error("'{field}' must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("'{field}' must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("Standoff band is inverted (min {min} > max {max})")]
    StandoffBand { min: f32, max: f32 },
    #[error("{eye} eye yaw window is inverted (min {min} > max {max})")]
    YawWindow { eye: &'static str, min: f32, max: f32 },
}
