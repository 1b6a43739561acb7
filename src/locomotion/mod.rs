// src/locomotion/mod.rs

pub mod aim;
pub mod config;
pub mod controller;
pub mod gait;
pub mod geometry;
pub mod leg;
pub mod rig;
pub mod smoothing;
pub mod steering;

mod components;
mod plugin;
mod systems;

// re-export what hosts actually wire up:
pub use components::TrackTarget;
pub use config::{CreatureConfig, CreatureConfigAssetPlugin, ConfigError};
pub use controller::{CreatureNodes, Legs, LocomotionController};
pub use plugin::{LocomotionDebug, LocomotionPlugin, LocomotionSet};
pub use rig::{Rig, Skeleton};
pub use systems::drive_locomotion;
