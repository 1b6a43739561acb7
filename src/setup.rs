use bevy::asset::LoadState;
use bevy::prelude::*;

use gecko::locomotion::CreatureConfig;

use crate::creature::spawn_gecko;
use crate::input::CameraOrbit;
use crate::target::{Target, Wander, TARGET_HEIGHT};

pub const CREATURE_CONFIG_PATH: &str = "creature.gecko.ron";
pub const WANDER_SEED: u64 = 0x6ec0;

#[derive(Component)]
pub struct MainCamera;

/// Config asset the creature is spawned from once it resolves.
#[derive(Resource)]
pub struct CreatureConfigHandle(pub Handle<CreatureConfig>);

pub fn setup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // 1) Light
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // 2) Camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-2.5, 4.5, 9.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
        CameraOrbit {
            focus: Vec3::ZERO,
            radius: 8.0,
            yaw: std::f32::consts::FRAC_PI_2,
            pitch: 0.6,
        },
    ));

    // 3) Ground
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(60.0, 60.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.55, 0.48, 0.36))),
    ));

    // 4) Target
    commands.spawn((
        Target,
        Wander::new(WANDER_SEED, 12.0, 2.0, 3.0),
        Mesh3d(meshes.add(Sphere::new(0.15))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.25, 0.2),
            emissive: LinearRgba::rgb(0.6, 0.1, 0.05),
            ..default()
        })),
        Transform::from_xyz(0.0, TARGET_HEIGHT, -4.0),
    ));

    commands.insert_resource(CreatureConfigHandle(asset_server.load(CREATURE_CONFIG_PATH)));
}

/// Spawns the gecko as soon as its config has loaded, or with defaults if it
/// could not be loaded.
pub fn spawn_creature_when_ready(
    mut commands: Commands,
    mut spawned: Local<bool>,
    asset_server: Res<AssetServer>,
    handle: Res<CreatureConfigHandle>,
    configs: Res<Assets<CreatureConfig>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    targets: Query<Entity, With<Target>>,
) {
    if *spawned {
        return;
    }
    let Ok(target) = targets.single() else { return; };

    let config = match asset_server.load_state(handle.0.id()) {
        LoadState::Loaded => match configs.get(&handle.0) {
            Some(config) => config.clone(),
            None => return,
        },
        LoadState::Failed(err) => {
            error!("Failed to load {}: {}", CREATURE_CONFIG_PATH, err);
            warn!("Falling back to default creature config");
            CreatureConfig::default()
        }
        _ => return,
    };

    spawn_gecko(&mut commands, &mut meshes, &mut materials, &config, target);
    *spawned = true;
}
