// src/creature.rs
//! Builds the demo gecko out of primitive meshes and hands its bones to a
//! `LocomotionController`.

use bevy::prelude::*;

use gecko::locomotion::{CreatureConfig, CreatureNodes, Legs, LocomotionController, TrackTarget};

pub const BODY_HEIGHT: f32 = 0.25;

/// Home anchors relative to the body, on the ground under each shoulder/hip.
const HOME_OFFSETS: Legs<Vec3> = Legs {
    front_left: Vec3::new(-0.4, -BODY_HEIGHT, -0.45),
    front_right: Vec3::new(0.4, -BODY_HEIGHT, -0.45),
    back_left: Vec3::new(-0.4, -BODY_HEIGHT, 0.45),
    back_right: Vec3::new(0.4, -BODY_HEIGHT, 0.45),
};

const HEAD_OFFSET: Vec3 = Vec3::new(0.0, 0.05, -0.7);
const EYE_OFFSET: Vec3 = Vec3::new(0.12, 0.08, -0.08);

#[derive(Component)]
pub struct Gecko;

pub fn spawn_gecko(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    config: &CreatureConfig,
    target: Entity,
) -> Entity {
    let skin = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.62, 0.28),
        perceptual_roughness: 0.8,
        ..default()
    });
    let eye_white = materials.add(Color::srgb(0.95, 0.92, 0.75));
    let pupil = materials.add(Color::BLACK);

    let body_pos = Vec3::new(0.0, BODY_HEIGHT, 0.0);
    let root = commands
        .spawn((
            Gecko,
            Mesh3d(meshes.add(Cuboid::new(0.5, 0.18, 1.1))),
            MeshMaterial3d(skin.clone()),
            Transform::from_translation(body_pos),
        ))
        .id();

    // 1) Head with two eyes; each eye carries a pupil so its yaw is visible
    let head = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(0.36, 0.16, 0.36))),
            MeshMaterial3d(skin.clone()),
            Transform::from_translation(HEAD_OFFSET),
            ChildOf(root),
        ))
        .id();

    let eye_mesh = meshes.add(Sphere::new(0.07));
    let pupil_mesh = meshes.add(Sphere::new(0.035));
    let mut spawn_eye = |offset: Vec3| {
        let eye = commands
            .spawn((
                Mesh3d(eye_mesh.clone()),
                MeshMaterial3d(eye_white.clone()),
                Transform::from_translation(offset),
                ChildOf(head),
            ))
            .id();
        commands.spawn((
            Mesh3d(pupil_mesh.clone()),
            MeshMaterial3d(pupil.clone()),
            Transform::from_xyz(0.0, 0.0, -0.05),
            ChildOf(eye),
        ));
        eye
    };
    let left_eye = spawn_eye(EYE_OFFSET * Vec3::new(-1.0, 1.0, 1.0));
    let right_eye = spawn_eye(EYE_OFFSET);

    // 2) Anchors ride the body; feet live in world space
    let homes = HOME_OFFSETS.map(|offset| {
        commands
            .spawn((Transform::from_translation(offset), Visibility::default(), ChildOf(root)))
            .id()
    });
    let foot_mesh = meshes.add(Sphere::new(0.07));
    let feet = HOME_OFFSETS.map(|offset| {
        commands
            .spawn((
                Mesh3d(foot_mesh.clone()),
                MeshMaterial3d(skin.clone()),
                Transform::from_translation(body_pos + offset),
            ))
            .id()
    });

    let nodes = CreatureNodes { head, left_eye, right_eye, feet, homes };
    commands
        .entity(root)
        .insert((LocomotionController::new(&nodes, config), TrackTarget(target)));

    info!("Spawned gecko {root:?} tracking {target:?}");
    root
}
