use bevy::prelude::*;
use bevy::ui::BackgroundColor;

#[derive(Component)]
pub struct PauseOverlay;

#[derive(Component)]
pub struct ControlsHelp;

const CONTROLS: &str = "WASD  move target\n\
Left click  place target\n\
T  toggle wander\n\
G  toggle gizmos\n\
Middle drag  orbit, wheel  zoom\n\
Esc  pause";

pub fn spawn_controls_help(mut commands: Commands) {
    commands.spawn((
        Text::new(CONTROLS),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        ControlsHelp,
    ));
}

pub fn spawn_pause_overlay(mut commands: Commands) {
    commands.spawn((
        // Fullscreen transparent overlay node
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(Color::linear_rgba(0.0, 0.0, 0.0, 0.7)),
        PauseOverlay,
    ))
    .with_children(|parent| {
        parent.spawn((
            Text::new("Paused"),
            TextFont {
                font_size: 64.0,
                ..default()
            },
            TextLayout::new_with_justify(JustifyText::Center),
            TextColor(Color::WHITE),
        ));
    });
}

pub fn despawn_pause_overlay(
    mut commands: Commands,
    query: Query<Entity, With<PauseOverlay>>,
) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}
