use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::loading::config::ViewerConfig;
use crate::engine::loading::progress::LoadProgress;

#[derive(Component)]
pub struct StatusText;

/// Corner overlay with the configured title, load status, and fps.
pub fn spawn_status_overlay(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));
        });
}

pub fn update_status_overlay(
    config: Option<Res<ViewerConfig>>,
    progress: Res<LoadProgress>,
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    let title = config.map(|c| c.title.clone()).unwrap_or_default();
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);
    for mut text in &mut query {
        text.0 = format!("{title} | {} | {fps:.1} fps", progress.status.as_str());
    }
}
