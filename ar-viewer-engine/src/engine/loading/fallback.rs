use bevy::prelude::*;

use crate::constants::render_settings::{
    FALLBACK_CUBE_COLOR, FALLBACK_CUBE_SIZE, MODEL_VIEW_DEPTH,
};
use crate::engine::scene::renderer::PrimaryNode;

/// Synthesize the deterministic fallback primitive: a small cube at the
/// same viewing depth the model would occupy, so the user always sees
/// something. Returns the entity plus the handles it allocated, which the
/// renderer tracks for disposal.
pub fn spawn_fallback_cube(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> (Entity, Handle<Mesh>, Handle<StandardMaterial>) {
    let mesh = meshes.add(Cuboid::new(
        FALLBACK_CUBE_SIZE,
        FALLBACK_CUBE_SIZE,
        FALLBACK_CUBE_SIZE,
    ));
    let material = materials.add(StandardMaterial {
        base_color: FALLBACK_CUBE_COLOR,
        ..default()
    });
    let entity = commands
        .spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_xyz(0.0, 0.0, MODEL_VIEW_DEPTH),
            PrimaryNode,
        ))
        .id();
    (entity, mesh, material)
}
