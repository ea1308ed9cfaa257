use bevy::prelude::*;

use crate::constants::render_settings::IDLE_SPIN_STEP;
use crate::engine::scene::renderer::PrimaryNode;

/// Fixed per-frame rotation of the primary node around its vertical axis.
///
/// Scheduled only while no AR session is active; during a session the pose
/// is driven by the tracked device and the spin must stay suspended.
pub fn idle_spin(mut primaries: Query<&mut Transform, With<PrimaryNode>>) {
    for mut transform in &mut primaries {
        transform.rotate_y(IDLE_SPIN_STEP);
    }
}
