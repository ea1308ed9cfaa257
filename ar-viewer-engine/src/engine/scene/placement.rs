use bevy::prelude::*;
use bevy::render::primitives::Aabb;

use crate::constants::render_settings::MODEL_VIEW_DEPTH;

/// Marks a freshly attached model whose centroid has not been moved to the
/// origin yet. Removed once the bounds become available.
#[derive(Component)]
pub struct NeedsRecentre;

/// Translate a parsed model so its bounding-box centroid sits at the
/// origin, then park it at the fixed viewing depth.
///
/// The combined AABB only exists once the scene has instantiated and the
/// mesh bounds propagated, so this polls until descendants with bounds
/// appear.
pub fn recentre_primary(
    mut commands: Commands,
    mut roots: Query<(Entity, &mut Transform), With<NeedsRecentre>>,
    children: Query<&Children>,
    volumes: Query<(&GlobalTransform, &Aabb)>,
) {
    for (root, mut transform) in &mut roots {
        let mut min = Vec3::MAX;
        let mut max = Vec3::MIN;
        let mut found = false;
        for descendant in children.iter_descendants(root) {
            if let Ok((global, aabb)) = volumes.get(descendant) {
                found = true;
                for corner in aabb_corners(aabb) {
                    let point = global.transform_point(corner);
                    min = min.min(point);
                    max = max.max(point);
                }
            }
        }
        if !found {
            continue;
        }
        let centroid = (min + max) * 0.5;
        transform.translation = recentred_translation(transform.translation, centroid);
        commands.entity(root).remove::<NeedsRecentre>();
    }
}

/// Shift the root so the world-space centroid lands on the origin, then
/// pin the viewing depth.
pub fn recentred_translation(current: Vec3, centroid: Vec3) -> Vec3 {
    let mut translation = current - centroid;
    translation.z = MODEL_VIEW_DEPTH;
    translation
}

fn aabb_corners(aabb: &Aabb) -> [Vec3; 8] {
    let min: Vec3 = aabb.min().into();
    let max: Vec3 = aabb.max().into();
    [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(max.x, max.y, max.z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_moves_to_origin_at_viewing_depth() {
        let current = Vec3::new(0.0, 0.0, MODEL_VIEW_DEPTH);
        let centroid = Vec3::new(0.3, -0.2, MODEL_VIEW_DEPTH + 0.1);
        let adjusted = recentred_translation(current, centroid);
        assert_eq!(adjusted.x, -0.3);
        assert_eq!(adjusted.y, 0.2);
        assert_eq!(adjusted.z, MODEL_VIEW_DEPTH);
    }

    #[test]
    fn already_centred_model_keeps_depth() {
        let current = Vec3::new(0.0, 0.0, MODEL_VIEW_DEPTH);
        let adjusted = recentred_translation(current, Vec3::new(0.0, 0.0, MODEL_VIEW_DEPTH));
        assert_eq!(adjusted, Vec3::new(0.0, 0.0, MODEL_VIEW_DEPTH));
    }

    #[test]
    fn corner_count_spans_the_box() {
        let aabb = Aabb::from_min_max(Vec3::splat(-1.0), Vec3::splat(1.0));
        let corners = aabb_corners(&aabb);
        assert_eq!(corners.len(), 8);
        assert!(corners.contains(&Vec3::splat(-1.0)));
        assert!(corners.contains(&Vec3::splat(1.0)));
    }
}
