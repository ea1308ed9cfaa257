use bevy::prelude::*;

use crate::constants::render_settings::{
    AMBIENT_BRIGHTNESS, CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, DIRECTIONAL_ILLUMINANCE,
    MODEL_UNIFORM_SCALE, MODEL_VIEW_DEPTH,
};
use crate::engine::loading::fallback::spawn_fallback_cube;
use crate::engine::loading::model_loader::{LoadRequestId, ModelLoader};
use crate::engine::loading::progress::{LoadProgress, LoadStatus};
use crate::engine::scene::placement::NeedsRecentre;

/// Marker for the single scene-graph root currently displayed.
#[derive(Component)]
pub struct PrimaryNode;

/// A settled load asking to become the displayed primary node. Only
/// commits if its request id is still the most recent one.
#[derive(Event)]
pub struct AttachRequest {
    pub request: LoadRequestId,
    pub payload: AttachPayload,
}

pub enum AttachPayload {
    ParsedScene(Handle<Scene>),
    FallbackCube,
}

/// Exclusive owner of the camera, lights, the primary node slot, and every
/// GPU-side handle the viewer allocated. Nothing else holds a reference
/// that outlives disposal.
#[derive(Resource, Default)]
pub struct SceneRenderer {
    primary: Option<Entity>,
    camera: Option<Entity>,
    lights: Vec<Entity>,
    cube_meshes: Vec<Handle<Mesh>>,
    cube_materials: Vec<Handle<StandardMaterial>>,
    scene: Option<Handle<Scene>>,
    disposed: bool,
}

impl SceneRenderer {
    pub fn is_initialized(&self) -> bool {
        self.camera.is_some()
    }

    pub fn primary(&self) -> Option<Entity> {
        self.primary
    }

    /// Replace the displayed primary node. The outgoing node is despawned
    /// in the same command flush that made the replacement visible, so no
    /// frame renders zero or two primaries.
    pub fn attach(&mut self, commands: &mut Commands, node: Entity) {
        if let Some(previous) = self.primary.replace(node) {
            commands.entity(previous).despawn();
        }
    }

    fn record_scene(&mut self, handle: Handle<Scene>) {
        self.scene = Some(handle);
        self.cube_meshes.clear();
        self.cube_materials.clear();
    }

    fn record_cube(&mut self, mesh: Handle<Mesh>, material: Handle<StandardMaterial>) {
        self.scene = None;
        self.cube_meshes = vec![mesh];
        self.cube_materials = vec![material];
    }

    /// Outstanding GPU-side allocations owned by this renderer.
    pub fn gpu_handle_count(&self) -> usize {
        self.cube_meshes.len() + self.cube_materials.len() + usize::from(self.scene.is_some())
    }

    /// Release everything exactly once. Safe to call repeatedly.
    pub fn dispose(&mut self, commands: &mut Commands) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for entity in self
            .primary
            .take()
            .into_iter()
            .chain(self.camera.take())
            .chain(self.lights.drain(..))
        {
            commands.entity(entity).despawn();
        }
        self.cube_meshes.clear();
        self.cube_materials.clear();
        self.scene = None;
        println!("→ Scene renderer disposed");
    }
}

/// Spawn the fixed camera and lighting rig. Runs once on entering the
/// scene-preparation state; never on the iOS hand-off path.
pub fn setup_scene(mut commands: Commands, mut renderer: ResMut<SceneRenderer>) {
    let camera = commands
        .spawn((
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: CAMERA_FOV_DEGREES.to_radians(),
                near: CAMERA_NEAR,
                far: CAMERA_FAR,
                ..default()
            }),
            Transform::default(),
        ))
        .id();

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });
    let directional = commands
        .spawn((
            DirectionalLight {
                illuminance: DIRECTIONAL_ILLUMINANCE,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_xyz(1.0, 1.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
        ))
        .id();

    renderer.camera = Some(camera);
    renderer.lights.push(directional);
}

/// Apply settled loads to the primary node slot, discarding stale ones.
pub fn apply_attach_requests(
    mut events: EventReader<AttachRequest>,
    mut commands: Commands,
    mut loader: ResMut<ModelLoader>,
    mut renderer: ResMut<SceneRenderer>,
    mut progress: ResMut<LoadProgress>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for AttachRequest { request, payload } in events.read() {
        if !loader.commit_if_current(*request) {
            info!("Discarding stale load result for {request:?}");
            continue;
        }
        let node = match payload {
            AttachPayload::ParsedScene(handle) => {
                let entity = commands
                    .spawn((
                        SceneRoot(handle.clone()),
                        Transform::from_translation(Vec3::new(0.0, 0.0, MODEL_VIEW_DEPTH))
                            .with_scale(Vec3::splat(MODEL_UNIFORM_SCALE)),
                        PrimaryNode,
                        NeedsRecentre,
                    ))
                    .id();
                renderer.record_scene(handle.clone());
                progress.status = LoadStatus::Loaded;
                println!("✓ Model attached as primary node");
                entity
            }
            AttachPayload::FallbackCube => {
                let (entity, mesh, material) =
                    spawn_fallback_cube(&mut commands, &mut meshes, &mut materials);
                renderer.record_cube(mesh, material);
                progress.status = LoadStatus::Error;
                entity
            }
        };
        renderer.attach(&mut commands, node);
    }
}
