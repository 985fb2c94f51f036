//! Pointer click to scene object.

use super::{CameraTarget, NavigationSet, Navigator, ObjectClicked};
use crate::config::NavigationConfig;
use bevy::{
    picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings},
    prelude::*,
    window::PrimaryWindow,
};

/// Ray casts through the cursor on click and reports the nearest hit.
pub struct PointerPickingPlugin;

impl Plugin for PointerPickingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            pick_clicked_object.in_set(NavigationSet::Pick),
        );
    }
}

fn pick_clicked_object(
    buttons: Res<ButtonInput<MouseButton>>,
    config: Res<NavigationConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(Entity, &Camera, &GlobalTransform), With<Navigator>>,
    mut ray_cast: MeshRayCast,
    mut clicked: MessageWriter<ObjectClicked>,
) {
    if !buttons.just_pressed(config.click_button) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    for (camera_entity, camera, camera_transform) in &cameras {
        if !camera.is_active {
            continue;
        }
        let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
            continue;
        };

        let hits = ray_cast.cast_ray(ray, &MeshRayCastSettings::default());
        if let Some((entity, hit)) = hits.first() {
            debug!(
                "Click hit {:?} at {:?} ({:.2} away)",
                entity, hit.point, hit.distance
            );
            clicked.write(ObjectClicked {
                camera: camera_entity,
                entity: *entity,
            });
        }
    }
}

/// Finds the camera target on `root` or below it, depth first.
///
/// `root` itself is checked first, then its children in order.
pub fn find_camera_target(
    root: Entity,
    targets: &Query<(), With<CameraTarget>>,
    children: &Query<&Children>,
) -> Option<Entity> {
    if targets.contains(root) {
        return Some(root);
    }

    let kids: &[Entity] = children.get(root).ok()?;
    kids.iter()
        .find_map(|&child| find_camera_target(child, targets, children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn lookup(world: &mut World, root: Entity) -> Option<Entity> {
        world
            .run_system_once(
                move |targets: Query<(), With<CameraTarget>>, children: Query<&Children>| {
                    find_camera_target(root, &targets, &children)
                },
            )
            .unwrap()
    }

    #[test]
    fn test_target_on_root() {
        let mut world = World::new();
        let root = world.spawn(CameraTarget).id();

        assert_eq!(lookup(&mut world, root), Some(root));
    }

    #[test]
    fn test_nested_target_found_depth_first() {
        let mut world = World::new();
        let root = world.spawn_empty().id();
        let branch = world.spawn(ChildOf(root)).id();
        let deep = world.spawn((CameraTarget, ChildOf(branch))).id();
        let _shallow_later = world.spawn((CameraTarget, ChildOf(root))).id();

        assert_eq!(lookup(&mut world, root), Some(deep));
    }

    #[test]
    fn test_no_target_in_hierarchy() {
        let mut world = World::new();
        let root = world.spawn_empty().id();
        world.spawn(ChildOf(root));
        let lone = world.spawn_empty().id();

        assert_eq!(lookup(&mut world, root), None);
        assert_eq!(lookup(&mut world, lone), None);
    }

    #[test]
    fn test_target_above_hit_is_not_found() {
        let mut world = World::new();
        let parent = world.spawn(CameraTarget).id();
        let hit = world.spawn(ChildOf(parent)).id();

        assert_eq!(lookup(&mut world, hit), None);
    }
}
