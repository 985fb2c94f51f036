use super::{LevelDefinition, LevelEntity, Mover, ObjectDef};
use crate::navigation::{CameraTarget, Finish, MotionSettings, Navigator};
use bevy::prelude::*;

/// Spawns camera, light and objects of `level`, all tagged [`LevelEntity`].
pub(super) fn spawn_level(
    commands: &mut Commands,
    level: &LevelDefinition,
    motion: MotionSettings,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        Name::new(format!("{} Camera", level.name)),
        Camera3d::default(),
        level.camera.transform(),
        Navigator::new(motion),
        LevelEntity,
    ));

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: level.light.illuminance,
            shadows_enabled: true,
            ..default()
        },
        level.light.pose.transform(),
        LevelEntity,
    ));

    for object in &level.objects {
        spawn_object(commands, object, meshes, materials);
    }
}

fn spawn_object(
    commands: &mut Commands,
    object: &ObjectDef,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let [r, g, b] = object.color;
    let transform = object.pose.transform();

    let mut entity = commands.spawn((
        Name::new(object.name.clone()),
        Mesh3d(meshes.add(object.shape.mesh())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            perceptual_roughness: 0.8,
            ..default()
        })),
        transform,
        LevelEntity,
    ));

    if object.finish {
        entity.insert(Finish);
    }
    if let Some(mover) = &object.mover {
        entity.insert(Mover::from_def(mover, transform.translation));
    }
    if let Some(target) = &object.camera_target {
        let name = format!("{} CameraTarget", object.name);
        let target_transform = target.transform();
        entity.with_children(|parent| {
            parent.spawn((Name::new(name), CameraTarget, target_transform));
        });
    }
}
