use super::{CameraTarget, Finish, Navigator, ObjectClicked, Step, find_camera_target, step_toward};
use crate::{
    config::NavigationConfig,
    levels::{AdvanceLevel, ReloadLevel},
};
use bevy::prelude::*;

/// Turns clicks into either a level advance or a new pending target.
///
/// Retargeting detaches the camera from its current parent while keeping its
/// world pose, so the next movement step starts from where the player sees it.
pub(super) fn resolve_clicks(
    mut commands: Commands,
    mut clicks: MessageReader<ObjectClicked>,
    mut advance: MessageWriter<AdvanceLevel>,
    mut navigators: Query<(
        &mut Navigator,
        &mut Transform,
        &GlobalTransform,
        Has<ChildOf>,
    )>,
    finish: Query<(), With<Finish>>,
    targets: Query<(), With<CameraTarget>>,
    children: Query<&Children>,
) {
    for click in clicks.read() {
        if finish.contains(click.entity) {
            info!("Finish clicked ({:?}), advancing level", click.entity);
            advance.write(AdvanceLevel);
            continue;
        }

        let Some(target) = find_camera_target(click.entity, &targets, &children) else {
            debug!("Clicked {:?} has no camera target", click.entity);
            continue;
        };

        let Ok((mut navigator, mut transform, global, has_parent)) =
            navigators.get_mut(click.camera)
        else {
            continue;
        };

        if let Some(previous) = navigator.retarget(target) {
            debug!("Replacing pending target {previous:?} with {target:?}");
        }

        if has_parent {
            *transform = global.compute_transform();
            commands.entity(click.camera).remove::<ChildOf>();
        }
    }
}

/// Moves every travelling navigator one frame closer to its target.
///
/// The camera is unparented while travelling, so its `Transform` is a world
/// pose. On arrival it snaps onto the target and becomes the target's child.
pub(super) fn move_toward_targets(
    mut commands: Commands,
    time: Res<Time>,
    mut navigators: Query<(Entity, &mut Navigator, &mut Transform)>,
    targets: Query<(&GlobalTransform, Option<&Name>)>,
) {
    let dt = time.delta_secs();

    for (camera, mut navigator, mut transform) in &mut navigators {
        let Some(target) = navigator.pending_target() else {
            continue;
        };

        let Ok((target_global, target_name)) = targets.get(target) else {
            // target despawned mid-flight
            debug!("Pending target {target:?} is gone, stopping");
            navigator.clear();
            continue;
        };

        let (_, target_rotation, target_translation) = target_global.to_scale_rotation_translation();

        match step_toward(
            &transform,
            target_translation,
            target_rotation,
            dt,
            &navigator.motion,
        ) {
            Step::Moving(next) => *transform = next,
            Step::Arrived(snapped) => {
                info!(
                    "Hit end destination and will now parent to - {}",
                    target_name.map_or_else(|| format!("{target:?}"), |name| name.to_string())
                );
                *transform = GlobalTransform::from(snapped).reparented_to(target_global);
                commands.entity(camera).insert(ChildOf(target));
                navigator.clear();
            }
        }
    }
}

/// Reloads the active level when the reload key goes down, travelling or not.
pub(super) fn reload_on_key(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<NavigationConfig>,
    mut reload: MessageWriter<ReloadLevel>,
) {
    if keys.just_pressed(config.reload_key) {
        info!("Reload key pressed");
        reload.write(ReloadLevel);
    }
}
