//! Click-to-navigate camera.
//!
//! A [`Navigator`] sits on a camera. Clicking an object that carries a
//! [`CameraTarget`] somewhere in its hierarchy makes the camera glide to that
//! target and attach itself there as a child, so it rides along with whatever
//! it landed on. Clicking a [`Finish`] object advances to the next level.
//!
//! One frame runs the sets in order: [`NavigationSet::Pick`] (ray cast under
//! the pointer), [`NavigationSet::Resolve`] (finish or retarget),
//! [`NavigationSet::Move`] (interpolate, arrive, reparent) and
//! [`NavigationSet::Reload`] (reload key).

mod motion;
mod picking;
mod systems;

use crate::{
    config::NavigationConfig,
    levels::{AdvanceLevel, ReloadLevel},
};
use bevy::prelude::*;

pub use motion::{MotionSettings, Step, step_toward};
pub use picking::{PointerPickingPlugin, find_camera_target};

/// Marks an entity the camera can travel to and parent under.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct CameraTarget;

/// Marks an object whose click advances to the next level.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Finish;

/// Drives the camera it is attached to toward a clicked [`CameraTarget`].
#[derive(Component, Debug, Clone, PartialEq)]
#[require(Transform)]
pub struct Navigator {
    /// Only `Some` while a transition is in progress.
    pending_target: Option<Entity>,
    pub motion: MotionSettings,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(MotionSettings::default())
    }
}

impl Navigator {
    pub fn new(motion: MotionSettings) -> Self {
        Self {
            pending_target: None,
            motion,
        }
    }

    pub fn pending_target(&self) -> Option<Entity> {
        self.pending_target
    }

    pub fn is_travelling(&self) -> bool {
        self.pending_target.is_some()
    }

    /// Starts travelling to `target`, replacing any transition in progress.
    ///
    /// Returns the target that was replaced.
    pub fn retarget(&mut self, target: Entity) -> Option<Entity> {
        self.pending_target.replace(target)
    }

    /// Ends the current transition, returning its target.
    pub fn clear(&mut self) -> Option<Entity> {
        self.pending_target.take()
    }
}

/// A click on `entity` as seen through `camera`.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectClicked {
    pub camera: Entity,
    pub entity: Entity,
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationSet {
    Pick,
    Resolve,
    Move,
    Reload,
}

/// Click resolution, movement and reload handling.
///
/// Turning raw pointer input into [`ObjectClicked`] is done by
/// [`PointerPickingPlugin`], which needs the render/mesh stack.
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ObjectClicked>()
            .add_message::<AdvanceLevel>()
            .add_message::<ReloadLevel>()
            .init_resource::<NavigationConfig>()
            .configure_sets(
                Update,
                (
                    NavigationSet::Pick,
                    NavigationSet::Resolve,
                    NavigationSet::Move,
                    NavigationSet::Reload,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    systems::resolve_clicks.in_set(NavigationSet::Resolve),
                    systems::move_toward_targets.in_set(NavigationSet::Move),
                    systems::reload_on_key
                        .in_set(NavigationSet::Reload)
                        .run_if(resource_exists::<ButtonInput<KeyCode>>),
                ),
            );
    }
}
