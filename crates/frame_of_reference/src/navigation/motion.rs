//! Frame-rate scaled interpolation toward a target pose.

use bevy::prelude::*;

/// How fast a navigator closes in on its target and when it counts as arrived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSettings {
    pub moving_speed: f32,
    pub rotation_speed: f32,
    /// Arrival distance per second of frame time (`distance < dt * this`).
    pub arrival_distance_per_second: f32,
    pub arrival_angle_degrees: f32,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            moving_speed: 5.0,
            rotation_speed: 3.0,
            arrival_distance_per_second: 5.0,
            arrival_angle_degrees: 1.0,
        }
    }
}

/// Result of advancing one frame toward a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Still travelling; the pose after this frame.
    Moving(Transform),
    /// Close enough; the pose snapped exactly onto the target.
    Arrived(Transform),
}

impl Step {
    pub fn transform(&self) -> Transform {
        match self {
            Step::Moving(transform) | Step::Arrived(transform) => *transform,
        }
    }

    pub fn is_arrived(&self) -> bool {
        matches!(self, Step::Arrived(_))
    }
}

/// Advances `current` toward the world pose `target` by one frame of `dt` seconds.
///
/// Position is lerped, orientation slerped, each with a factor clamped to
/// `[0, 1]`. Scale is never touched.
pub fn step_toward(
    current: &Transform,
    target_translation: Vec3,
    target_rotation: Quat,
    dt: f32,
    settings: &MotionSettings,
) -> Step {
    let move_t = (dt * settings.moving_speed).clamp(0.0, 1.0);
    let turn_t = (dt * settings.rotation_speed).clamp(0.0, 1.0);

    let translation = current.translation.lerp(target_translation, move_t);
    let rotation = current.rotation.slerp(target_rotation, turn_t).normalize();

    let distance = translation.distance(target_translation);
    let angle = rotation.angle_between(target_rotation).to_degrees();

    if distance < dt * settings.arrival_distance_per_second
        && angle < settings.arrival_angle_degrees
    {
        Step::Arrived(Transform {
            translation: target_translation,
            rotation: target_rotation,
            scale: current.scale,
        })
    } else {
        Step::Moving(Transform {
            translation,
            rotation,
            scale: current.scale,
        })
    }
}
