use super::MoverDef;
use bevy::prelude::*;

/// Keeps an object in motion every frame.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum Mover {
    Spin {
        radians_per_second: f32,
    },
    Patrol {
        from: Vec3,
        to: Vec3,
        speed: f32,
        /// Heading toward `to` when true.
        outbound: bool,
    },
}

impl Mover {
    /// Builds the runtime mover for an object spawned at `origin`.
    pub fn from_def(def: &MoverDef, origin: Vec3) -> Self {
        match *def {
            MoverDef::Spin { degrees_per_second } => Mover::Spin {
                radians_per_second: degrees_per_second.to_radians(),
            },
            MoverDef::Patrol { to, speed } => Mover::Patrol {
                from: origin,
                to: Vec3::from_array(to),
                speed: speed.max(0.0),
                outbound: true,
            },
        }
    }

    fn advance(&mut self, transform: &mut Transform, dt: f32) {
        match self {
            Mover::Spin { radians_per_second } => transform.rotate_y(*radians_per_second * dt),
            Mover::Patrol {
                from,
                to,
                speed,
                outbound,
            } => {
                let goal = if *outbound { *to } else { *from };
                let offset = goal - transform.translation;
                let step = *speed * dt;
                if offset.length() <= step {
                    transform.translation = goal;
                    *outbound = !*outbound;
                } else {
                    transform.translation += offset.normalize_or_zero() * step;
                }
            }
        }
    }
}

pub(super) fn animate_movers(time: Res<Time>, mut movers: Query<(&mut Mover, &mut Transform)>) {
    let dt = time.delta_secs();
    for (mut mover, mut transform) in &mut movers {
        mover.advance(&mut transform, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patrol_turns_around_at_both_ends() {
        let mut mover = Mover::from_def(
            &MoverDef::Patrol {
                to: [4.0, 0.0, 0.0],
                speed: 2.0,
            },
            Vec3::ZERO,
        );
        let mut transform = Transform::default();

        mover.advance(&mut transform, 1.0);
        assert_eq!(transform.translation, Vec3::new(2.0, 0.0, 0.0));

        mover.advance(&mut transform, 1.5);
        assert_eq!(transform.translation, Vec3::new(4.0, 0.0, 0.0));
        assert!(matches!(mover, Mover::Patrol { outbound: false, .. }));

        mover.advance(&mut transform, 1.0);
        assert_eq!(transform.translation, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_spin_rotates_about_y() {
        let mut mover = Mover::from_def(
            &MoverDef::Spin {
                degrees_per_second: 90.0,
            },
            Vec3::ZERO,
        );
        let mut transform = Transform::from_xyz(1.0, 0.0, 0.0);

        mover.advance(&mut transform, 1.0);

        assert_eq!(transform.translation, Vec3::new(1.0, 0.0, 0.0));
        assert!(transform.forward().abs_diff_eq(Vec3::NEG_X, 1e-5));
    }

    #[test]
    fn test_negative_patrol_speed_stands_still() {
        let mut mover = Mover::from_def(
            &MoverDef::Patrol {
                to: [4.0, 0.0, 0.0],
                speed: -3.0,
            },
            Vec3::ZERO,
        );
        let Mover::Patrol { speed, .. } = mover else {
            panic!("expected a patrol");
        };
        assert_eq!(speed, 0.0);

        let mut transform = Transform::default();
        for _ in 0..3 {
            mover.advance(&mut transform, 0.5);
        }

        assert_eq!(transform.translation, Vec3::ZERO);
        assert!(transform.translation.is_finite());
    }

    #[test]
    fn test_patrol_parked_on_goal_stays_finite() {
        let mut mover = Mover::from_def(
            &MoverDef::Patrol {
                to: [0.0, 0.0, 0.0],
                speed: 0.0,
            },
            Vec3::ZERO,
        );
        let mut transform = Transform::default();

        for _ in 0..4 {
            mover.advance(&mut transform, 0.25);
            assert!(transform.translation.is_finite());
        }
        assert_eq!(transform.translation, Vec3::ZERO);
    }
}
