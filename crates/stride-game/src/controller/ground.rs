//! Ground detection

use glam::Vec3;
use stride_physics::CollisionProbe;

use super::{ControllerConfig, ControllerState};

/// Result of one ground probe
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroundContact {
    /// Standing on a surface this frame
    pub grounded: bool,
    /// Surface point under the feet
    pub point: Option<Vec3>,
    /// Surface normal, when the query produced one
    pub normal: Option<Vec3>,
    /// Feet height to snap to (kinematic only)
    pub snap_height: Option<f32>,
}

impl GroundContact {
    /// No surface within reach
    pub fn airborne() -> Self {
        Self::default()
    }
}

/// Downward raycast for the kinematic controller.
///
/// Grounded when a surface lies within clearance plus snap distance of the
/// feet and the character is not rising. The probe starts above the feet so
/// a small penetration still finds the floor.
pub fn probe_kinematic(
    probe: &dyn CollisionProbe,
    state: &ControllerState,
    config: &ControllerConfig,
) -> GroundContact {
    let lift = config.ground_probe_lift;
    let origin = state.position + Vec3::Y * lift;
    let reach = lift + config.ground_clearance + config.ground_snap_distance;

    let Some(hit) = probe.cast_ray(origin, Vec3::NEG_Y, reach) else {
        return GroundContact::airborne();
    };
    if state.vertical_velocity > 0.0 {
        return GroundContact::airborne();
    }

    GroundContact {
        grounded: true,
        point: Some(hit.point),
        normal: hit.normal,
        snap_height: Some(hit.point.y + config.ground_clearance),
    }
}

/// Short downward probe for the dynamics controller.
///
/// The backend owns the position, so nothing is snapped. A body that is
/// dropping faster than `descent_threshold` is never grounded, even if the
/// ray grazes a surface it is falling past.
pub fn probe_dynamics(
    probe: &dyn CollisionProbe,
    state: &ControllerState,
    config: &ControllerConfig,
) -> GroundContact {
    if state.vertical_velocity < -config.descent_threshold {
        return GroundContact::airborne();
    }

    let lift = config.ground_probe_lift;
    let origin = state.position + Vec3::Y * lift;
    match probe.cast_ray(origin, Vec3::NEG_Y, lift + config.ground_reach) {
        Some(hit) => GroundContact {
            grounded: true,
            point: Some(hit.point),
            normal: hit.normal,
            snap_height: None,
        },
        None => GroundContact::airborne(),
    }
}

/// Fold a fresh contact into the state: grounded flag, air time, and the
/// kinematic height snap.
pub fn apply_contact(state: &mut ControllerState, contact: &GroundContact, dt: f32) {
    state.grounded = contact.grounded;
    state.ground_point = contact.point;

    if contact.grounded {
        state.air_time = 0.0;
        if let Some(height) = contact.snap_height {
            state.position.y = height;
            state.vertical_velocity = state.vertical_velocity.max(0.0);
        }
    } else {
        state.air_time += dt;
    }
}

#[cfg(test)]
mod tests {
    use stride_physics::PhysicsWorld;

    use super::*;

    fn floor() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        world
    }

    #[test]
    fn test_standing_on_floor_snaps_to_clearance() {
        let world = floor();
        let config = ControllerConfig::kinematic();
        let mut state = ControllerState::new(Vec3::new(0.0, 0.1, 0.0), 75.0);

        let contact = probe_kinematic(&world, &state, &config);
        assert!(contact.grounded);

        apply_contact(&mut state, &contact, 0.016);
        assert!((state.position.y - config.ground_clearance).abs() < 1e-4);
        assert_eq!(state.air_time, 0.0);
    }

    #[test]
    fn test_slightly_below_floor_still_grounded() {
        let world = floor();
        let config = ControllerConfig::kinematic();
        let state = ControllerState::new(Vec3::new(0.0, -0.2, 0.0), 75.0);
        assert!(probe_kinematic(&world, &state, &config).grounded);
    }

    #[test]
    fn test_high_above_floor_is_airborne() {
        let world = floor();
        let config = ControllerConfig::kinematic();
        let mut state = ControllerState::new(Vec3::new(0.0, 3.0, 0.0), 75.0);

        let contact = probe_kinematic(&world, &state, &config);
        assert!(!contact.grounded);
        apply_contact(&mut state, &contact, 0.1);
        apply_contact(&mut state, &contact, 0.1);
        assert!((state.air_time - 0.2).abs() < 1e-6);
        assert_eq!(state.position.y, 3.0);
    }

    #[test]
    fn test_rising_character_is_not_grounded() {
        let world = floor();
        let config = ControllerConfig::kinematic();
        let mut state = ControllerState::new(Vec3::new(0.0, 0.05, 0.0), 75.0);
        state.vertical_velocity = 15.0;
        assert!(!probe_kinematic(&world, &state, &config).grounded);
    }

    #[test]
    fn test_empty_world_is_never_grounded() {
        let world = PhysicsWorld::new();
        let config = ControllerConfig::kinematic();
        let state = ControllerState::new(Vec3::ZERO, 75.0);
        assert!(!probe_kinematic(&world, &state, &config).grounded);
        assert!(!probe_dynamics(&world, &state, &ControllerConfig::dynamics()).grounded);
    }

    #[test]
    fn test_dynamics_probe_rejects_fast_descent() {
        let world = floor();
        let config = ControllerConfig::dynamics();
        let mut state = ControllerState::new(Vec3::new(0.0, 0.05, 0.0), 75.0);

        assert!(probe_dynamics(&world, &state, &config).grounded);

        state.vertical_velocity = -3.0;
        assert!(!probe_dynamics(&world, &state, &config).grounded);

        // A small negative speed from contact jitter still counts
        state.vertical_velocity = -0.2;
        assert!(probe_dynamics(&world, &state, &config).grounded);
    }
}
