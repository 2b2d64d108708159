use glam::Vec3;

/// Where sounds are heard from. Usually follows the camera pose.
#[derive(Debug, Clone)]
pub struct Listener {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    /// Distance within which emitters play at full volume.
    pub min_distance: f32,
    /// Distance beyond which emitters are silent.
    pub max_distance: f32,
}

impl Default for Listener {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: -Vec3::Z,
            up: Vec3::Y,
            min_distance: 2.0,
            max_distance: 60.0,
        }
    }
}

/// Volume and pan for an emitter relative to the listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialParams {
    /// Attenuation factor (0.0–1.0).
    pub volume: f64,
    /// Stereo position (-1.0 = full left, 0.0 = center, 1.0 = full right).
    pub panning: f64,
}

impl SpatialParams {
    /// Panning in kira's 0.0 (left) .. 1.0 (right) convention.
    pub fn kira_panning(&self) -> f64 {
        (self.panning + 1.0) * 0.5
    }
}

/// Attenuate and pan an emitter at `emitter_pos`.
///
/// Inverse-distance rolloff from `min_distance`, with a linear fade to silence
/// as the emitter approaches `max_distance`.
pub fn compute_spatial(listener: &Listener, emitter_pos: Vec3) -> SpatialParams {
    let to_emitter = emitter_pos - listener.position;
    let distance = to_emitter.length();
    let min = listener.min_distance.max(f32::EPSILON);
    let max = listener.max_distance.max(min);

    if distance >= max {
        return SpatialParams {
            volume: 0.0,
            panning: 0.0,
        };
    }

    let rolloff = min / distance.max(min);
    let fade = 1.0 - ((distance - min).max(0.0) / (max - min).max(f32::EPSILON));
    let volume = (rolloff * fade).clamp(0.0, 1.0) as f64;

    let right = listener.forward.cross(listener.up).normalize_or_zero();
    let panning = match to_emitter.try_normalize() {
        Some(direction) => direction.dot(right).clamp(-1.0, 1.0) as f64,
        None => 0.0,
    };

    SpatialParams { volume, panning }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitter_on_listener_is_full_and_centered() {
        let params = compute_spatial(&Listener::default(), Vec3::ZERO);
        assert_eq!(params.volume, 1.0);
        assert_eq!(params.panning, 0.0);
        assert_eq!(params.kira_panning(), 0.5);
    }

    #[test]
    fn character_in_front_of_camera_within_min_distance() {
        let params = compute_spatial(&Listener::default(), Vec3::new(0.0, 0.0, -1.5));
        assert_eq!(params.volume, 1.0);
        assert!(params.panning.abs() < 1e-6);
    }

    #[test]
    fn emitter_to_the_right_pans_right() {
        let params = compute_spatial(&Listener::default(), Vec3::new(5.0, 0.0, 0.0));
        assert!(params.panning > 0.9, "{}", params.panning);
        assert!(params.volume < 1.0);
    }

    #[test]
    fn beyond_max_distance_is_silent() {
        let params = compute_spatial(&Listener::default(), Vec3::new(0.0, 0.0, -80.0));
        assert_eq!(params.volume, 0.0);
    }

    #[test]
    fn attenuation_increases_with_distance() {
        let listener = Listener::default();
        let near = compute_spatial(&listener, Vec3::new(0.0, 0.0, -4.0));
        let far = compute_spatial(&listener, Vec3::new(0.0, 0.0, -20.0));
        assert!(near.volume > far.volume);
    }
}
