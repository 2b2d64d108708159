//! Frame-rate-independent easing
//!
//! All cosmetic values (FOV, lean, loop volume, facing) move toward their
//! targets with the same law: `x += (target - x) * factor`, where the factor
//! is derived from a per-60Hz-frame blend rate so a 30 Hz and a 144 Hz host
//! converge at the same wall-clock speed.

use std::f32::consts::{PI, TAU};

/// Reference frame rate the blend rates are expressed against.
const REFERENCE_HZ: f32 = 60.0;

/// Convert a per-reference-frame blend rate into the factor for `dt`.
///
/// At `dt = 1/60` this returns `rate` exactly. The result is always in
/// `[0, 1]`, which is what keeps easing free of overshoot.
pub fn blend_factor(rate: f32, dt: f32) -> f32 {
    let rate = rate.clamp(0.0, 1.0);
    if dt <= 0.0 {
        return 0.0;
    }
    (1.0 - (1.0 - rate).powf(dt * REFERENCE_HZ)).clamp(0.0, 1.0)
}

/// Move `current` toward `target` by the blend factor for `dt`.
pub fn ease_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * blend_factor(rate, dt)
}

/// Ease an angle toward a target along the shortest arc.
pub fn ease_angle_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let diff = wrap_angle(target - current);
    wrap_angle(current + diff * blend_factor(rate, dt))
}

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_frame_matches_linear_law() {
        let x = ease_toward(70.0, 80.0, 0.1, 1.0 / 60.0);
        assert!((x - 71.0).abs() < 1e-4, "{x}");
    }

    #[test]
    fn test_no_overshoot_with_large_steps() {
        let mut x = 0.0;
        for _ in 0..50 {
            let next = ease_toward(x, 1.0, 0.9, 0.1);
            assert!(next >= x);
            assert!(next <= 1.0);
            x = next;
        }
    }

    #[test]
    fn test_zero_dt_holds() {
        assert_eq!(ease_toward(3.0, 10.0, 0.5, 0.0), 3.0);
    }

    #[test]
    fn test_angle_takes_short_way() {
        let a = ease_angle_toward(PI - 0.1, -PI + 0.1, 0.5, 1.0 / 60.0);
        // Halfway across the seam, not back through zero.
        assert!(a.abs() > PI - 0.01, "{a}");
    }
}
