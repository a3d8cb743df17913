use crate::math::{Quat, Vec3};

/// Fourth-order Runge-Kutta step for position and velocity under a constant
/// acceleration.
///
/// Velocity slopes are all `a·dt`; position slopes sample the velocity at the
/// start, twice at the midpoint and at the end. Returns the new
/// `(position, velocity)`.
pub fn rk4_linear(position: Vec3, velocity: Vec3, acceleration: Vec3, dt: f32) -> (Vec3, Vec3) {
    let k1v = acceleration * dt;
    let k1x = velocity * dt;

    let k2v = acceleration * dt;
    let k2x = (velocity + k1v * 0.5) * dt;

    let k3v = acceleration * dt;
    let k3x = (velocity + k2v * 0.5) * dt;

    let k4v = acceleration * dt;
    let k4x = (velocity + k3v) * dt;

    let position = position + (k1x + k2x * 2.0 + k3x * 2.0 + k4x) / 6.0;
    let velocity = velocity + (k1v + k2v * 2.0 + k3v * 2.0 + k4v) / 6.0;
    (position, velocity)
}

/// `q̇ = ½ (ω, 0) q` for a world-space angular velocity
#[inline]
fn orientation_derivative(orientation: Quat, angular_velocity: Vec3) -> Quat {
    Quat::from_pure(angular_velocity) * orientation * 0.5
}

/// Fourth-order Runge-Kutta step for an orientation, renormalized afterwards.
///
/// The slopes are evaluated at the intermediate orientations, not only at
/// the start. A body with no angular velocity keeps its orientation bit for
/// bit.
pub fn rk4_orientation(orientation: Quat, angular_velocity: Vec3, dt: f32) -> Quat {
    if angular_velocity == Vec3::ZERO {
        return orientation;
    }
    let k1 = orientation_derivative(orientation, angular_velocity);
    let k2 = orientation_derivative(orientation + k1 * (dt * 0.5), angular_velocity);
    let k3 = orientation_derivative(orientation + k2 * (dt * 0.5), angular_velocity);
    let k4 = orientation_derivative(orientation + k3 * dt, angular_velocity);

    let slope = k1 + k2 * 2.0 + k3 * 2.0 + k4;
    (orientation + slope * (dt / 6.0)).normalize()
}

/// Fraction of velocity kept after `dt` for a per-second retention factor.
/// Retention is clamped to `[0, 1]`; 1 keeps everything.
#[inline]
pub fn damping_factor(retention: f32, dt: f32) -> f32 {
    if retention.is_nan() {
        return 1.0;
    }
    retention.clamp(0.0, 1.0).powf(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_constant_acceleration_matches_closed_form() {
        let g = Vec3::new(0.0, -9.8, 0.0);
        let v0 = Vec3::new(2.0, 1.0, 0.0);
        let dt = 0.1;

        let (x, v) = rk4_linear(Vec3::ZERO, v0, g, dt);

        let expected_x = v0 * dt + g * (0.5 * dt * dt);
        assert!((x - expected_x).length() < 1e-6);
        assert!((v - (v0 + g * dt)).length() < 1e-6);
    }

    #[test]
    fn test_zero_acceleration_is_straight_line() {
        let v0 = Vec3::new(1.0, -2.0, 3.0);
        let (x, v) = rk4_linear(Vec3::ONE, v0, Vec3::ZERO, 0.5);
        assert_eq!(v, v0);
        assert!((x - (Vec3::ONE + v0 * 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_half_turn_about_z() {
        let mut q = Quat::IDENTITY;
        let omega = Vec3::new(0.0, 0.0, PI);
        for _ in 0..100 {
            q = rk4_orientation(q, omega, 0.01);
        }
        // After 1 second at π rad/s the local X axis points along -X
        let x_axis = q.rotate_vec(Vec3::X);
        assert!((x_axis - (-Vec3::X)).length() < EPSILON);
    }

    #[test]
    fn test_orientation_stays_unit() {
        let mut q = Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.3);
        let omega = Vec3::new(3.0, -7.0, 11.0);
        for _ in 0..500 {
            q = rk4_orientation(q, omega, 0.05);
            assert!((q.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_still_body_keeps_exact_state() {
        let q = Quat::from_axis_angle(Vec3::new(0.2, 1.0, -0.4), 0.9).normalize();
        assert_eq!(rk4_orientation(q, Vec3::ZERO, 0.1), q);

        let p = Vec3::new(1.5, -2.25, 0.125);
        assert_eq!(rk4_linear(p, Vec3::ZERO, Vec3::ZERO, 0.1), (p, Vec3::ZERO));
    }

    #[test]
    fn test_damping_factor() {
        assert_eq!(damping_factor(1.0, 0.3), 1.0);
        assert_eq!(damping_factor(0.5, 1.0), 0.5);
        assert!((damping_factor(0.99, 0.1) - 0.99f32.powf(0.1)).abs() < 1e-7);
        assert_eq!(damping_factor(2.0, 0.5), 1.0);
        assert_eq!(damping_factor(-1.0, 0.5), 0.0);
    }
}
