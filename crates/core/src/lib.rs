//! Core units, constants, and shared primitives for the rocket staging workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Mean Earth radius used for flat-Earth geodetic offsets (m).
    pub const EARTH_MEAN_RADIUS_M: f64 = 6_378_000.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use std::f64::consts::PI;

    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v * PI / 180.0
    }

    /// Convert radians to degrees.
    #[inline]
    pub fn rad_to_deg(v: f64) -> f64 {
        v * 180.0 / PI
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in metres, m/s, or rad/s depending on context.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Linear blend `a + (b - a) * s`.
    #[inline]
    pub fn lerp(a: &Vector3, b: &Vector3, s: f64) -> Vector3 {
        [
            a[0] + (b[0] - a[0]) * s,
            a[1] + (b[1] - a[1]) * s,
            a[2] + (b[2] - a[2]) * s,
        ]
    }
}

/// Attitude quaternions in scalar-first `(e0, e1, e2, e3)` order.
pub mod quaternion {
    use super::units::rad_to_deg;
    use super::vector::Vector3;

    pub type Quaternion = [f64; 4];

    /// Identity attitude.
    pub const IDENTITY: Quaternion = [1.0, 0.0, 0.0, 0.0];

    /// Quaternion magnitude.
    #[inline]
    pub fn norm(q: &Quaternion) -> f64 {
        (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt()
    }

    /// Component-wise linear blend. Not renormalised.
    #[inline]
    pub fn lerp(a: &Quaternion, b: &Quaternion, s: f64) -> Quaternion {
        [
            a[0] + (b[0] - a[0]) * s,
            a[1] + (b[1] - a[1]) * s,
            a[2] + (b[2] - a[2]) * s,
            a[3] + (b[3] - a[3]) * s,
        ]
    }

    /// Direction of the body longitudinal axis expressed in the local frame
    /// (x east, y north, z up).
    pub fn body_axis(q: &Quaternion) -> Vector3 {
        let n = norm(q);
        let [e0, e1, e2, e3] = if n > 0.0 {
            [q[0] / n, q[1] / n, q[2] / n, q[3] / n]
        } else {
            IDENTITY
        };
        [
            2.0 * (e1 * e3 + e0 * e2),
            2.0 * (e2 * e3 - e0 * e1),
            1.0 - 2.0 * (e1 * e1 + e2 * e2),
        ]
    }

    /// Inclination above the horizon and heading from north (both degrees) of the body axis.
    ///
    /// Heading is wrapped into `[0, 360)`; a vertical axis reports heading 0.
    pub fn inclination_heading_deg(q: &Quaternion) -> (f64, f64) {
        let axis = body_axis(q);
        let inclination = rad_to_deg(axis[2].clamp(-1.0, 1.0).asin());
        let horizontal = (axis[0] * axis[0] + axis[1] * axis[1]).sqrt();
        let heading = if horizontal < 1e-12 {
            0.0
        } else {
            rad_to_deg(axis[0].atan2(axis[1])).rem_euclid(360.0)
        };
        (inclination, heading)
    }
}
