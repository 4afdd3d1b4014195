use std::f64::consts::TAU;

use super::{Point3, Vector3, TOLERANCE};

/// Number of horizontal probe directions around a vertex.
pub const HORIZONTAL_DIRECTIONS: usize = 8;

/// Unsigned angle between two vectors, in degrees.
///
/// Returns `0.0` when either vector is (nearly) zero-length.
#[must_use]
pub fn angle_degrees(a: &Vector3, b: &Vector3) -> f64 {
    let denom = (a.norm_squared() * b.norm_squared()).sqrt();
    if denom < TOLERANCE * TOLERANCE {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Projects a vector onto the horizontal (XZ) plane.
#[must_use]
pub fn flatten(v: &Vector3) -> Vector3 {
    Vector3::new(v.x, 0.0, v.z)
}

/// Vertical slope of the segment `from -> to`, in degrees.
///
/// A segment with no horizontal extent is reported as 90 degrees; a
/// zero-length segment as 0.
#[must_use]
pub fn slope_degrees(from: &Point3, to: &Point3) -> f64 {
    let dir = to - from;
    let flat = flatten(&dir);
    if flat.norm() < TOLERANCE {
        return if dir.norm() < TOLERANCE { 0.0 } else { 90.0 };
    }
    angle_degrees(&dir, &flat)
}

/// Horizontal turn at `current` when walking `previous -> current -> next`, in degrees.
#[must_use]
pub fn turn_degrees(previous: &Point3, current: &Point3, next: &Point3) -> f64 {
    let prev_dir = flatten(&(current - previous));
    let next_dir = flatten(&(next - current));
    angle_degrees(&next_dir, &prev_dir)
}

/// The eight horizontal probe directions, starting at +Z and stepping 45
/// degrees around the up axis.
#[must_use]
pub fn horizontal_directions() -> [Vector3; HORIZONTAL_DIRECTIONS] {
    std::array::from_fn(|i| {
        #[allow(clippy::cast_precision_loss)]
        let theta = TAU * i as f64 / HORIZONTAL_DIRECTIONS as f64;
        // Rotation about +Y applied to +Z.
        Vector3::new(theta.sin(), 0.0, theta.cos())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn angle_of_perpendicular_vectors() {
        assert_relative_eq!(angle_degrees(&Vector3::x(), &Vector3::z()), 90.0, epsilon = 1e-9);
        assert_relative_eq!(angle_degrees(&Vector3::x(), &-Vector3::x()), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn angle_with_zero_vector_is_zero() {
        assert_relative_eq!(angle_degrees(&Vector3::zeros(), &Vector3::x()), 0.0);
    }

    #[test]
    fn slope_of_flat_and_vertical_segments() {
        assert_relative_eq!(slope_degrees(&p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0)), 0.0, epsilon = 1e-9);
        assert_relative_eq!(slope_degrees(&p(0.0, 0.0, 0.0), &p(1.0, 1.0, 0.0)), 45.0, epsilon = 1e-9);
        assert_relative_eq!(slope_degrees(&p(0.0, 0.0, 0.0), &p(0.0, 2.0, 0.0)), 90.0);
        assert_relative_eq!(slope_degrees(&p(1.0, 1.0, 1.0), &p(1.0, 1.0, 1.0)), 0.0);
    }

    #[test]
    fn turn_ignores_height() {
        let turn = turn_degrees(&p(0.0, 0.0, 0.0), &p(1.0, 0.5, 0.0), &p(2.0, 2.0, 0.0));
        assert_relative_eq!(turn, 0.0, epsilon = 1e-9);

        let turn = turn_degrees(&p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0), &p(1.0, 0.0, 1.0));
        assert_relative_eq!(turn, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn eight_unit_directions_around_up() {
        let dirs = horizontal_directions();
        assert_relative_eq!(dirs[0], Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(dirs[2], Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(dirs[4], -Vector3::z(), epsilon = 1e-12);
        for d in dirs {
            assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(d.y, 0.0);
        }
    }
}
