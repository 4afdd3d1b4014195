pub mod angle;
pub mod pose;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Rigid transform (rotation + translation).
pub type Isometry3 = nalgebra::Isometry3<f64>;

/// Unit quaternion rotation.
pub type UnitQuaternion = nalgebra::UnitQuaternion<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-9;

/// World up axis (+Y).
#[must_use]
pub fn up() -> Vector3 {
    Vector3::y()
}

/// Returns `true` if two points are within `epsilon` of each other.
#[must_use]
pub fn same_point(a: &Point3, b: &Point3, epsilon: f64) -> bool {
    nalgebra::distance(a, b) <= epsilon
}
