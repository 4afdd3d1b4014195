use super::{up, Isometry3, Point3, Vector3, TOLERANCE};

/// Builds a pose at `eye` whose local +Z axis faces `target`.
///
/// Up is taken from the world +Y axis. When the view direction is parallel
/// to it, +Z is used as the up hint instead. A zero-length view direction
/// yields an unrotated pose at `eye`.
#[must_use]
pub fn look_at(eye: &Point3, target: &Point3) -> Isometry3 {
    let dir = target - eye;
    if dir.norm() < TOLERANCE {
        return Isometry3::translation(eye.x, eye.y, eye.z);
    }
    let hint = if dir.normalize().cross(&up()).norm() < 1e-6 {
        Vector3::z()
    } else {
        up()
    };
    Isometry3::face_towards(eye, target, &hint)
}

/// Local +X axis of a pose in world space.
#[must_use]
pub fn right(pose: &Isometry3) -> Vector3 {
    pose.rotation * Vector3::x()
}
