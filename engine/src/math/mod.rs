//! Math helpers shared by the rig
//!
//! Angles stored by the rig are in **degrees**; quaternions and vectors come
//! from glam. Cameras look down their local -Z axis (right-handed, Y up).

pub mod ease;
pub mod range;

pub use ease::EaseCurve;
pub use glam::{Mat3, Quat, Vec2, Vec3};
pub use range::{FloatRange, clamp_to_range};

/// Below this length a direction is treated as degenerate.
const DIRECTION_EPSILON: f32 = 1e-6;

/// Move `current` toward `target` by at most `max_delta`, never overshooting.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Vector version of [`move_towards`].
pub fn move_towards_vec3(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance <= DIRECTION_EPSILON {
        target
    } else {
        current + to_target / distance * max_delta
    }
}

/// Shortest signed difference `target - current` in degrees, in `(-180, 180]`.
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut diff = (target - current) % 360.0;
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff <= -180.0 {
        diff += 360.0;
    }
    diff
}

/// Wrap a yaw accumulator into `[-360, 360]`.
#[inline]
pub fn wrap_yaw(yaw: f32) -> f32 {
    yaw % 360.0
}

/// Remove the component of `vector` along `normal`.
pub fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    let len_sq = normal.length_squared();
    if len_sq <= DIRECTION_EPSILON {
        return vector;
    }
    vector - normal * (vector.dot(normal) / len_sq)
}

/// Orientation whose local -Z points along `forward` with `up` as the
/// preferred up direction.
///
/// Returns `None` when `forward` is (near) zero. When `forward` is parallel to
/// `up`, an arbitrary perpendicular right axis is used.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.try_normalize()?;
    let mut right = forward.cross(up);
    if right.length_squared() <= DIRECTION_EPSILON {
        right = forward.any_orthonormal_vector();
    }
    let right = right.normalize();
    let up = right.cross(forward);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, -forward)))
}

/// World-space forward (local -Z) of an orientation.
#[inline]
pub fn forward_of(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_Z
}

/// Heading of a direction on the ground plane, in degrees.
///
/// 0° looks down -Z, positive angles turn toward +X (clockwise seen from above).
pub fn heading_degrees(direction: Vec3) -> Option<f32> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() <= DIRECTION_EPSILON {
        return None;
    }
    Some(flat.x.atan2(-flat.z).to_degrees())
}
