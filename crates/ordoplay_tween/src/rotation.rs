// SPDX-License-Identifier: MIT OR Apache-2.0
//! Euler-angle helpers.
//!
//! Euler angles are in degrees and use the Y-up, Z-forward convention where
//! a rotation is applied around Z, then X, then Y.

/// Wrap an angle into `[0, 360)`
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Normalize every axis into `[0, 360)`
pub fn normalize_euler(euler: [f32; 3]) -> [f32; 3] {
    [
        normalize_degrees(euler[0]),
        normalize_degrees(euler[1]),
        normalize_degrees(euler[2]),
    ]
}

/// Signed delta from `start` to `end` along the shorter arc.
///
/// Both angles are normalized first; the result lies in `[-180, 180]`.
pub fn shortest_delta(start: f32, end: f32) -> f32 {
    let start = normalize_degrees(start);
    let end = normalize_degrees(end);
    let delta = end - start;

    if delta > 180.0 {
        end - (start + 360.0)
    } else if delta < -180.0 {
        end - (start - 360.0)
    } else {
        delta
    }
}

/// Per-axis shortest deltas
pub fn shortest_deltas(start: [f32; 3], end: [f32; 3]) -> [f32; 3] {
    [
        shortest_delta(start[0], end[0]),
        shortest_delta(start[1], end[1]),
        shortest_delta(start[2], end[2]),
    ]
}

/// Signed angle in degrees from `from` to `to`, in `[-180, 180]`.
///
/// Positive when `to` is counter-clockwise of `from`. Zero-length vectors
/// give `0`.
pub fn signed_angle(from: [f32; 2], to: [f32; 2]) -> f32 {
    let denominator =
        ((from[0] * from[0] + from[1] * from[1]) * (to[0] * to[0] + to[1] * to[1])).sqrt();
    if denominator < 1e-15 {
        return 0.0;
    }

    let cos = ((from[0] * to[0] + from[1] * to[1]) / denominator).clamp(-1.0, 1.0);
    let angle = cos.acos().to_degrees();
    let cross = from[0] * to[1] - from[1] * to[0];

    if cross >= 0.0 {
        angle
    } else {
        -angle
    }
}

/// Euler angles that make an object at `from` face `to`, in `[0, 360)`.
///
/// Identity when the two points coincide.
pub fn look_at_euler(from: [f32; 3], to: [f32; 3]) -> [f32; 3] {
    let dir = [to[0] - from[0], to[1] - from[1], to[2] - from[2]];
    let horizontal = (dir[0] * dir[0] + dir[2] * dir[2]).sqrt();

    if horizontal < f32::EPSILON && dir[1].abs() < f32::EPSILON {
        return [0.0, 0.0, 0.0];
    }

    let pitch = (-dir[1]).atan2(horizontal).to_degrees();
    let yaw = dir[0].atan2(dir[2]).to_degrees();

    normalize_euler([pitch, yaw, 0.0])
}

/// Quaternion `[x, y, z, w]` from euler angles
pub fn euler_to_quat(euler: [f32; 3]) -> [f32; 4] {
    let half = |deg: f32| deg.to_radians() * 0.5;
    let (sx, cx) = half(euler[0]).sin_cos();
    let (sy, cy) = half(euler[1]).sin_cos();
    let (sz, cz) = half(euler[2]).sin_cos();

    let qx = [sx, 0.0, 0.0, cx];
    let qy = [0.0, sy, 0.0, cy];
    let qz = [0.0, 0.0, sz, cz];

    quat_mul(quat_mul(qy, qx), qz)
}

/// Euler angles in `[0, 360)` from a unit quaternion `[x, y, z, w]`
pub fn quat_to_euler(q: [f32; 4]) -> [f32; 3] {
    let [x, y, z, w] = q;

    let sin_x = (2.0 * (w * x - y * z)).clamp(-1.0, 1.0);
    let pitch = sin_x.asin();
    let yaw = (2.0 * (w * y + x * z)).atan2(1.0 - 2.0 * (x * x + y * y));
    let roll = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (x * x + z * z));

    normalize_euler([pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees()])
}

/// Hamilton product `a * b`
pub fn quat_mul(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}
