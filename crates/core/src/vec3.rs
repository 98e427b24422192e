//! Small 3-vector helpers on plain `[f64; 3]` arrays.

pub type Vec3 = [f64; 3];

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// `a × b`
#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

#[inline]
pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// `a0 * e0 + a1 * e1 + a2 * e2`
#[inline]
pub fn combine(coeffs: [f64; 3], e0: Vec3, e1: Vec3, e2: Vec3) -> Vec3 {
    [
        coeffs[0] * e0[0] + coeffs[1] * e1[0] + coeffs[2] * e2[0],
        coeffs[0] * e0[1] + coeffs[1] * e1[1] + coeffs[2] * e2[1],
        coeffs[0] * e0[2] + coeffs[1] * e1[2] + coeffs[2] * e2[2],
    ]
}
