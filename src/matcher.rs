// Decides whether a pixel is "key" (to be replaced by the background).

use crate::types::KeyColor;

/// True when `value` lies strictly inside (target - tolerance, target + tolerance).
/// The bounds themselves do not match.
#[inline]
pub fn near(value: u8, target: u8, tolerance: u16) -> bool {
    let (v, t, tol) = (i32::from(value), i32::from(target), i32::from(tolerance));
    v > t - tol && v < t + tol
}

/// All three channels must be near the key color; alpha is never looked at.
#[inline]
pub fn is_key(r: u8, g: u8, b: u8, key: &KeyColor) -> bool {
    near(r, key.r, key.tolerance) && near(g, key.g, key.tolerance) && near(b, key.b, key.tolerance)
}
