//! Float ordering that does not depend on sign-of-zero or NaN payloads.

use core::cmp::Ordering;

/// Fold `-0.0` into `0.0` and every NaN into one NaN.
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Total order over canonicalized values; use for pick distances and sort keys.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}
