use crate::constants::LOG_FLOOR;

/// Index of the interval `[xs[i], xs[i + 1]]` containing `x`.
///
/// Returns the largest `i` with `xs[i] < x`, clamped to `[0, xs.len() - 2]`,
/// so `i + 1` is always a valid index. `xs` must be sorted and hold at least
/// two values.
pub fn lower_bound_index(xs: &[f64], x: f64) -> usize {
    debug_assert!(xs.len() >= 2, "bracketing needs at least two points");
    xs.partition_point(|&v| v < x)
        .saturating_sub(1)
        .min(xs.len() - 2)
}

/// Like [`lower_bound_index`] but an exact match on a knot selects the
/// interval starting at that knot.
pub fn upper_bound_index(xs: &[f64], x: f64) -> usize {
    debug_assert!(xs.len() >= 2, "bracketing needs at least two points");
    xs.partition_point(|&v| v <= x)
        .saturating_sub(1)
        .min(xs.len() - 2)
}

/// Linear interpolation of a single value.
///
/// Values outside the range are clamped to the boundary values.
pub fn interp_one(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[xp.len() - 1] {
        return fp[fp.len() - 1];
    }

    let lo = lower_bound_index(xp, x);
    let t = (x - xp[lo]) / (xp[lo + 1] - xp[lo]);
    fp[lo] + t * (fp[lo + 1] - fp[lo])
}

/// Natural logarithm, with zero and negative values mapped to a large
/// negative floor so they vanish again after `exp`.
#[inline]
pub fn log_or_floor(v: f64) -> f64 {
    if v > 0.0 { v.ln() } else { LOG_FLOOR }
}

/// Interpolate a log-stored table at `(i, f)` and return the linear value.
#[inline]
pub fn exp_interp(log_values: &[f64], i: usize, f: f64) -> f64 {
    (log_values[i] + f * (log_values[i + 1] - log_values[i])).exp()
}

/// True if every value is strictly greater than its predecessor.
pub fn is_strictly_increasing(xs: &[f64]) -> bool {
    xs.windows(2).all(|w| w[1] > w[0])
}
