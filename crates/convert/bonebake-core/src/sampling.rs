//! Curve evaluation for baked clips.
//!
//! Model:
//! - Keys are visited in time order; keys sharing a time keep their produced
//!   order, and the later one wins at that exact time.
//! - A segment [Ki -> K(i+1)] is a linear blend unless Ki is a step key, in
//!   which case Ki's value is held until K(i+1).
//! - Before the first key the first value holds; after the last, the last.

use crate::curve::{Curve, CurveKey, Interpolation};

/// Find the segment [i, i+1] of `keys` (time ordered) containing `t` and return
/// (i, i+1, local_t). Returns (i, i, 0) when `t` is at or beyond the last key
/// or before the first, where `i` is the key to use.
fn find_segment(keys: &[&CurveKey], t: f32) -> (usize, usize, f32) {
    let n = keys.len();
    // NaN `t` lands here as well.
    if n == 1 || !(t >= keys[0].time) {
        return (0, 0, 0.0);
    }
    // Last key with time <= t, so duplicate stamps resolve to the later key.
    let i = keys.partition_point(|k| k.time <= t) - 1;
    if i + 1 >= n {
        return (n - 1, n - 1, 0.0);
    }
    let t0 = keys[i].time;
    let t1 = keys[i + 1].time;
    let denom = (t1 - t0).max(f32::EPSILON);
    (i, i + 1, ((t - t0) / denom).clamp(0.0, 1.0))
}

/// Evaluate `curve` at `t` seconds. `None` for an empty curve.
pub fn sample_curve(curve: &Curve, t: f32) -> Option<f32> {
    if curve.is_empty() {
        return None;
    }
    let mut keys: Vec<&CurveKey> = curve.keys.iter().collect();
    // Stable: equal times keep their produced order.
    keys.sort_by(|a, b| a.time.total_cmp(&b.time));

    let (i0, i1, lt) = find_segment(&keys, t);
    let left = keys[i0];
    if i0 == i1 || left.interpolation == Interpolation::Step {
        return Some(left.value);
    }
    let right = keys[i1];
    Some(left.value + (right.value - left.value) * lt)
}
