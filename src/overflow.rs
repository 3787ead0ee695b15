//! Minutes until a point reaches capacity.

/// Projected minutes until `current` reaches `capacity` at `fill_rate_lph`
/// liters per hour.
///
/// A non-positive (or NaN) rate never overflows and yields infinity, even
/// when the point is already full: nothing is accumulating. A full point that
/// is still filling yields 0.
pub fn minutes_to_overflow(current: f64, capacity: f64, fill_rate_lph: f64) -> f64 {
    if !(fill_rate_lph > 0.0) {
        return f64::INFINITY;
    }
    let remaining = (capacity - current).max(0.0);
    remaining / fill_rate_lph * 60.0
}
