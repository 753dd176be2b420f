/// Formats an extent for the statistics header.
///
/// Precision follows magnitude: two decimals at or above 1, one at or above
/// 10, none at or above 100, and more for small values. Ties round away from
/// zero. Values below 0.0001 are printed unrounded.
pub fn round_for_display(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    let magnitude = value.abs();
    if magnitude < 0.0001 {
        return value.to_string();
    }
    let decimals: usize = match magnitude {
        m if m >= 100.0 => 0,
        m if m >= 10.0 => 1,
        m if m >= 1.0 => 2,
        m if m >= 0.1 => 3,
        m if m >= 0.01 => 4,
        m if m >= 0.001 => 5,
        _ => 6,
    };
    let scale = 10_f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    format!("{rounded:.decimals$}")
}
