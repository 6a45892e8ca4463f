const MB: f64 = 1024.0 * 1024.0;

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / MB
}

/// Round half up to two decimals. Negative halves round toward positive
/// infinity, so `-0.125` becomes `-0.12`.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0 + 0.5).floor() / 100.0;
    // Avoid printing "-0.00".
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Render a value with exactly two decimals for the CSV log.
pub fn fixed2(value: f64) -> String {
    format!("{:.2}", value)
}
