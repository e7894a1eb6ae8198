/// Exponential smoothing. The closer `alpha` is to 1.0 the more weight the
/// previous value keeps; the first sample seeds the average.
pub fn smooth(previous: Option<f64>, sample: f64, alpha: f64) -> f64 {
    match previous {
        Some(prev) => (1.0 - alpha) * sample + alpha * prev,
        None => sample,
    }
}

pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    match whole {
        positive if positive > 0 => Some(100.0 * part as f64 / whole as f64),
        _ => None,
    }
}
