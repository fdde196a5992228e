const HZ_PER_GHZ: f64 = 1e9;

/// Converts a raw spectral-axis world value in Hz to GHz.
pub fn hz_to_ghz(hz: f64) -> f64 {
    hz / HZ_PER_GHZ
}

/// Renders a frequency for product names: rounded to three decimals with
/// trailing zeros trimmed, so 230.1 GHz reads `"230.1"` and not `"230.100"`.
pub fn format_ghz(ghz: f64) -> String {
    let rounded = (ghz * 1000.0).round() / 1000.0;
    if rounded.fract() == 0.0 {
        // Whole numbers keep one decimal, as the original naming scheme did.
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}
