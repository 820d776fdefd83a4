// src/metrics/format.rs — Display formatting for money and indices

const UNITS: [&str; 3] = ["K", "M", "B"];

/// Compact currency: `$999`, `$1.5K`, `$1.5M`, `$2.1B`.
///
/// The unit is chosen after rounding, so `999_999` reads `$1.0M` rather
/// than `$1000.0K`.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    if abs.round() < 1_000.0 {
        return format!("{sign}${abs:.0}");
    }
    let mut scaled = abs / 1_000.0;
    let mut unit = 0;
    while unit + 1 < UNITS.len() && (scaled * 10.0).round() >= 10_000.0 {
        scaled /= 1_000.0;
        unit += 1;
    }
    format!("{sign}${scaled:.1}{}", UNITS[unit])
}

/// `62.5` → `62.5%`. Input is already a percentage.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Performance index with two decimals.
pub fn format_index(value: f64) -> String {
    format!("{value:.2}")
}
