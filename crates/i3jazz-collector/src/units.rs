/// Scales a byte count to the largest binary unit that keeps it under 1024.
///
/// Counts below one kilobyte are still reported in KB, so the bar never
/// switches to a bare byte figure.
///
/// # Examples
///
/// ```
/// use i3jazz_collector::units::nearest_unit;
///
/// assert_eq!(nearest_unit(2048.0), (2.0, "KB"));
/// assert_eq!(nearest_unit(3.0 * 1024.0 * 1024.0), (3.0, "MB"));
/// ```
pub fn nearest_unit(bytes: f64) -> (f64, &'static str) {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    let mut value = bytes;
    for &unit in &UNITS[..UNITS.len() - 1] {
        value /= 1024.0;
        if value < 1024.0 {
            return (value, unit);
        }
    }
    (value / 1024.0, UNITS[UNITS.len() - 1])
}

/// Formats a byte count as `"<value><unit>"` with two decimals.
pub fn format_bytes(bytes: f64) -> String {
    let (value, unit) = nearest_unit(bytes);
    format!("{value:.2}{unit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_kilobytes() {
        assert_eq!(nearest_unit(0.0), (0.0, "KB"));
        assert_eq!(format_bytes(0.0), "0.00KB");
    }

    #[test]
    fn sub_kilobyte_stays_in_kilobytes() {
        let (value, unit) = nearest_unit(512.0);
        assert_eq!(unit, "KB");
        assert!((value - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn gigabytes() {
        assert_eq!(format_bytes(1.5 * 1024.0 * 1024.0 * 1024.0), "1.50GB");
    }

    #[test]
    fn terabytes_absorb_everything_larger() {
        let tb = 1024.0_f64.powi(4);
        assert_eq!(nearest_unit(tb * 2048.0), (2048.0, "TB"));
    }
}
