//! Compact number formatting for metric cards.

const SCALES: [(f64, &str); 3] = [
    (1_000_000_000_000.0, "T"),
    (1_000_000_000.0, "B"),
    (1_000_000.0, "M"),
];

/// Format a value the way the metric cards show it: `28995881` → `"29.0 M"`,
/// `2000000` → `"2 M"`, `4500` → `"5 K"`, `950` → `"950"`.
///
/// Negative values are formatted by magnitude with a leading `-`.
pub fn format_number(value: f64) -> String {
    if value < 0.0 {
        return format!("-{}", format_number(-value));
    }

    for (scale, suffix) in SCALES {
        if value >= scale {
            return if value % scale == 0.0 {
                format!("{} {suffix}", (value / scale) as i64)
            } else {
                format!("{:.1} {suffix}", value / scale)
            };
        }
    }

    if value >= 1_000.0 {
        format!("{:.0} K", value / 1_000.0)
    } else {
        // `+ 0.0` turns -0.0 into 0
        format!("{}", value + 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millions() {
        assert_eq!(format_number(28_995_881.0), "29.0 M");
        assert_eq!(format_number(2_000_000.0), "2 M");
        assert_eq!(format_number(44_404_611.0), "44.4 M");
    }

    #[test]
    fn test_billions_and_trillions() {
        assert_eq!(format_number(37_600_000_000.0), "37.6 B");
        assert_eq!(format_number(3_000_000_000.0), "3 B");
        assert_eq!(format_number(1_200_000_000_000.0), "1.2 T");
    }

    #[test]
    fn test_thousands_have_no_decimal() {
        assert_eq!(format_number(1_000.0), "1 K");
        assert_eq!(format_number(174_598.0), "175 K");
    }

    #[test]
    fn test_small_values() {
        assert_eq!(format_number(950.0), "950");
        assert_eq!(format_number(73.2), "73.2");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(format_number(-2_500_000.0), "-2.5 M");
        assert_eq!(format_number(-174_598.0), "-175 K");
        assert_eq!(format_number(-3.5), "-3.5");
    }
}
