/// Compact number formatting used on axis labels
/// Examples: 999 -> "999", 1500 -> "1.5K", 2_000_000 -> "2M", 3.25e9 -> "3.25B"
pub fn to_k(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }

    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };

    format!("{}{}", trim_decimals(scaled, 2), suffix)
}

/// Percent label, e.g. 4.5 -> "4.5%"
pub fn to_percent(value: f64) -> String {
    format!("{}%", trim_decimals(value, 2))
}

/// Dollar amount with thousands separators, e.g. 1234567.891 -> "$1,234,567.89"
pub fn format_usd(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac)
}

/// Deterministic color derived from a string
///
/// 32-bit rolling hash (`c + (h << 5) - h`) whose low three bytes become `#rrggbb`.
pub fn string_to_colour(input: &str) -> String {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = (unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }

    let bytes = [
        (hash & 0xff) as u8,
        ((hash >> 8) & 0xff) as u8,
        ((hash >> 16) & 0xff) as u8,
    ];

    format!("#{}", hex::encode(bytes))
}

fn trim_decimals(value: f64, places: usize) -> String {
    let mut s = format!("{:.*}", places, value);
    if s.contains('.') {
        s = s.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_k() {
        assert_eq!(to_k(999.0), "999");
        assert_eq!(to_k(1500.0), "1.5K");
        assert_eq!(to_k(2_000_000.0), "2M");
        assert_eq!(to_k(3_250_000_000.0), "3.25B");
        assert_eq!(to_k(-1500.0), "-1.5K");
        assert_eq!(to_k(1.2e12), "1.2T");
    }

    #[test]
    fn test_to_percent() {
        assert_eq!(to_percent(4.5), "4.5%");
        assert_eq!(to_percent(10.0), "10%");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(12.0), "$12.00");
        assert_eq!(format_usd(-1000.0), "-$1,000.00");
    }

    #[test]
    fn test_string_to_colour_is_stable() {
        let a = string_to_colour("Token Price");
        assert_eq!(a, string_to_colour("Token Price"));
        assert_eq!(a.len(), 7);
        assert!(a.starts_with('#'));
        assert_ne!(a, string_to_colour("TVL"));
        // empty input hashes to zero
        assert_eq!(string_to_colour(""), "#000000");
    }
}
