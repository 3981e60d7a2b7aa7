// Utility helpers for parsing, basic statistics and number formatting.
//
// This module centralizes all the "dirty" CSV/number handling so the stages
// can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces).
///
/// - Trims whitespace.
/// - Rejects alphabetic text, except the exponent marker of `1.5e9`.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok()
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Trimmed text, or `None` for a blank cell.
pub fn parse_text_safe(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Markers that dataframe exports write for a missing value.
const MISSING_MARKERS: [&str; 5] = ["nan", "na", "n/a", "null", "none"];

/// Blank, or one of the usual missing-value markers (any case).
pub fn is_missing(s: Option<&str>) -> bool {
    match s.map(str::trim) {
        None | Some("") => true,
        Some(v) => MISSING_MARKERS.iter().any(|m| v.eq_ignore_ascii_case(m)),
    }
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Pearson correlation coefficient of paired samples.
///
/// Returns `None` with fewer than two pairs or when either side has zero
/// variance, so callers never see a NaN.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if r.is_finite() {
        Some(r.clamp(-1.0, 1.0))
    } else {
        None
    }
}

/// Quantile with linear interpolation between closest ranks. `q` is in
/// `[0, 1]`; an empty slice yields `None`.
pub fn quantile(v: &[f64], q: f64) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let mut sorted = v.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Numerator over denominator, forced to 0 when the denominator is not
/// strictly positive.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Past u128 range the digits are kept ungrouped rather than lost.
    let mut res = match int_part.parse::<u128>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Dollar amount with two decimals, e.g. `$3,000,000.00`.
pub fn format_money(n: f64) -> String {
    if n.is_sign_negative() && n != 0.0 {
        format!("-${}", format_number(n.abs(), 2))
    } else {
        format!("${}", format_number(n, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64_safe() {
        assert_eq!(parse_f64_safe(Some(" 1,250,000.5 ")), Some(1_250_000.5));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(None), None);
        assert_eq!(parse_f64_safe(Some("-3")), Some(-3.0));
        assert_eq!(parse_f64_safe(Some("1.5e9")), Some(1.5e9));
        assert_eq!(parse_f64_safe(Some("2E3")), Some(2000.0));
        assert_eq!(parse_f64_safe(Some("e")), None);
        assert_eq!(parse_f64_safe(Some("inf")), None);
    }

    #[test]
    fn test_is_missing_markers() {
        for v in ["", "  ", "NaN", "nan", "NA", "N/A", "null", "None"] {
            assert!(is_missing(Some(v)), "{v:?} should be missing");
        }
        assert!(is_missing(None));
        assert!(!is_missing(Some("0")));
        assert!(!is_missing(Some("nano")));
    }

    #[test]
    fn test_pearson_perfect_and_inverse() {
        let up = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];
        assert!((pearson(&up).unwrap() - 1.0).abs() < 1e-12);

        let down = [(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)];
        assert!((pearson(&down).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate() {
        assert_eq!(pearson(&[(1.0, 5.0)]), None);
        assert_eq!(pearson(&[(1.0, 5.0), (2.0, 5.0), (3.0, 5.0)]), None);
    }

    #[test]
    fn test_quantile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&v, 0.5), Some(3.0));
        assert!((quantile(&v, 0.95).unwrap() - 4.8).abs() < 1e-12);
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_format_number_and_money() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(0.0, 2), "0.00");
        assert_eq!(format_money(3_000_000.0), "$3,000,000.00");
        assert_eq!(format_money(-450.0), "-$450.00");
        assert_eq!(format_int(9855), "9,855");
    }

    #[test]
    fn test_format_money_beyond_i64() {
        assert_eq!(format_money(1e19), "$10,000,000,000,000,000,000.00");
        assert_eq!(format_number(-2e19, 0), "-20,000,000,000,000,000,000");
        assert!(format_money(1e300).starts_with("$1000000"));
    }

    #[test]
    fn test_ratio_or_zero() {
        assert_eq!(ratio_or_zero(10.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(10.0, 4.0), 2.5);
    }
}
