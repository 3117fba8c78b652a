// Numeric coercion and display formatting.
//
// Cells arrive as untyped text; everything that turns them into numbers, and
// numbers back into report strings, lives here.
use num_format::{Locale, ToFormattedString};
use tracing::debug;

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces).
///
/// - Trims whitespace.
/// - Strips thousands separators like `","` before parsing.
/// - Accepts scientific notation (`1.5E+05`).
/// - Returns `None` for anything that cannot be parsed or is not finite
///   (`NaN`, `inf`).
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Total coercion: missing, blank and non-numeric cells all become 0.
pub fn coerce_number(s: Option<&str>) -> f64 {
    match parse_f64_safe(s) {
        Some(v) => v,
        None => {
            if let Some(raw) = s.filter(|raw| !raw.trim().is_empty()) {
                debug!(cell = raw, "non-numeric cell coerced to 0");
            }
            0.0
        }
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let v = numerator / denominator;
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `en` thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let mut res = group_thousands(int_part);
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

// Insert `,` every three digits from the right. Works on the digit string so
// totals beyond any integer type keep their value.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_currency(n: f64) -> String {
    format!("${}", format_number(n, 2))
}

pub fn format_percent(n: f64) -> String {
    format!("{:.2}%", n)
}

/// Counts are summed as floats; render them rounded with no decimals.
pub fn format_count(n: f64) -> String {
    format_number(n, 0)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
