//! Display formatting for dates, quantities and money.

use chrono::{DateTime, NaiveDate};

use crate::error::{CoreError, CoreResult};

/// Parse a backend timestamp (RFC 3339 or a bare `YYYY-MM-DD`) into a date.
pub fn parse_date(raw: &str) -> CoreResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| CoreError::BadDate(raw.to_string()))
}

/// `"Mar 15, 2024"`. Unparseable input is returned unchanged.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// `"Mar 15"`, used for chart axis labels.
pub fn format_month_day(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Integer with comma thousands separators.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Grouped integer part with up to three fraction digits, trailing zeros dropped.
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    let whole = rounded.trunc() as i64;
    let fraction = format!("{:.3}", rounded.abs().fract());
    let fraction = fraction
        .trim_start_matches('0')
        .trim_start_matches('.')
        .trim_end_matches('0');

    let mut out = if whole == 0 && rounded < 0.0 {
        "-0".to_string()
    } else {
        group_thousands(whole)
    };
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// `"12,345.5 kWh"`
pub fn format_energy(kwh: f64) -> String {
    format!("{} kWh", format_quantity(kwh))
}

/// `"$1890.25"`
pub fn format_cost(cost: f64) -> String {
    format!("${:.2}", cost)
}

/// First `max_chars` characters followed by an ellipsis.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head)
}
