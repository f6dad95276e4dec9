//! Value coercion
//!
//! Cell values in a sheet export are loosely typed. Everything here is total:
//! malformed numbers become 0 and unrecognised dates become an empty string,
//! so a bad cell never aborts scoring.

/// Trim whitespace and byte-order marks from both ends.
///
/// Spreadsheet "CSV UTF-8" exports start with U+FEFF, which `str::trim` keeps.
pub fn trim_cell(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Trim, then drop one pair of wrapping double quotes if present
pub fn strip_outer_quotes(value: &str) -> &str {
    let text = trim_cell(value);
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Coerce a cell to a number, falling back to 0 for empty, non-numeric or
/// non-finite values
pub fn as_num(value: &str) -> f64 {
    let text = trim_cell(strip_outer_quotes(value));
    if text.is_empty() {
        return 0.0;
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Coerce an optional cell into an optional number.
///
/// Absent or blank cells stay `None`; anything else goes through [`as_num`].
pub fn coerce_field(value: Option<&str>) -> Option<f64> {
    let value = value?;
    if trim_cell(strip_outer_quotes(value)).is_empty() {
        None
    } else {
        Some(as_num(value))
    }
}

/// Convert a date cell into canonical `YYYY-MM-DD` form.
///
/// Accepts values that already start with `YYYY-MM-DD` and `M/D/YYYY` values
/// with an optional trailing time component. Returns an empty string when the
/// value is empty or matches neither form.
pub fn to_iso_date(value: &str) -> String {
    let raw = trim_cell(strip_outer_quotes(value));
    if raw.is_empty() {
        return String::new();
    }

    if has_iso_prefix(raw) {
        return raw[..10].to_string();
    }

    let date_part = raw.split(' ').next().unwrap_or_default();
    match parse_month_day_year(date_part) {
        Some((month, day, year)) => format!("{year}-{month:0>2}-{day:0>2}"),
        None => String::new(),
    }
}

fn has_iso_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() < 10 {
        return false;
    }
    bytes[..10].iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    })
}

/// Split `M/D/YYYY` into its digit groups without validating the calendar
fn parse_month_day_year(text: &str) -> Option<(&str, &str, &str)> {
    let mut parts = text.split('/');
    let month = parts.next()?;
    let day = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let digits = |s: &str, min: usize, max: usize| {
        (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };

    if digits(month, 1, 2) && digits(day, 1, 2) && digits(year, 4, 4) {
        Some((month, day, year))
    } else {
        None
    }
}
