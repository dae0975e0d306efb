use chrono::{NaiveDate, NaiveDateTime};

/// Formats seen in spreadsheet exports, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Parse a spreadsheet timestamp. Date-only values map to midnight.
/// Returns None for empty or unparseable strings.
pub fn parse_flexible_datetime(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse a reopen counter ("" → 0, "2" → 2, "2.0" → 2).
/// Negative or non-numeric values yield None.
pub fn parse_count(s: &str) -> Option<u32> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    if let Ok(n) = trimmed.parse::<u32>() {
        return Some(n);
    }
    // Spreadsheet exports write integer columns with a trailing ".0".
    let f = trimmed.replace(',', ".").parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

/// Trimmed value, or None when blank.
pub fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(dt: NaiveDateTime) -> String {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    #[test]
    fn test_parse_iso_datetime() {
        let dt = parse_flexible_datetime("2024-01-05 16:24:00").unwrap();
        assert_eq!(fmt(dt), "2024-01-05T16:24:00");
        let dt = parse_flexible_datetime("2024-01-05T16:24:00").unwrap();
        assert_eq!(fmt(dt), "2024-01-05T16:24:00");
    }

    #[test]
    fn test_parse_brazilian_datetime() {
        let dt = parse_flexible_datetime("05/01/2024 16:24").unwrap();
        assert_eq!(fmt(dt), "2024-01-05T16:24:00");
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let dt = parse_flexible_datetime("2024-02-02").unwrap();
        assert_eq!(fmt(dt), "2024-02-02T00:00:00");
        let dt = parse_flexible_datetime(" 02/02/2024 ").unwrap();
        assert_eq!(fmt(dt), "2024-02-02T00:00:00");
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let dt = parse_flexible_datetime("2024-03-01 08:00:00.250").unwrap();
        assert_eq!(fmt(dt), "2024-03-01T08:00:00");
    }

    #[test]
    fn test_parse_invalid_datetime() {
        assert!(parse_flexible_datetime("").is_none());
        assert!(parse_flexible_datetime("   ").is_none());
        assert!(parse_flexible_datetime("not-a-date").is_none());
        assert!(parse_flexible_datetime("2024-13-01").is_none());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(""), Some(0));
        assert_eq!(parse_count("  "), Some(0));
        assert_eq!(parse_count("3"), Some(3));
        assert_eq!(parse_count("2.0"), Some(2));
        assert_eq!(parse_count("1,0"), Some(1));
        assert_eq!(parse_count("1.5"), None);
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("abc"), None);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Web ")), Some("Web".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
