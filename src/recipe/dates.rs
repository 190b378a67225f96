// src/recipe/dates.rs
use chrono::{
    format::{parse, Parsed, StrftimeItems},
    NaiveDate,
};

/// Specifiers that pin down the day of month on their own.
const DAY_SPECIFIERS: &[&str] = &["%d", "%e", "%-d", "%j", "%F", "%D", "%x", "%c", "%+"];

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Parse `s` under a strftime `format`. A format with no day component (e.g.
/// `"%B, %Y"`) resolves to the first of the month.
pub fn parse_date(s: &str, format: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, format) {
        return Some(d);
    }
    if DAY_SPECIFIERS.iter().any(|d| format.contains(d)) {
        return None;
    }

    let mut parsed = Parsed::new();
    parse(&mut parsed, s, StrftimeItems::new(format)).ok()?;
    parsed.set_day(1).ok()?;
    parsed.to_naive_date().ok()
}

/// Days since the Unix epoch, the Arrow `Date32` representation.
pub fn to_date32(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_dates() {
        assert_eq!(
            parse_date("1962-10-05", "%Y-%m-%d"),
            NaiveDate::from_ymd_opt(1962, 10, 5)
        );
        assert_eq!(parse_date("1962-13-05", "%Y-%m-%d"), None);
    }

    #[test]
    fn month_year_resolves_to_first_of_month() {
        assert_eq!(
            parse_date("June, 1962", "%B, %Y"),
            NaiveDate::from_ymd_opt(1962, 6, 1)
        );
        assert_eq!(parse_date("Juney, 1962", "%B, %Y"), None);
    }

    #[test]
    fn date32_offsets() {
        assert_eq!(to_date32(epoch()), 0);
        assert_eq!(to_date32(NaiveDate::from_ymd_opt(1970, 1, 11).unwrap()), 10);
        assert_eq!(to_date32(NaiveDate::from_ymd_opt(1969, 12, 31).unwrap()), -1);
    }
}
