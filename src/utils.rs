use chrono::{Days, NaiveDate};

/// Parses a sale date written either year-first (`2024-03-07`) or day-first
/// (`07-03-2024`). Slashes are accepted in place of hyphens.
///
/// A 4-character first component means year-first; anything else is read as
/// day-month-year. Returns `None` unless there are exactly three numeric
/// components forming a real calendar date.
pub fn parse_sale_date(raw: &str) -> Option<NaiveDate> {
    let normalized = raw.trim().replace('/', "-");
    let parts: Vec<&str> = normalized.split('-').collect();

    if parts.len() != 3 {
        return None;
    }

    let (year_str, month_str, day_str) = if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else {
        (parts[2], parts[1], parts[0])
    };

    let mut year: i32 = year_str.trim().parse().ok()?;
    let month: u32 = month_str.trim().parse().ok()?;
    let day: u32 = day_str.trim().parse().ok()?;

    // Years 0..=99 belong to the 1900s: 07/03/24 is 1924-03-07.
    if (0..=99).contains(&year) {
        year += 1900;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses an amount by keeping only ASCII digits and `.` and reading the
/// longest leading decimal number. Anything unreadable is `0.0`.
///
/// Thousands separators are not interpreted: `"$1.234,56 ARS"` becomes
/// `"1.23456"`, and `"1.234.567"` stops at the second dot (`1.234`).
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let end = cleaned
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .nth(1)
        .map(|(idx, _)| idx)
        .unwrap_or(cleaned.len());

    match cleaned[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// The `count` consecutive days ending on `end`, oldest first.
pub fn trailing_days(end: NaiveDate, count: u64) -> Vec<NaiveDate> {
    (0..count)
        .rev()
        .filter_map(|offset| end.checked_sub_days(Days::new(offset)))
        .collect()
}

/// Short display label for a day, e.g. `07-03`. Never used as a grouping key.
pub fn day_label(date: NaiveDate) -> String {
    date.format("%d-%m").to_string()
}
