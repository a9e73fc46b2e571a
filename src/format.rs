//! Display formatting for amounts, dates and identifiers.
//!
//! Amounts follow Swedish (sv-SE) conventions: decimal comma, non-breaking
//! space as thousands separator, currency symbol after the number.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::models::Currency;

const NBSP: char = '\u{a0}';
const MINUS: char = '\u{2212}';

const SV_MONTHS: [&str; 12] = [
    "jan.", "feb.", "mars", "apr.", "maj", "juni", "juli", "aug.", "sep.", "okt.", "nov.", "dec.",
];

fn currency_symbol(currency: Currency) -> &'static str {
    match currency {
        Currency::Sek => "kr",
        Currency::Usd => "US$",
        Currency::Eur => "€",
        Currency::Gbp => "GBP",
    }
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(&NBSP.to_string())
}

/// Format an amount in minor units (öre/cents), e.g. `123456` SEK -> `1 234,56 kr`.
pub fn format_currency(minor: i64, currency: Currency) -> String {
    let abs = minor.unsigned_abs();
    let sign = if minor < 0 { MINUS.to_string() } else { String::new() };
    format!(
        "{}{},{:02}{}{}",
        sign,
        group_thousands(abs / 100),
        abs % 100,
        NBSP,
        currency_symbol(currency)
    )
}

/// Format a timestamp like `5 okt. 2025 14:30` (UTC).
pub fn format_date(ts: &DateTime<Utc>) -> String {
    format!(
        "{} {} {} {:02}:{:02}",
        ts.day(),
        SV_MONTHS[ts.month0() as usize],
        ts.year(),
        ts.hour(),
        ts.minute()
    )
}

pub fn format_optional_date(ts: Option<&DateTime<Utc>>) -> String {
    ts.map(format_date).unwrap_or_else(|| "-".to_string())
}

/// `Every month`, `Every 3 months`.
pub fn format_interval(interval: &str, count: u32) -> String {
    if count > 1 {
        format!("Every {} {}s", count, interval)
    } else {
        format!("Every {}", interval)
    }
}

/// Live hint shown under amount inputs: `= 100.00 SEK`. Empty for non-positive amounts.
pub fn amount_preview(minor: i64, currency: Currency) -> String {
    if minor <= 0 {
        return String::new();
    }
    format!("= {}.{:02} {}", minor / 100, minor % 100, currency)
}

/// First 8 characters of an id followed by `...`.
pub fn short_id(id: &str) -> String {
    let prefix: String = id.chars().take(8).collect();
    format!("{}...", prefix)
}

pub fn humanize(status: &str) -> String {
    status.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_currency_sek() {
        assert_eq!(format_currency(123456, Currency::Sek), "1\u{a0}234,56\u{a0}kr");
        assert_eq!(format_currency(5, Currency::Sek), "0,05\u{a0}kr");
        assert_eq!(format_currency(0, Currency::Sek), "0,00\u{a0}kr");
    }

    #[test]
    fn test_format_currency_large_and_negative() {
        assert_eq!(
            format_currency(123456789, Currency::Eur),
            "1\u{a0}234\u{a0}567,89\u{a0}€"
        );
        assert_eq!(format_currency(-1050, Currency::Usd), "\u{2212}10,50\u{a0}US$");
        assert_eq!(format_currency(100000, Currency::Gbp), "1\u{a0}000,00\u{a0}GBP");
    }

    #[test]
    fn test_format_date_swedish_short_month() {
        let ts = Utc.with_ymd_and_hms(2025, 10, 5, 14, 3, 0).unwrap();
        assert_eq!(format_date(&ts), "5 okt. 2025 14:03");
        let ts = Utc.with_ymd_and_hms(2024, 3, 21, 9, 0, 0).unwrap();
        assert_eq!(format_date(&ts), "21 mars 2024 09:00");
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval("month", 1), "Every month");
        assert_eq!(format_interval("week", 2), "Every 2 weeks");
        assert_eq!(format_interval("year", 0), "Every year");
    }

    #[test]
    fn test_amount_preview() {
        assert_eq!(amount_preview(10000, Currency::Sek), "= 100.00 SEK");
        assert_eq!(amount_preview(1999, Currency::Usd), "= 19.99 USD");
        assert_eq!(amount_preview(0, Currency::Sek), "");
    }

    #[test]
    fn test_short_id_and_humanize() {
        assert_eq!(short_id("0f8fad5b-d9cb-469f"), "0f8fad5b...");
        assert_eq!(short_id("abc"), "abc...");
        assert_eq!(humanize("requires_action"), "requires action");
    }
}
