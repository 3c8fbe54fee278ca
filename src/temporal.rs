//! Instant parsing for property values, literals and the `date()` function.
//!
//! Text without an offset is read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses ISO-8601 offset date-time text such as `2013-08-08T16:32:59.000+02:00`.
pub fn parse_offset_date_time(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // %:z does not take a zulu suffix
    let text = match text.strip_suffix(['Z', 'z']) {
        Some(local) => format!("{}+00:00", local),
        None => text.to_string(),
    };
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&text, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Loose ISO-8601 parse used for opportunistic coercion.
///
/// Accepts offset date-times, local date-times with or without seconds
/// (`T` or space separated) and plain dates.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    // cheap rejection: every accepted form starts with a four digit year
    if text.len() < 10 || !text.as_bytes()[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }
    if let Some(dt) = parse_offset_date_time(text) {
        return Some(dt);
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parses `text` with a custom format.
///
/// A format containing `%` is taken as a chrono strftime pattern, anything
/// else as a `yyyy-MM-dd HH:mm` style pattern (see [`translate_pattern`]).
/// Formats without a zone read the text as UTC; formats without a time read
/// it as midnight.
pub fn parse_with_format(text: &str, format: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    let format = if format.contains('%') {
        format.to_string()
    } else {
        translate_pattern(format)
    };

    if let Ok(dt) = DateTime::parse_from_str(text, &format) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, &format) {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, &format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Translates a letter pattern (`EEE MMM dd yyyy HH:mm:ss 'GMT'Z`) to strftime.
///
/// Quoted sections are literal and `''` is a single quote. Day names are
/// skipped rather than checked, so a wrong weekday does not reject the date.
pub fn translate_pattern(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    break;
                }
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1; // closing quote
            continue;
        }

        if !ch.is_ascii_alphabetic() {
            push_literal(&mut out, ch);
            i += 1;
            continue;
        }

        let mut run = 1;
        while chars.get(i + run) == Some(&ch) {
            run += 1;
        }
        i += run;

        let spec = match (ch, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1 | 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', _) => "%d",
            ('H', _) => "%H",
            ('h', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('S', 3) => "%3f",
            ('S', _) => "%f",
            ('a', _) => "%p",
            ('E', _) => "%Z",
            ('Z', _) => "%z",
            ('X', _) => "%:z",
            ('z', _) => "%Z",
            _ => {
                for _ in 0..run {
                    out.push(ch);
                }
                continue;
            }
        };
        out.push_str(spec);
    }

    out
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}

/// Canonical text form of an instant: RFC 3339 in UTC.
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
