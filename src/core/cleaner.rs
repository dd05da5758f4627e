use crate::domain::model::{CleanedRow, RawRow};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})([-/])(\d{2})([-/])(\d{4})$").unwrap());

static AMOUNT_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(0|[1-9][0-9]*)(\.[0-9]+)?$").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalises one raw row into comparable values. Never fails: anything that
/// does not parse comes back as `None` and is reported by the validator.
pub fn clean(raw: &RawRow) -> CleanedRow {
    let date_string = strip_whitespace(raw.date.as_deref().unwrap_or_default());
    let amount_string = strip_whitespace(raw.amount.as_deref().unwrap_or_default());

    CleanedRow {
        date: parse_date(&date_string),
        amount: parse_amount(&amount_string),
        date_string,
        amount_string,
        description: clean_description(raw.description.as_deref().unwrap_or_default()),
        currency: raw
            .currency
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_uppercase(),
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn clean_description(text: &str) -> String {
    WHITESPACE_RUN
        .replace_all(text.trim(), " ")
        .to_lowercase()
}

/// Accepts `DD-MM-YYYY` or `DD/MM/YYYY` with the same separator twice.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let caps = DATE_SHAPE.captures(text)?;
    if caps[2] != caps[4] {
        return None;
    }

    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[3].parse().ok()?;
    let year: i32 = caps[5].parse().ok()?;

    if day < 1 || day > days_in_month(year, month)? {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    match month {
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        4 | 6 | 9 | 11 => Some(30),
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        _ => None,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn parse_amount(text: &str) -> Option<Decimal> {
    if !AMOUNT_SHAPE.is_match(text) {
        return None;
    }
    Decimal::from_str(text).ok()
}
