use crate::config::ParserConfig;
use crate::domain::model::{CleanedRow, ParsingError, RawRow};
use chrono::NaiveDate;

/// Field-level checks for a single row. All checks run, so a line with a bad
/// date and a bad amount reports both.
#[derive(Debug, Clone)]
pub struct RowValidator {
    min_date: NaiveDate,
    today: NaiveDate,
    max_integer_digits: usize,
    max_fraction_digits: usize,
    max_description_length: usize,
}

impl RowValidator {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            min_date: config.min_date,
            today: config.reference_date(),
            max_integer_digits: config.max_integer_digits,
            max_fraction_digits: config.max_fraction_digits,
            max_description_length: config.max_description_length,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn validate(&self, cleaned: &CleanedRow, raw: &RawRow, line: usize) -> Vec<ParsingError> {
        let raw_date = raw.date.as_deref().unwrap_or_default();
        let raw_amount = raw.amount.as_deref().unwrap_or_default();
        let mut messages = Vec::new();

        match cleaned.date {
            None => messages.push(format!("Invalid date format(DD-MM-YYYY): {}", raw_date)),
            Some(date) if date > self.today => {
                messages.push(format!("Date cannot be in the future: {}", raw_date))
            }
            Some(date) if date < self.min_date => messages.push(format!(
                "Date cannot be before {}: {}",
                self.min_date.format("%d-%m-%Y"),
                raw_date
            )),
            Some(_) => {}
        }

        if cleaned.amount.is_none() {
            messages.push(format!("Invalid amount format: {}", raw_amount));
        }

        let (integer_digits, fraction_digits) = digit_counts(raw_amount);
        if integer_digits > self.max_integer_digits {
            messages.push(format!(
                "Amount cannot be more than {} digits before the decimal point: {}",
                self.max_integer_digits, raw_amount
            ));
        }
        if fraction_digits > self.max_fraction_digits {
            messages.push(format!(
                "Amount cannot be more than {} digits after the decimal point: {}",
                self.max_fraction_digits, raw_amount
            ));
        }

        if cleaned.description.is_empty() {
            messages.push("Description cannot be empty".to_string());
        } else if cleaned.description.chars().count() > self.max_description_length {
            messages.push(format!(
                "Description cannot be longer than {} characters",
                self.max_description_length
            ));
        }

        messages
            .into_iter()
            .map(|message| ParsingError::invalid_line(line, message))
            .collect()
    }
}

/// Digits on each side of the first decimal point of the raw amount text.
fn digit_counts(raw_amount: &str) -> (usize, usize) {
    let count = |part: &str| part.chars().filter(char::is_ascii_digit).count();
    match raw_amount.split_once('.') {
        Some((integer, fraction)) => (count(integer), count(fraction)),
        None => (count(raw_amount), 0),
    }
}
