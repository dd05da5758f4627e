use crate::core::cleaner::clean;
use crate::core::validator::RowValidator;
use crate::domain::model::{LineError, ParsingError, RawRow, Transaction};
use rust_decimal::Decimal;

pub struct RowBuilder {
    validator: RowValidator,
}

impl RowBuilder {
    pub fn new(validator: RowValidator) -> Self {
        Self { validator }
    }

    /// Always returns a usable transaction, even for a rejected line: a missing
    /// date falls back to the reference day and a missing amount to zero.
    pub fn build(&self, raw: &RawRow, line: usize) -> (Transaction, Option<ParsingError>) {
        let cleaned = clean(raw);
        let errors = self.validator.validate(&cleaned, raw, line);

        let transaction = Transaction {
            date: cleaned.date.unwrap_or_else(|| self.validator.today()),
            date_string: cleaned.date_string,
            amount: cleaned.amount.unwrap_or(Decimal::ZERO),
            description: cleaned.description,
            currency: cleaned.currency,
            is_deleted: false,
        };

        (transaction, merge_errors(line, errors))
    }
}

fn merge_errors(line: usize, mut errors: Vec<ParsingError>) -> Option<ParsingError> {
    match errors.len() {
        0 => None,
        1 => errors.pop(),
        _ => Some(ParsingError {
            line,
            error: LineError::MultipleErrors {
                messages: errors.iter().map(ParsingError::message).collect(),
            },
        }),
    }
}
