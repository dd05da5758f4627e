use crate::domain::model::{RawRow, AMOUNT, CURRENCY, DATE, DESCRIPTION, EXPECTED_HEADERS};
use crate::utils::error::{ImportError, Result};
use csv::StringRecord;

/// Positions of the expected columns in the header record. Extra columns are
/// ignored; for a repeated header name the first occurrence wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    date: usize,
    amount: usize,
    description: usize,
    currency: usize,
}

impl ColumnMap {
    pub fn from_header(header: &StringRecord) -> Result<Self> {
        let names: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let name = if index == 0 {
                    name.trim_start_matches('\u{feff}')
                } else {
                    name
                };
                name.trim().to_lowercase()
            })
            .collect();

        let position = |expected: &str| names.iter().position(|name| name == expected);

        let missing: Vec<&str> = EXPECTED_HEADERS
            .iter()
            .copied()
            .filter(|expected| position(*expected).is_none())
            .collect();

        match (
            position(DATE),
            position(AMOUNT),
            position(DESCRIPTION),
            position(CURRENCY),
        ) {
            (Some(date), Some(amount), Some(description), Some(currency)) => Ok(Self {
                date,
                amount,
                description,
                currency,
            }),
            _ => Err(ImportError::InvalidFormat {
                message: format!("Missing required headers: {}", missing.join(", ")),
            }),
        }
    }

    pub fn extract(&self, record: &StringRecord) -> RawRow {
        let field = |index: usize| record.get(index).map(str::to_string);
        RawRow {
            date: field(self.date),
            amount: field(self.amount),
            description: field(self.description),
            currency: field(self.currency),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> StringRecord {
        StringRecord::from(names.to_vec())
    }

    #[test]
    fn test_header_names_are_normalised() {
        let columns =
            ColumnMap::from_header(&header(&["\u{feff} Date", "AMOUNT ", "note", " Description", "currency"]))
                .unwrap();
        let row = columns.extract(&StringRecord::from(vec!["08-01-2025", "1", "ignored", "rent", "cad"]));
        assert_eq!(row, RawRow::new("08-01-2025", "1", "rent", "cad"));
    }

    #[test]
    fn test_missing_headers_are_named() {
        let err = ColumnMap::from_header(&header(&["date", "amount", "description"])).unwrap_err();
        match err {
            ImportError::InvalidFormat { message } => {
                assert_eq!(message, "Missing required headers: currency")
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = ColumnMap::from_header(&header(&[""])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid format: Missing required headers: date, amount, description, currency"
        );
    }

    #[test]
    fn test_short_record_leaves_fields_absent() {
        let columns =
            ColumnMap::from_header(&header(&["date", "amount", "description", "currency"])).unwrap();
        let row = columns.extract(&StringRecord::from(vec!["08-01-2025", "1"]));
        assert_eq!(row.missing_fields(), vec![DESCRIPTION, CURRENCY]);
    }
}
