//! Pre-flight validation of proposed journal entries
//!
//! Pure functions of their input: no storage, no I/O. The same rules are
//! enforced server-side at posting time; both layers agree exactly on
//! the 0.01 tolerance and the line-purity rule.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::journal::draft::{CanonicalLine, DraftEntry, ValidatedEntry};
use crate::types::{balance_tolerance, JournalError, JournalResult};

/// Minimum description length, in characters after trimming
pub const MIN_DESCRIPTION_LEN: usize = 5;

/// Validate a proposed entry: date format, description length, line
/// purity, line count, and the balance invariant. On success returns the
/// normalized entry ready for posting.
pub fn validate_draft(draft: &DraftEntry) -> JournalResult<ValidatedEntry> {
    let date = parse_entry_date(&draft.date)?;
    let description = validate_description(&draft.description)?;

    if draft.lines.len() < 2 {
        return Err(JournalError::InsufficientLines(draft.lines.len()));
    }

    let lines: Vec<CanonicalLine> = draft
        .lines
        .iter()
        .map(|l| CanonicalLine {
            account_id: l.account_id,
            debit: l.debit.to_decimal(),
            credit: l.credit.to_decimal(),
            description: l.description.clone(),
            party_id: l.party_id,
        })
        .collect();

    let (total_debit, total_credit) = check_lines(&lines)?;

    Ok(ValidatedEntry {
        date,
        description,
        lines,
        total_debit,
        total_credit,
    })
}

/// Enforce line purity and the balance invariant over canonical lines,
/// returning the computed totals. Shared between pre-flight validation
/// and the poster's re-validation.
pub fn check_lines(lines: &[CanonicalLine]) -> JournalResult<(BigDecimal, BigDecimal)> {
    if lines.len() < 2 {
        return Err(JournalError::InsufficientLines(lines.len()));
    }

    let zero = BigDecimal::from(0);
    for (index, line) in lines.iter().enumerate() {
        let pure_debit = line.debit > zero && line.credit == zero;
        let pure_credit = line.credit > zero && line.debit == zero;
        if !pure_debit && !pure_credit {
            return Err(JournalError::MalformedLine { index });
        }
    }

    let total_debit: BigDecimal = lines.iter().map(|l| &l.debit).sum();
    let total_credit: BigDecimal = lines.iter().map(|l| &l.credit).sum();

    if (&total_debit - &total_credit).abs() > balance_tolerance() {
        return Err(JournalError::UnbalancedEntry {
            total_debit,
            total_credit,
        });
    }

    Ok((total_debit, total_credit))
}

/// Parse an entry date, accepting only the ISO `YYYY-MM-DD` shape
pub fn parse_entry_date(date: &str) -> JournalResult<NaiveDate> {
    if date.len() != 10 {
        return Err(JournalError::InvalidDate(date.to_string()));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| JournalError::InvalidDate(date.to_string()))
}

/// Trim and length-check a description
pub fn validate_description(description: &str) -> JournalResult<String> {
    let trimmed = description.trim();
    if trimmed.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(JournalError::DescriptionTooShort {
            min: MIN_DESCRIPTION_LEN,
            actual: trimmed.chars().count(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::draft::DraftLine;
    use std::str::FromStr;
    use uuid::Uuid;

    fn draft(lines: Vec<DraftLine>) -> DraftEntry {
        DraftEntry {
            date: "2024-03-15".to_string(),
            description: "Office rent for March".to_string(),
            lines,
        }
    }

    #[test]
    fn accepts_balanced_two_line_entry() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let entry = validate_draft(&draft(vec![
            DraftLine::debit(a, 500.0),
            DraftLine::credit(b, 500.0),
        ]))
        .unwrap();

        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(entry.total_debit, BigDecimal::from(500));
        assert_eq!(entry.total_credit, BigDecimal::from(500));
        assert_eq!(entry.lines.len(), 2);
    }

    #[test]
    fn rejects_single_line() {
        let err = validate_draft(&draft(vec![DraftLine::debit(Uuid::new_v4(), 100.0)]))
            .unwrap_err();
        assert_eq!(err, JournalError::InsufficientLines(1));
    }

    #[test]
    fn rejects_unbalanced_entry_with_both_totals() {
        let err = validate_draft(&draft(vec![
            DraftLine::debit(Uuid::new_v4(), 200.0),
            DraftLine::credit(Uuid::new_v4(), 150.0),
        ]))
        .unwrap_err();

        assert_eq!(
            err,
            JournalError::UnbalancedEntry {
                total_debit: BigDecimal::from(200),
                total_credit: BigDecimal::from(150),
            }
        );
        // Callers display the discrepancy, so both totals must be in the message
        let message = err.to_string();
        assert!(message.contains("200"));
        assert!(message.contains("150"));
    }

    #[test]
    fn rejects_line_that_is_both_debit_and_credit() {
        let account = Uuid::new_v4();
        let mut both = DraftLine::debit(account, 100.0);
        both.credit = 100.0.into();

        let err = validate_draft(&draft(vec![both, DraftLine::credit(Uuid::new_v4(), 100.0)]))
            .unwrap_err();
        assert_eq!(err, JournalError::MalformedLine { index: 0 });
    }

    #[test]
    fn rejects_zero_zero_line() {
        let err = validate_draft(&draft(vec![
            DraftLine::debit(Uuid::new_v4(), 100.0),
            DraftLine {
                account_id: Uuid::new_v4(),
                debit: crate::journal::draft::RawAmount::Absent,
                credit: crate::journal::draft::RawAmount::Absent,
                description: None,
                party_id: None,
            },
        ]))
        .unwrap_err();
        assert_eq!(err, JournalError::MalformedLine { index: 1 });
    }

    #[test]
    fn rejects_negative_amounts() {
        let err = validate_draft(&draft(vec![
            DraftLine::debit(Uuid::new_v4(), -100.0),
            DraftLine::credit(Uuid::new_v4(), 100.0),
        ]))
        .unwrap_err();
        assert_eq!(err, JournalError::MalformedLine { index: 0 });
    }

    #[test]
    fn tolerates_sub_cent_imbalance() {
        let entry = validate_draft(&draft(vec![
            DraftLine::debit(Uuid::new_v4(), "100.005"),
            DraftLine::credit(Uuid::new_v4(), "100.00"),
        ]))
        .unwrap();
        assert_eq!(
            entry.total_debit,
            BigDecimal::from_str("100.005").unwrap()
        );
    }

    #[test]
    fn rejects_just_over_tolerance() {
        let err = validate_draft(&draft(vec![
            DraftLine::debit(Uuid::new_v4(), "100.02"),
            DraftLine::credit(Uuid::new_v4(), "100.00"),
        ]))
        .unwrap_err();
        assert!(matches!(err, JournalError::UnbalancedEntry { .. }));
    }

    #[test]
    fn rejects_bad_dates() {
        for bad in ["15-03-2024", "2024/03/15", "2024-3-5", "not a date", ""] {
            let mut d = draft(vec![
                DraftLine::debit(Uuid::new_v4(), 10.0),
                DraftLine::credit(Uuid::new_v4(), 10.0),
            ]);
            d.date = bad.to_string();
            assert_eq!(
                validate_draft(&d).unwrap_err(),
                JournalError::InvalidDate(bad.to_string()),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn rejects_short_description() {
        let mut d = draft(vec![
            DraftLine::debit(Uuid::new_v4(), 10.0),
            DraftLine::credit(Uuid::new_v4(), 10.0),
        ]);
        d.description = "  ok  ".to_string();
        assert_eq!(
            validate_draft(&d).unwrap_err(),
            JournalError::DescriptionTooShort { min: 5, actual: 2 }
        );
    }

    #[test]
    fn coerces_string_amounts_before_balancing() {
        let entry = validate_draft(&draft(vec![
            DraftLine::debit(Uuid::new_v4(), "1150"),
            DraftLine::credit(Uuid::new_v4(), 1150.0),
        ]))
        .unwrap();
        assert_eq!(entry.total_debit, entry.total_credit);
    }
}
