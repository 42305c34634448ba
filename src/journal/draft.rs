//! Loose draft shapes submitted by clients and their normalization
//!
//! Upstream callers are inconsistent about field naming (`debit` vs
//! `debit_amount`) and sometimes send numeric strings instead of numbers.
//! Everything is normalized here, at the boundary, into one canonical
//! line type; ambiguous shapes never reach the validator or poster.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// An amount as received from a client: a number, a numeric string, or
/// absent. Missing or unparseable values coerce to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
    Absent,
}

impl Default for RawAmount {
    fn default() -> Self {
        RawAmount::Absent
    }
}

impl RawAmount {
    /// Coerce to an exact decimal, defaulting invalid input to zero.
    ///
    /// Floats go through their decimal rendering so `0.1` arrives as
    /// `0.1`, not its binary expansion.
    pub fn to_decimal(&self) -> BigDecimal {
        match self {
            RawAmount::Number(n) if n.is_finite() => {
                BigDecimal::from_str(&n.to_string()).unwrap_or_else(|_| BigDecimal::from(0))
            }
            RawAmount::Number(_) => BigDecimal::from(0),
            RawAmount::Text(s) => {
                BigDecimal::from_str(s.trim()).unwrap_or_else(|_| BigDecimal::from(0))
            }
            RawAmount::Absent => BigDecimal::from(0),
        }
    }
}

impl From<f64> for RawAmount {
    fn from(n: f64) -> Self {
        RawAmount::Number(n)
    }
}

impl From<i64> for RawAmount {
    fn from(n: i64) -> Self {
        RawAmount::Number(n as f64)
    }
}

impl From<&str> for RawAmount {
    fn from(s: &str) -> Self {
        RawAmount::Text(s.to_string())
    }
}

/// One leg of a proposed entry as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftLine {
    #[serde(alias = "account")]
    pub account_id: Uuid,
    #[serde(default, alias = "debit_amount")]
    pub debit: RawAmount,
    #[serde(default, alias = "credit_amount")]
    pub credit: RawAmount,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub party_id: Option<Uuid>,
}

impl DraftLine {
    pub fn debit(account_id: Uuid, amount: impl Into<RawAmount>) -> Self {
        Self {
            account_id,
            debit: amount.into(),
            credit: RawAmount::Absent,
            description: None,
            party_id: None,
        }
    }

    pub fn credit(account_id: Uuid, amount: impl Into<RawAmount>) -> Self {
        Self {
            account_id,
            debit: RawAmount::Absent,
            credit: amount.into(),
            description: None,
            party_id: None,
        }
    }
}

/// A proposed journal entry before validation.
///
/// The date stays a string here so the validator can enforce the ISO
/// `YYYY-MM-DD` pattern itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEntry {
    pub date: String,
    pub description: String,
    pub lines: Vec<DraftLine>,
}

/// One canonical debit-or-credit leg with exact amounts. The only line
/// shape the poster and store ever see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLine {
    pub account_id: Uuid,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
    pub description: Option<String>,
    pub party_id: Option<Uuid>,
}

/// A draft that passed validation: parsed date, trimmed description,
/// canonical lines, and the computed totals.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEntry {
    pub date: NaiveDate,
    pub description: String,
    pub lines: Vec<CanonicalLine>,
    pub total_debit: BigDecimal,
    pub total_credit: BigDecimal,
}
