//! Core types and data structures for the journal engine

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account types following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Assets - what the business owns (Cash, Receivables, Inventory, etc.)
    Asset,
    /// Liabilities - what the business owes (Payables, Tax payable, etc.)
    Liability,
    /// Equity - owner's interest in the business
    Equity,
    /// Revenue - money earned by the business
    Revenue,
    /// Expenses - costs incurred by the business
    Expense,
}

/// The side of a journal line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySide {
    Debit,
    Credit,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    /// Assets and Expenses normally carry debit balances; Liabilities,
    /// Equity, and Revenue normally carry credit balances.
    pub fn normal_balance(&self) -> EntrySide {
        match self {
            AccountType::Asset | AccountType::Expense => EntrySide::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => {
                EntrySide::Credit
            }
        }
    }
}

/// A node in a tenant's chart of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,
    /// Owning tenant
    pub company_id: Uuid,
    /// Account code, unique within the tenant (e.g. "1100")
    pub code: String,
    /// Human-readable account name
    pub name: String,
    /// Type of account (Asset, Liability, etc.)
    pub account_type: AccountType,
    /// Optional parent account for hierarchical chart of accounts
    pub parent_id: Option<Uuid>,
    /// Denormalized running balance cache
    pub balance: BigDecimal,
    /// Currency the account is denominated in
    pub currency_code: String,
    /// System accounts are protected from deletion
    pub is_system: bool,
    /// When the account was created
    pub created_at: NaiveDateTime,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(
        company_id: Uuid,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            code: code.into(),
            name: name.into(),
            account_type,
            parent_id: None,
            balance: BigDecimal::from(0),
            currency_code: "SAR".to_string(),
            is_system: false,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Mark the account as a protected system account
    pub fn system(mut self) -> Self {
        self.is_system = true;
        self
    }

    /// Attach a parent account
    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Lifecycle status of a journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Not yet final; excluded from ledger and trial balance
    Draft,
    /// Finalized and included in all aggregations
    Posted,
    /// Reversed; terminal state, never deleted
    Void,
}

/// Business event that produced a journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    Manual,
    Sale,
    Purchase,
    ReturnSale,
    ReturnPurchase,
    Payment,
    Receipt,
    Expense,
    SubLedgerSync,
    OpeningBalance,
    Correction,
}

/// One atomic accounting transaction (the header).
///
/// Entries are append-only: once posted they are never mutated, only
/// voided or soft-deleted. The central invariant is that the debit and
/// credit totals of an entry's lines agree within 0.01 currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier
    pub id: Uuid,
    /// Owning tenant
    pub company_id: Uuid,
    /// Sequential number, strictly increasing per tenant
    pub entry_number: i64,
    /// Date the transaction occurred
    pub entry_date: NaiveDate,
    /// Free-text description
    pub description: String,
    /// Lifecycle status
    pub status: EntryStatus,
    /// Business event that produced this entry
    pub reference_type: ReferenceType,
    /// Pointer to the source invoice/payment/expense, if any
    pub reference_id: Option<Uuid>,
    /// Currency the entry was captured in
    pub currency_code: String,
    /// Exchange rate from the entry currency to the base currency
    pub exchange_rate: BigDecimal,
    /// User who created the entry
    pub created_by: Uuid,
    /// When the entry was created
    pub created_at: NaiveDateTime,
    /// Soft-delete marker; deleted entries are excluded from all reads
    pub deleted_at: Option<NaiveDateTime>,
}

/// One debit-or-credit leg of a journal entry.
///
/// Exactly one of `debit_amount` and `credit_amount` is strictly positive
/// and the other is exactly zero. Lines are created only as part of their
/// parent entry's atomic submission and never updated independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier
    pub id: Uuid,
    /// Parent entry
    pub entry_id: Uuid,
    /// Account being affected
    pub account_id: Uuid,
    /// Debit amount in base currency, >= 0
    pub debit_amount: BigDecimal,
    /// Credit amount in base currency, >= 0
    pub credit_amount: BigDecimal,
    /// Optional free-text description for this leg
    pub description: Option<String>,
    /// Optional counterparty (customer/supplier)
    pub party_id: Option<Uuid>,
    /// Foreign-currency audit metadata; `None` for base-currency lines
    pub foreign: Option<ForeignAmount>,
}

/// Display/audit metadata for a line denominated in a non-base currency.
///
/// Aggregation always operates on the base-currency amounts; this is not
/// a second accounting basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignAmount {
    /// ISO currency code of the original amount
    pub currency_code: String,
    /// Rate used to convert to base currency at posting time
    pub exchange_rate: BigDecimal,
    /// The original (pre-conversion) amount of the non-zero side
    pub amount: BigDecimal,
}

/// A posted journal line joined with its parent entry and account
/// metadata, as returned by the read-side storage queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostedLine {
    pub entry_id: Uuid,
    pub entry_number: i64,
    pub entry_date: NaiveDate,
    pub account_id: Uuid,
    pub account_code: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub debit_amount: BigDecimal,
    pub credit_amount: BigDecimal,
    pub description: Option<String>,
    pub foreign: Option<ForeignAmount>,
}

/// One row of a per-account ledger view: a posted line with the running
/// balance after applying it. Derived on each query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub entry_date: NaiveDate,
    pub entry_number: i64,
    pub description: Option<String>,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
    /// Signed running balance: fold of `debit - credit` in date order
    pub balance: BigDecimal,
    pub foreign: Option<ForeignAmount>,
}

/// Per-account aggregate over a date range. Derived on each query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account_id: Uuid,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub currency_code: String,
    pub total_debit: BigDecimal,
    pub total_credit: BigDecimal,
    /// `total_debit - total_credit`
    pub net_balance: BigDecimal,
}

/// One point of the revenue/expense dashboard series, bucketed by
/// calendar month (0-11).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPerformance {
    pub month: u32,
    /// Sum of `credit - debit` over revenue-account lines
    pub revenue: BigDecimal,
    /// Sum of `debit - credit` over expense-account lines
    pub expense: BigDecimal,
}

/// The balance tolerance shared by the validator, the poster's
/// re-validation, and the auditor: 0.01 currency units.
pub fn balance_tolerance() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(100)
}

/// Errors that can occur in the journal engine
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum JournalError {
    #[error("Entry date must match YYYY-MM-DD, got: {0}")]
    InvalidDate(String),
    #[error("Description must be at least {min} characters, got {actual}")]
    DescriptionTooShort { min: usize, actual: usize },
    #[error("Journal entry requires at least 2 lines, got {0}")]
    InsufficientLines(usize),
    #[error("Line {index}: a line must be purely debit or purely credit")]
    MalformedLine { index: usize },
    #[error("Entry is not balanced: debits = {total_debit}, credits = {total_credit}")]
    UnbalancedEntry {
        total_debit: BigDecimal,
        total_credit: BigDecimal,
    },
    #[error("Tax amount {tax} does not fit in invoice total {total}")]
    InvalidTaxSplit { total: BigDecimal, tax: BigDecimal },
    #[error("No {role} account configured for this tenant (code {code})")]
    MissingSystemAccount { role: String, code: String },
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),
    #[error("Account {0} is referenced by journal lines and cannot be deleted")]
    AccountInUse(Uuid),
    #[error("System account {0} cannot be deleted")]
    ProtectedAccount(Uuid),
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for journal operations
pub type JournalResult<T> = Result<T, JournalError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn normal_balance_sides() {
        assert_eq!(AccountType::Asset.normal_balance(), EntrySide::Debit);
        assert_eq!(AccountType::Expense.normal_balance(), EntrySide::Debit);
        assert_eq!(AccountType::Liability.normal_balance(), EntrySide::Credit);
        assert_eq!(AccountType::Equity.normal_balance(), EntrySide::Credit);
        assert_eq!(AccountType::Revenue.normal_balance(), EntrySide::Credit);
    }

    #[test]
    fn tolerance_is_one_hundredth() {
        assert_eq!(
            balance_tolerance(),
            BigDecimal::from_str("0.01").unwrap()
        );
    }

    #[test]
    fn account_type_serializes_snake_case() {
        let json = serde_json::to_string(&AccountType::Liability).unwrap();
        assert_eq!(json, "\"liability\"");
        let back: AccountType = serde_json::from_str("\"revenue\"").unwrap();
        assert_eq!(back, AccountType::Revenue);
    }
}
