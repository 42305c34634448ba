//! Storage abstraction for the journal engine
//!
//! The engine owns no wire protocol or file format; it is a logic layer
//! over whatever persistence the surrounding application speaks. This
//! trait is the whole boundary: query, lookup, and one atomic write.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::*;

/// A journal entry ready to be persisted, before ids, entry number, and
/// timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub entry_date: NaiveDate,
    pub description: String,
    pub reference_type: ReferenceType,
    pub reference_id: Option<Uuid>,
    pub currency_code: String,
    pub exchange_rate: BigDecimal,
    pub lines: Vec<NewLine>,
}

/// One leg of a [`NewEntry`], already converted to base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLine {
    pub account_id: Uuid,
    pub debit_amount: BigDecimal,
    pub credit_amount: BigDecimal,
    pub description: Option<String>,
    pub party_id: Option<Uuid>,
    pub foreign: Option<ForeignAmount>,
}

/// Storage abstraction for the journal engine.
///
/// Implementations must guarantee that [`post_entry`](Self::post_entry) is
/// all-or-nothing: either the header and every line persist, or nothing
/// does. Entry numbers are assigned atomically with the write and are
/// strictly increasing per tenant; racing posts must never collide.
///
/// All read methods see only what is fully committed: an entry is visible
/// whole or not at all, never half-written.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Fetch the full chart of accounts for a tenant
    async fn fetch_accounts(&self, company_id: Uuid) -> JournalResult<Vec<Account>>;

    /// Resolve an account by its tenant-scoped code (system account lookup)
    async fn find_account_by_code(
        &self,
        company_id: Uuid,
        code: &str,
    ) -> JournalResult<Option<Account>>;

    /// Save a new or updated account (chart setup and import path)
    async fn save_account(&self, account: &Account) -> JournalResult<()>;

    /// Delete an account. Must refuse accounts referenced by journal
    /// lines and accounts flagged as system accounts.
    async fn delete_account(&self, company_id: Uuid, account_id: Uuid) -> JournalResult<()>;

    /// All posted, non-deleted lines for a tenant joined with entry and
    /// account metadata, filtered to the inclusive date range if given.
    async fn fetch_journal_lines(
        &self,
        company_id: Uuid,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Vec<PostedLine>>;

    /// Posted, non-deleted lines for a single account, ordered by entry
    /// date ascending with entry-number tie-break.
    async fn fetch_ledger_lines(
        &self,
        company_id: Uuid,
        account_id: Uuid,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Vec<PostedLine>>;

    /// Every non-void, non-deleted entry with its lines (auditor feed)
    async fn fetch_entries_with_lines(
        &self,
        company_id: Uuid,
    ) -> JournalResult<Vec<(JournalEntry, Vec<JournalLine>)>>;

    /// Look up an already-posted entry by its business reference.
    /// This is the idempotency probe used by the poster.
    async fn find_entry_by_reference(
        &self,
        company_id: Uuid,
        reference_type: ReferenceType,
        reference_id: Uuid,
    ) -> JournalResult<Option<Uuid>>;

    /// Persist one entry header and all of its lines in one transaction,
    /// assigning the next sequential entry number for the tenant.
    /// Returns the new entry's identifier.
    async fn post_entry(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        entry: NewEntry,
    ) -> JournalResult<Uuid>;

    /// Mark a posted entry as void. Terminal; the entry and its lines
    /// remain on record but leave every aggregation.
    async fn void_entry(&self, company_id: Uuid, entry_id: Uuid) -> JournalResult<()>;
}
