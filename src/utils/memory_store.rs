//! In-memory store implementation for testing and development

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::traits::{JournalStore, NewEntry};
use crate::types::*;

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<Uuid, Account>,
    entries: Vec<JournalEntry>,
    lines: HashMap<Uuid, Vec<JournalLine>>,
    sequences: HashMap<Uuid, i64>,
}

/// In-memory [`JournalStore`] backed by a single lock, so posting is
/// naturally atomic: the header, its lines, the sequence bump, and the
/// balance cache update happen under one write guard.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.accounts.clear();
        inner.entries.clear();
        inner.lines.clear();
        inner.sequences.clear();
    }

    /// Insert an entry bypassing validation and numbering. Test hook for
    /// planting corrupt entries the auditor should detect; production
    /// writes go through [`post_entry`](JournalStore::post_entry).
    pub fn insert_entry_unchecked(&self, entry: JournalEntry, lines: Vec<JournalLine>) {
        let mut inner = self.inner.write().unwrap();
        let sequence = inner.sequences.entry(entry.company_id).or_insert(0);
        *sequence = (*sequence).max(entry.entry_number);
        inner.lines.insert(entry.id, lines);
        inner.entries.push(entry);
    }

    fn joined_line(
        inner: &Inner,
        entry: &JournalEntry,
        line: &JournalLine,
    ) -> JournalResult<PostedLine> {
        let account = inner
            .accounts
            .get(&line.account_id)
            .ok_or(JournalError::AccountNotFound(line.account_id))?;
        Ok(PostedLine {
            entry_id: entry.id,
            entry_number: entry.entry_number,
            entry_date: entry.entry_date,
            account_id: account.id,
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            account_type: account.account_type,
            debit_amount: line.debit_amount.clone(),
            credit_amount: line.credit_amount.clone(),
            description: line.description.clone(),
            foreign: line.foreign.clone(),
        })
    }

    fn in_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
        from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t)
    }
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn fetch_accounts(&self, company_id: Uuid) -> JournalResult<Vec<Account>> {
        let inner = self.inner.read().unwrap();
        let mut accounts: Vec<Account> = inner
            .accounts
            .values()
            .filter(|a| a.company_id == company_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn find_account_by_code(
        &self,
        company_id: Uuid,
        code: &str,
    ) -> JournalResult<Option<Account>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .accounts
            .values()
            .find(|a| a.company_id == company_id && a.code == code)
            .cloned())
    }

    async fn save_account(&self, account: &Account) -> JournalResult<()> {
        let mut inner = self.inner.write().unwrap();
        let duplicate_code = inner.accounts.values().any(|a| {
            a.company_id == account.company_id && a.code == account.code && a.id != account.id
        });
        if duplicate_code {
            return Err(JournalError::Storage(format!(
                "account code {} already exists for this tenant",
                account.code
            )));
        }
        inner.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn delete_account(&self, company_id: Uuid, account_id: Uuid) -> JournalResult<()> {
        let mut inner = self.inner.write().unwrap();
        let account = inner
            .accounts
            .get(&account_id)
            .filter(|a| a.company_id == company_id)
            .ok_or(JournalError::AccountNotFound(account_id))?;
        if account.is_system {
            return Err(JournalError::ProtectedAccount(account_id));
        }
        let referenced = inner
            .lines
            .values()
            .flatten()
            .any(|line| line.account_id == account_id);
        if referenced {
            return Err(JournalError::AccountInUse(account_id));
        }
        inner.accounts.remove(&account_id);
        Ok(())
    }

    async fn fetch_journal_lines(
        &self,
        company_id: Uuid,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Vec<PostedLine>> {
        let inner = self.inner.read().unwrap();
        let mut entries: Vec<&JournalEntry> = inner
            .entries
            .iter()
            .filter(|e| {
                e.company_id == company_id
                    && e.status == EntryStatus::Posted
                    && e.deleted_at.is_none()
                    && Self::in_range(e.entry_date, from_date, to_date)
            })
            .collect();
        entries.sort_by_key(|e| (e.entry_date, e.entry_number));

        let mut rows = Vec::new();
        for entry in entries {
            for line in inner.lines.get(&entry.id).map(Vec::as_slice).unwrap_or(&[]) {
                rows.push(Self::joined_line(&inner, entry, line)?);
            }
        }
        Ok(rows)
    }

    async fn fetch_ledger_lines(
        &self,
        company_id: Uuid,
        account_id: Uuid,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Vec<PostedLine>> {
        let rows = self
            .fetch_journal_lines(company_id, from_date, to_date)
            .await?;
        Ok(rows
            .into_iter()
            .filter(|r| r.account_id == account_id)
            .collect())
    }

    async fn fetch_entries_with_lines(
        &self,
        company_id: Uuid,
    ) -> JournalResult<Vec<(JournalEntry, Vec<JournalLine>)>> {
        let inner = self.inner.read().unwrap();
        let mut result: Vec<(JournalEntry, Vec<JournalLine>)> = inner
            .entries
            .iter()
            .filter(|e| {
                e.company_id == company_id
                    && e.status != EntryStatus::Void
                    && e.deleted_at.is_none()
            })
            .map(|e| {
                let lines = inner.lines.get(&e.id).cloned().unwrap_or_default();
                (e.clone(), lines)
            })
            .collect();
        result.sort_by_key(|(e, _)| e.entry_number);
        Ok(result)
    }

    async fn find_entry_by_reference(
        &self,
        company_id: Uuid,
        reference_type: ReferenceType,
        reference_id: Uuid,
    ) -> JournalResult<Option<Uuid>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .entries
            .iter()
            .find(|e| {
                e.company_id == company_id
                    && e.reference_type == reference_type
                    && e.reference_id == Some(reference_id)
                    && e.status != EntryStatus::Void
                    && e.deleted_at.is_none()
            })
            .map(|e| e.id))
    }

    async fn post_entry(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        entry: NewEntry,
    ) -> JournalResult<Uuid> {
        let mut inner = self.inner.write().unwrap();

        // Verify every referenced account before anything is written
        for line in &entry.lines {
            let known = inner
                .accounts
                .get(&line.account_id)
                .is_some_and(|a| a.company_id == company_id);
            if !known {
                return Err(JournalError::AccountNotFound(line.account_id));
            }
        }

        let sequence = inner.sequences.entry(company_id).or_insert(0);
        *sequence += 1;
        let entry_number = *sequence;

        let entry_id = Uuid::new_v4();
        let header = JournalEntry {
            id: entry_id,
            company_id,
            entry_number,
            entry_date: entry.entry_date,
            description: entry.description,
            status: EntryStatus::Posted,
            reference_type: entry.reference_type,
            reference_id: entry.reference_id,
            currency_code: entry.currency_code,
            exchange_rate: entry.exchange_rate,
            created_by: user_id,
            created_at: chrono::Utc::now().naive_utc(),
            deleted_at: None,
        };

        let lines: Vec<JournalLine> = entry
            .lines
            .into_iter()
            .map(|line| JournalLine {
                id: Uuid::new_v4(),
                entry_id,
                account_id: line.account_id,
                debit_amount: line.debit_amount,
                credit_amount: line.credit_amount,
                description: line.description,
                party_id: line.party_id,
                foreign: line.foreign,
            })
            .collect();

        // Maintain the denormalized balance cache (signed debit - credit)
        for line in &lines {
            if let Some(account) = inner.accounts.get_mut(&line.account_id) {
                account.balance += &line.debit_amount - &line.credit_amount;
            }
        }

        inner.lines.insert(entry_id, lines);
        inner.entries.push(header);
        Ok(entry_id)
    }

    async fn void_entry(&self, company_id: Uuid, entry_id: Uuid) -> JournalResult<()> {
        let mut inner = self.inner.write().unwrap();
        let position = inner
            .entries
            .iter()
            .position(|e| e.id == entry_id && e.company_id == company_id)
            .ok_or(JournalError::EntryNotFound(entry_id))?;

        if inner.entries[position].status == EntryStatus::Void {
            return Ok(());
        }
        inner.entries[position].status = EntryStatus::Void;

        // Back the voided movements out of the balance cache
        let lines = inner.lines.get(&entry_id).cloned().unwrap_or_default();
        for line in &lines {
            if let Some(account) = inner.accounts.get_mut(&line.account_id) {
                account.balance -= &line.debit_amount - &line.credit_amount;
            }
        }
        Ok(())
    }
}
