//! Atomic submission of validated entries to the storage layer

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::journal::draft::ValidatedEntry;
use crate::journal::validator::check_lines;
use crate::traits::{JournalStore, NewEntry, NewLine};
use crate::types::{ForeignAmount, JournalResult, ReferenceType};

/// Posting context for an entry: what produced it and what currency it
/// was captured in. Amounts in the validated entry are in this currency;
/// the poster converts them to base using `exchange_rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingContext {
    pub reference_type: ReferenceType,
    pub reference_id: Option<Uuid>,
    pub currency_code: String,
    pub exchange_rate: BigDecimal,
}

impl Default for PostingContext {
    fn default() -> Self {
        Self::manual()
    }
}

impl PostingContext {
    /// A manual entry in the base currency
    pub fn manual() -> Self {
        Self {
            reference_type: ReferenceType::Manual,
            reference_id: None,
            currency_code: "SAR".to_string(),
            exchange_rate: BigDecimal::from(1),
        }
    }

    /// An entry produced by a business document (invoice, bond, expense)
    pub fn for_reference(reference_type: ReferenceType, reference_id: Uuid) -> Self {
        Self {
            reference_type,
            reference_id: Some(reference_id),
            ..Self::manual()
        }
    }

    /// Capture the entry in a foreign currency at the given rate to base
    pub fn in_currency(mut self, currency_code: impl Into<String>, rate: BigDecimal) -> Self {
        self.currency_code = currency_code.into();
        self.exchange_rate = rate;
        self
    }
}

/// Orchestrates submission of validated entries as single atomic writes.
///
/// The poster never trusts the client-side validator exclusively: balance
/// and line purity are re-checked here, against the same tolerance,
/// before the store is touched. If re-validation fails nothing is
/// written.
pub struct JournalPoster<S: JournalStore> {
    store: S,
}

impl<S: JournalStore> JournalPoster<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Post a validated entry for a tenant, returning the new entry id.
    ///
    /// When the context carries a reference id, an entry already posted
    /// for the same (tenant, reference type, reference id) is returned
    /// as-is instead of being duplicated, so adapter calls are safe to
    /// retry after an unknown outcome.
    pub async fn post(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        entry: ValidatedEntry,
        ctx: PostingContext,
    ) -> JournalResult<Uuid> {
        // Defense in depth: identical rules to the pre-flight validator
        check_lines(&entry.lines)?;

        if let Some(reference_id) = ctx.reference_id {
            if let Some(existing) = self
                .store
                .find_entry_by_reference(company_id, ctx.reference_type, reference_id)
                .await?
            {
                tracing::debug!(
                    entry_id = %existing,
                    reference_id = %reference_id,
                    "reference already posted, returning existing entry"
                );
                return Ok(existing);
            }
        }

        let one = BigDecimal::from(1);
        let zero = BigDecimal::from(0);
        let lines = entry
            .lines
            .into_iter()
            .map(|line| {
                // Foreign side kept as audit metadata only; the ledger
                // runs on base-currency amounts.
                let foreign = if ctx.exchange_rate != one {
                    let amount = if line.debit > zero {
                        line.debit.clone()
                    } else {
                        line.credit.clone()
                    };
                    Some(ForeignAmount {
                        currency_code: ctx.currency_code.clone(),
                        exchange_rate: ctx.exchange_rate.clone(),
                        amount,
                    })
                } else {
                    None
                };
                NewLine {
                    account_id: line.account_id,
                    debit_amount: &line.debit * &ctx.exchange_rate,
                    credit_amount: &line.credit * &ctx.exchange_rate,
                    description: line.description,
                    party_id: line.party_id,
                    foreign,
                }
            })
            .collect();

        let new_entry = NewEntry {
            entry_date: entry.date,
            description: entry.description,
            reference_type: ctx.reference_type,
            reference_id: ctx.reference_id,
            currency_code: ctx.currency_code,
            exchange_rate: ctx.exchange_rate,
            lines,
        };

        let entry_id = self.store.post_entry(company_id, user_id, new_entry).await?;
        tracing::info!(
            entry_id = %entry_id,
            company_id = %company_id,
            "posted journal entry"
        );
        Ok(entry_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::draft::{DraftEntry, DraftLine};
    use crate::journal::validator::validate_draft;
    use crate::types::{Account, AccountType, JournalError};
    use crate::utils::memory_store::MemoryStore;
    use std::str::FromStr;

    async fn two_accounts(store: &MemoryStore, company_id: Uuid) -> (Uuid, Uuid) {
        let cash = Account::new(company_id, "1010", "Cash", AccountType::Asset);
        let sales = Account::new(company_id, "4010", "Sales", AccountType::Revenue);
        store.save_account(&cash).await.unwrap();
        store.save_account(&sales).await.unwrap();
        (cash.id, sales.id)
    }

    fn balanced_draft(debit_account: Uuid, credit_account: Uuid, amount: f64) -> ValidatedEntry {
        validate_draft(&DraftEntry {
            date: "2024-01-10".to_string(),
            description: "Cash sale of goods".to_string(),
            lines: vec![
                DraftLine::debit(debit_account, amount),
                DraftLine::credit(credit_account, amount),
            ],
        })
        .unwrap()
    }

    #[tokio::test]
    async fn posts_and_assigns_sequential_numbers() {
        let store = MemoryStore::new();
        let company_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let (cash, sales) = two_accounts(&store, company_id).await;
        let poster = JournalPoster::new(store);

        let first = poster
            .post(
                company_id,
                user_id,
                balanced_draft(cash, sales, 100.0),
                PostingContext::manual(),
            )
            .await
            .unwrap();
        let second = poster
            .post(
                company_id,
                user_id,
                balanced_draft(cash, sales, 250.0),
                PostingContext::manual(),
            )
            .await
            .unwrap();
        assert_ne!(first, second);

        let entries = poster
            .store()
            .fetch_entries_with_lines(company_id)
            .await
            .unwrap();
        let mut numbers: Vec<i64> = entries.iter().map(|(e, _)| e.entry_number).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[tokio::test]
    async fn re_validates_before_writing() {
        let store = MemoryStore::new();
        let company_id = Uuid::new_v4();
        let (cash, sales) = two_accounts(&store, company_id).await;
        let poster = JournalPoster::new(store);

        // Forge an unbalanced entry that skipped pre-flight validation
        let mut entry = balanced_draft(cash, sales, 100.0);
        entry.lines[1].credit = BigDecimal::from(90);

        let err = poster
            .post(company_id, Uuid::new_v4(), entry, PostingContext::manual())
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::UnbalancedEntry { .. }));

        // Nothing was written
        let entries = poster
            .store()
            .fetch_entries_with_lines(company_id)
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn deduplicates_by_reference() {
        let store = MemoryStore::new();
        let company_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let (cash, sales) = two_accounts(&store, company_id).await;
        let poster = JournalPoster::new(store);

        let invoice_id = Uuid::new_v4();
        let ctx = PostingContext::for_reference(ReferenceType::Sale, invoice_id);

        let first = poster
            .post(
                company_id,
                user_id,
                balanced_draft(cash, sales, 500.0),
                ctx.clone(),
            )
            .await
            .unwrap();
        let retried = poster
            .post(
                company_id,
                user_id,
                balanced_draft(cash, sales, 500.0),
                ctx,
            )
            .await
            .unwrap();

        assert_eq!(first, retried);
        let entries = poster
            .store()
            .fetch_entries_with_lines(company_id)
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn converts_foreign_amounts_to_base() {
        let store = MemoryStore::new();
        let company_id = Uuid::new_v4();
        let (cash, sales) = two_accounts(&store, company_id).await;
        let poster = JournalPoster::new(store);

        let ctx = PostingContext::manual()
            .in_currency("USD", BigDecimal::from_str("3.75").unwrap());
        poster
            .post(
                company_id,
                Uuid::new_v4(),
                balanced_draft(cash, sales, 100.0),
                ctx,
            )
            .await
            .unwrap();

        let entries = poster
            .store()
            .fetch_entries_with_lines(company_id)
            .await
            .unwrap();
        let (_, lines) = &entries[0];
        let debit_line = lines.iter().find(|l| l.account_id == cash).unwrap();
        assert_eq!(debit_line.debit_amount, BigDecimal::from_str("375.00").unwrap());
        let foreign = debit_line.foreign.as_ref().unwrap();
        assert_eq!(foreign.currency_code, "USD");
        assert_eq!(foreign.amount, BigDecimal::from(100));
    }
}
