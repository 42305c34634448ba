//! Ledger, trial balance, and monthly performance aggregation
//!
//! All computation here reads posted, non-deleted lines and derives
//! views fresh on every call. Nothing is cached across calls and nothing
//! is mutated on read, so identical inputs over unchanged data always
//! yield identical output.

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use uuid::Uuid;

use crate::ledger::reports::{financials_from_trial_balance, Financials};
use crate::traits::JournalStore;
use crate::types::{
    AccountType, JournalResult, LedgerRow, MonthlyPerformance, TrialBalanceRow,
};

/// Read-side computation of per-account views from posted journal lines
pub struct LedgerAggregator<S: JournalStore> {
    store: S,
}

impl<S: JournalStore> LedgerAggregator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Chronological ledger for one account with a running balance.
    ///
    /// The balance folds `debit - credit` over lines ordered by entry
    /// date, ties broken by entry number.
    pub async fn ledger(
        &self,
        company_id: Uuid,
        account_id: Uuid,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Vec<LedgerRow>> {
        let lines = self
            .store
            .fetch_ledger_lines(company_id, account_id, from_date, to_date)
            .await?;

        let mut balance = BigDecimal::from(0);
        let rows = lines
            .into_iter()
            .map(|line| {
                balance += &line.debit_amount - &line.credit_amount;
                LedgerRow {
                    entry_date: line.entry_date,
                    entry_number: line.entry_number,
                    description: line.description,
                    debit: line.debit_amount,
                    credit: line.credit_amount,
                    balance: balance.clone(),
                    foreign: line.foreign,
                }
            })
            .collect();
        Ok(rows)
    }

    /// Trial balance over a date range, exhaustive over the chart of
    /// accounts: accounts with no activity appear with zero totals.
    /// Rows come back ordered by account code.
    pub async fn trial_balance(
        &self,
        company_id: Uuid,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Vec<TrialBalanceRow>> {
        let mut accounts = self.store.fetch_accounts(company_id).await?;
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let lines = self
            .store
            .fetch_journal_lines(company_id, from_date, to_date)
            .await?;

        // Request-scoped aggregation map; debits and credits are summed
        // independently, never netted per line.
        let mut totals: HashMap<Uuid, (BigDecimal, BigDecimal)> = HashMap::new();
        for line in &lines {
            let slot = totals
                .entry(line.account_id)
                .or_insert_with(|| (BigDecimal::from(0), BigDecimal::from(0)));
            slot.0 += &line.debit_amount;
            slot.1 += &line.credit_amount;
        }

        let rows = accounts
            .into_iter()
            .map(|account| {
                let (total_debit, total_credit) = totals
                    .remove(&account.id)
                    .unwrap_or_else(|| (BigDecimal::from(0), BigDecimal::from(0)));
                let net_balance = &total_debit - &total_credit;
                TrialBalanceRow {
                    account_id: account.id,
                    code: account.code,
                    name: account.name,
                    account_type: account.account_type,
                    currency_code: account.currency_code,
                    total_debit,
                    total_credit,
                    net_balance,
                }
            })
            .collect();
        Ok(rows)
    }

    /// Income statement and balance sheet derived from the trial balance
    pub async fn financials(
        &self,
        company_id: Uuid,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Financials> {
        let trial_balance = self.trial_balance(company_id, from_date, to_date).await?;
        Ok(financials_from_trial_balance(&trial_balance))
    }

    /// Revenue and expense totals bucketed by calendar month (0-11) for
    /// one year, for dashboarding.
    pub async fn monthly_performance(
        &self,
        company_id: Uuid,
        year: i32,
    ) -> JournalResult<Vec<MonthlyPerformance>> {
        let from = NaiveDate::from_ymd_opt(year, 1, 1);
        let to = NaiveDate::from_ymd_opt(year, 12, 31);
        let lines = self.store.fetch_journal_lines(company_id, from, to).await?;

        let mut months: Vec<MonthlyPerformance> = (0..12)
            .map(|month| MonthlyPerformance {
                month,
                revenue: BigDecimal::from(0),
                expense: BigDecimal::from(0),
            })
            .collect();

        for line in &lines {
            let bucket = &mut months[line.entry_date.month0() as usize];
            match line.account_type {
                AccountType::Revenue => {
                    bucket.revenue += &line.credit_amount - &line.debit_amount;
                }
                AccountType::Expense => {
                    bucket.expense += &line.debit_amount - &line.credit_amount;
                }
                _ => {}
            }
        }

        Ok(months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::setup_standard_chart;
    use crate::journal::draft::{DraftEntry, DraftLine};
    use crate::journal::poster::{JournalPoster, PostingContext};
    use crate::journal::validator::validate_draft;
    use crate::utils::memory_store::MemoryStore;

    async fn seeded() -> (MemoryStore, Uuid, HashMap<String, Uuid>) {
        let store = MemoryStore::new();
        let company_id = Uuid::new_v4();
        let chart = setup_standard_chart(&store, company_id).await.unwrap();
        let by_code = chart.into_iter().map(|a| (a.code.clone(), a.id)).collect();
        (store, company_id, by_code)
    }

    async fn post_manual(
        store: &MemoryStore,
        company_id: Uuid,
        date: &str,
        debit: Uuid,
        credit: Uuid,
        amount: f64,
    ) {
        let poster = JournalPoster::new(store.clone());
        let entry = validate_draft(&DraftEntry {
            date: date.to_string(),
            description: format!("Manual entry on {date}"),
            lines: vec![
                DraftLine::debit(debit, amount),
                DraftLine::credit(credit, amount),
            ],
        })
        .unwrap();
        poster
            .post(company_id, Uuid::new_v4(), entry, PostingContext::manual())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn running_balance_folds_debit_minus_credit() {
        let (store, company_id, chart) = seeded().await;
        let cash = chart["1010"];
        let sales = chart["4010"];

        post_manual(&store, company_id, "2024-01-05", cash, sales, 1000.0).await;
        post_manual(&store, company_id, "2024-01-10", sales, cash, 300.0).await;
        post_manual(&store, company_id, "2024-01-20", cash, sales, 50.0).await;

        let aggregator = LedgerAggregator::new(store);
        let rows = aggregator
            .ledger(company_id, cash, None, None)
            .await
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].balance, BigDecimal::from(1000));
        assert_eq!(rows[1].balance, BigDecimal::from(700));
        assert_eq!(rows[2].balance, BigDecimal::from(750));

        // Fold consistency: final balance equals sum(debit) - sum(credit)
        let total_debit: BigDecimal = rows.iter().map(|r| &r.debit).sum();
        let total_credit: BigDecimal = rows.iter().map(|r| &r.credit).sum();
        assert_eq!(rows[2].balance, total_debit - total_credit);
    }

    #[tokio::test]
    async fn ledger_respects_inclusive_date_bounds() {
        let (store, company_id, chart) = seeded().await;
        let cash = chart["1010"];
        let sales = chart["4010"];

        post_manual(&store, company_id, "2024-01-01", cash, sales, 100.0).await;
        post_manual(&store, company_id, "2024-01-15", cash, sales, 200.0).await;
        post_manual(&store, company_id, "2024-02-01", cash, sales, 400.0).await;

        let aggregator = LedgerAggregator::new(store);
        let rows = aggregator
            .ledger(
                company_id,
                cash,
                NaiveDate::from_ymd_opt(2024, 1, 1),
                NaiveDate::from_ymd_opt(2024, 1, 31),
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.last().unwrap().balance, BigDecimal::from(300));
    }

    #[tokio::test]
    async fn trial_balance_is_exhaustive_over_chart() {
        let (store, company_id, chart) = seeded().await;
        let cash = chart["1010"];
        let sales = chart["4010"];
        post_manual(&store, company_id, "2024-01-05", cash, sales, 1000.0).await;

        let aggregator = LedgerAggregator::new(store);
        let rows = aggregator
            .trial_balance(company_id, None, None)
            .await
            .unwrap();

        // Every chart account appears exactly once, active or not
        assert_eq!(rows.len(), chart.len());
        let inactive = rows.iter().find(|r| r.code == "2010").unwrap();
        assert_eq!(inactive.total_debit, BigDecimal::from(0));
        assert_eq!(inactive.total_credit, BigDecimal::from(0));
        assert_eq!(inactive.net_balance, BigDecimal::from(0));

        let revenue = rows.iter().find(|r| r.code == "4010").unwrap();
        assert_eq!(revenue.total_debit, BigDecimal::from(0));
        assert_eq!(revenue.total_credit, BigDecimal::from(1000));
        assert_eq!(revenue.net_balance, BigDecimal::from(-1000));

        // Books balance overall
        let debits: BigDecimal = rows.iter().map(|r| &r.total_debit).sum();
        let credits: BigDecimal = rows.iter().map(|r| &r.total_credit).sum();
        assert_eq!(debits, credits);
    }

    #[tokio::test]
    async fn reads_are_idempotent() {
        let (store, company_id, chart) = seeded().await;
        let cash = chart["1010"];
        let sales = chart["4010"];
        post_manual(&store, company_id, "2024-01-05", cash, sales, 1000.0).await;

        let aggregator = LedgerAggregator::new(store);
        let first = aggregator
            .trial_balance(company_id, None, None)
            .await
            .unwrap();
        let second = aggregator
            .trial_balance(company_id, None, None)
            .await
            .unwrap();
        assert_eq!(first, second);

        let ledger_a = aggregator.ledger(company_id, cash, None, None).await.unwrap();
        let ledger_b = aggregator.ledger(company_id, cash, None, None).await.unwrap();
        assert_eq!(ledger_a, ledger_b);
    }

    #[tokio::test]
    async fn monthly_buckets_revenue_and_expense() {
        let (store, company_id, chart) = seeded().await;
        let cash = chart["1010"];
        let sales = chart["4010"];
        let rent = chart["5020"];

        post_manual(&store, company_id, "2024-01-05", cash, sales, 1000.0).await;
        post_manual(&store, company_id, "2024-01-20", rent, cash, 400.0).await;
        post_manual(&store, company_id, "2024-03-02", cash, sales, 600.0).await;

        let aggregator = LedgerAggregator::new(store);
        let months = aggregator
            .monthly_performance(company_id, 2024)
            .await
            .unwrap();

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].revenue, BigDecimal::from(1000));
        assert_eq!(months[0].expense, BigDecimal::from(400));
        assert_eq!(months[1].revenue, BigDecimal::from(0));
        assert_eq!(months[2].revenue, BigDecimal::from(600));
        assert_eq!(months[2].expense, BigDecimal::from(0));
    }
}
