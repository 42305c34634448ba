//! Batch integrity scanning of posted journal entries
//!
//! Findings are data, not errors: historical entries are never mutated
//! automatically. Correction is a manual, audited follow-up outside this
//! engine.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::traits::JournalStore;
use crate::types::{balance_tolerance, JournalResult};

/// Classification of an offending entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Debit and credit totals differ by 0.01 or more
    Unbalanced,
    /// Both totals are exactly zero: an entry with no real movement
    Degenerate,
}

/// One offending entry with its computed totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFinding {
    pub entry_id: Uuid,
    pub entry_number: i64,
    pub entry_date: chrono::NaiveDate,
    pub description: String,
    pub total_debit: BigDecimal,
    pub total_credit: BigDecimal,
    pub kind: FindingKind,
    /// Human-readable discrepancy message for the reconciliation report
    pub message: String,
}

/// Summary of a full integrity scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Entries scanned (non-void, non-deleted)
    pub total: usize,
    /// Entries whose totals disagree
    pub unbalanced: usize,
    /// Degenerate all-zero entries
    pub errors: usize,
    pub findings: Vec<AuditFinding>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Batch health-check across all non-void entries for a tenant.
/// Detection only; never corrects.
pub struct IntegrityAuditor<S: JournalStore> {
    store: S,
}

impl<S: JournalStore> IntegrityAuditor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Scan every non-void, non-deleted entry and classify violations of
    /// the balance invariant.
    pub async fn scan(&self, company_id: Uuid) -> JournalResult<AuditReport> {
        let entries = self.store.fetch_entries_with_lines(company_id).await?;
        let tolerance = balance_tolerance();
        let zero = BigDecimal::from(0);

        let mut findings = Vec::new();
        let total = entries.len();

        for (entry, lines) in entries {
            let total_debit: BigDecimal = lines.iter().map(|l| &l.debit_amount).sum();
            let total_credit: BigDecimal = lines.iter().map(|l| &l.credit_amount).sum();
            let difference = (&total_debit - &total_credit).abs();

            let kind = if total_debit == zero && total_credit == zero {
                FindingKind::Degenerate
            } else if difference >= tolerance {
                FindingKind::Unbalanced
            } else {
                continue;
            };

            let message = match kind {
                FindingKind::Unbalanced => format!(
                    "entry #{} differs by {}: debits {} vs credits {}",
                    entry.entry_number, difference, total_debit, total_credit
                ),
                FindingKind::Degenerate => format!(
                    "entry #{} has no movement: all lines are zero",
                    entry.entry_number
                ),
            };

            findings.push(AuditFinding {
                entry_id: entry.id,
                entry_number: entry.entry_number,
                entry_date: entry.entry_date,
                description: entry.description,
                total_debit,
                total_credit,
                kind,
                message,
            });
        }

        let unbalanced = findings
            .iter()
            .filter(|f| f.kind == FindingKind::Unbalanced)
            .count();
        let errors = findings
            .iter()
            .filter(|f| f.kind == FindingKind::Degenerate)
            .count();

        if !findings.is_empty() {
            tracing::info!(
                company_id = %company_id,
                total,
                unbalanced,
                errors,
                "integrity scan found offending entries"
            );
        }

        Ok(AuditReport {
            total,
            unbalanced,
            errors,
            findings,
        })
    }
}
