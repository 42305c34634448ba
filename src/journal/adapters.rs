//! Transaction adapters: canonical journal lines from business events
//!
//! Every adapter follows the same shape: resolve the tenant's system
//! accounts by code, build the canonical legs, and submit through the
//! poster. Money-in debits an asset account and credits a liability or
//! revenue account of equal value; money-out mirrors it.
//!
//! A missing system account aborts the whole call before anything is
//! written. That is a chart-of-accounts configuration error, not a user
//! input error, and posting a partial entry instead would corrupt the
//! ledger.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::journal::draft::{CanonicalLine, ValidatedEntry};
use crate::journal::poster::{JournalPoster, PostingContext};
use crate::journal::validator::check_lines;
use crate::traits::JournalStore;
use crate::types::{Account, JournalError, JournalResult, ReferenceType};

/// Tenant-configurable codes for the accounts the adapters post against.
/// The defaults are the conventional small-business codes; tenants remap
/// them through chart-of-accounts setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemAccounts {
    pub cash: String,
    pub receivables: String,
    pub payables: String,
    pub tax_payable: String,
    pub tax_recoverable: String,
    pub sales_revenue: String,
    pub expenses: String,
}

impl Default for SystemAccounts {
    fn default() -> Self {
        Self {
            cash: "1010".to_string(),
            receivables: "1100".to_string(),
            payables: "2010".to_string(),
            tax_payable: "2020".to_string(),
            tax_recoverable: "1400".to_string(),
            sales_revenue: "4010".to_string(),
            expenses: "5010".to_string(),
        }
    }
}

/// A sale invoice to be journalized: debit receivables for the total
/// (tax inclusive), credit revenue for the pre-tax amount, credit the
/// tax liability for the tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleInvoice {
    pub invoice_id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    /// Invoice total including tax
    pub total: BigDecimal,
    /// Tax portion of the total
    pub tax: BigDecimal,
    pub party_id: Option<Uuid>,
}

/// A purchase invoice: the mirror of a sale. Debit the expense for the
/// pre-tax amount, debit recoverable tax, credit payables for the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseInvoice {
    pub invoice_id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub total: BigDecimal,
    pub tax: BigDecimal,
    pub party_id: Option<Uuid>,
}

/// Cash received from a customer: debit cash, credit receivables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptBond {
    pub bond_id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub amount: BigDecimal,
    pub party_id: Option<Uuid>,
}

/// Cash paid to a supplier: debit payables, credit cash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBond {
    pub bond_id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub amount: BigDecimal,
    pub party_id: Option<Uuid>,
}

/// An expense paid directly from cash: debit expenses, credit cash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensePayment {
    pub expense_id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub amount: BigDecimal,
}

impl<S: JournalStore> JournalPoster<S> {
    /// Journalize a sale invoice. Requires `total = revenue + tax`.
    pub async fn post_sale_invoice(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        invoice: SaleInvoice,
        accounts: &SystemAccounts,
    ) -> JournalResult<Uuid> {
        let zero = BigDecimal::from(0);
        if invoice.tax < zero || invoice.tax > invoice.total {
            return Err(JournalError::InvalidTaxSplit {
                total: invoice.total,
                tax: invoice.tax,
            });
        }
        let revenue = &invoice.total - &invoice.tax;

        let receivables = self
            .resolve(company_id, "receivables", &accounts.receivables)
            .await?;
        let sales = self
            .resolve(company_id, "sales revenue", &accounts.sales_revenue)
            .await?;
        let tax_payable = self
            .resolve(company_id, "tax payable", &accounts.tax_payable)
            .await?;

        let mut lines = vec![
            debit_line(receivables.id, invoice.total.clone(), invoice.party_id),
            credit_line(sales.id, revenue, None),
        ];
        if invoice.tax > zero {
            lines.push(credit_line(tax_payable.id, invoice.tax, None));
        }

        self.post_lines(
            company_id,
            user_id,
            invoice.date,
            invoice.description,
            lines,
            PostingContext::for_reference(ReferenceType::Sale, invoice.invoice_id),
        )
        .await
    }

    /// Journalize a purchase invoice, mirroring the sale rules.
    pub async fn post_purchase_invoice(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        invoice: PurchaseInvoice,
        accounts: &SystemAccounts,
    ) -> JournalResult<Uuid> {
        let zero = BigDecimal::from(0);
        if invoice.tax < zero || invoice.tax > invoice.total {
            return Err(JournalError::InvalidTaxSplit {
                total: invoice.total,
                tax: invoice.tax,
            });
        }
        let net = &invoice.total - &invoice.tax;

        let expenses = self
            .resolve(company_id, "expenses", &accounts.expenses)
            .await?;
        let tax_recoverable = self
            .resolve(company_id, "tax recoverable", &accounts.tax_recoverable)
            .await?;
        let payables = self
            .resolve(company_id, "payables", &accounts.payables)
            .await?;

        let mut lines = vec![debit_line(expenses.id, net, None)];
        if invoice.tax > zero {
            lines.push(debit_line(tax_recoverable.id, invoice.tax.clone(), None));
        }
        lines.push(credit_line(
            payables.id,
            invoice.total.clone(),
            invoice.party_id,
        ));

        self.post_lines(
            company_id,
            user_id,
            invoice.date,
            invoice.description,
            lines,
            PostingContext::for_reference(ReferenceType::Purchase, invoice.invoice_id),
        )
        .await
    }

    /// Journalize cash received from a customer.
    pub async fn post_receipt_bond(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        bond: ReceiptBond,
        accounts: &SystemAccounts,
    ) -> JournalResult<Uuid> {
        let cash = self.resolve(company_id, "cash", &accounts.cash).await?;
        let receivables = self
            .resolve(company_id, "receivables", &accounts.receivables)
            .await?;

        self.post_lines(
            company_id,
            user_id,
            bond.date,
            bond.description,
            vec![
                debit_line(cash.id, bond.amount.clone(), None),
                credit_line(receivables.id, bond.amount, bond.party_id),
            ],
            PostingContext::for_reference(ReferenceType::Receipt, bond.bond_id),
        )
        .await
    }

    /// Journalize cash paid to a supplier.
    pub async fn post_payment_bond(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        bond: PaymentBond,
        accounts: &SystemAccounts,
    ) -> JournalResult<Uuid> {
        let payables = self
            .resolve(company_id, "payables", &accounts.payables)
            .await?;
        let cash = self.resolve(company_id, "cash", &accounts.cash).await?;

        self.post_lines(
            company_id,
            user_id,
            bond.date,
            bond.description,
            vec![
                debit_line(payables.id, bond.amount.clone(), bond.party_id),
                credit_line(cash.id, bond.amount, None),
            ],
            PostingContext::for_reference(ReferenceType::Payment, bond.bond_id),
        )
        .await
    }

    /// Journalize an expense paid from cash.
    pub async fn post_expense_payment(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        expense: ExpensePayment,
        accounts: &SystemAccounts,
    ) -> JournalResult<Uuid> {
        let expenses = self
            .resolve(company_id, "expenses", &accounts.expenses)
            .await?;
        let cash = self.resolve(company_id, "cash", &accounts.cash).await?;

        self.post_lines(
            company_id,
            user_id,
            expense.date,
            expense.description,
            vec![
                debit_line(expenses.id, expense.amount.clone(), None),
                credit_line(cash.id, expense.amount, None),
            ],
            PostingContext::for_reference(ReferenceType::Expense, expense.expense_id),
        )
        .await
    }

    async fn resolve(
        &self,
        company_id: Uuid,
        role: &str,
        code: &str,
    ) -> JournalResult<Account> {
        self.store()
            .find_account_by_code(company_id, code)
            .await?
            .ok_or_else(|| JournalError::MissingSystemAccount {
                role: role.to_string(),
                code: code.to_string(),
            })
    }

    async fn post_lines(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
        description: String,
        lines: Vec<CanonicalLine>,
        ctx: PostingContext,
    ) -> JournalResult<Uuid> {
        let (total_debit, total_credit) = check_lines(&lines)?;
        let entry = ValidatedEntry {
            date,
            description,
            lines,
            total_debit,
            total_credit,
        };
        self.post(company_id, user_id, entry, ctx).await
    }
}

fn debit_line(account_id: Uuid, amount: BigDecimal, party_id: Option<Uuid>) -> CanonicalLine {
    CanonicalLine {
        account_id,
        debit: amount,
        credit: BigDecimal::from(0),
        description: None,
        party_id,
    }
}

fn credit_line(account_id: Uuid, amount: BigDecimal, party_id: Option<Uuid>) -> CanonicalLine {
    CanonicalLine {
        account_id,
        debit: BigDecimal::from(0),
        credit: amount,
        description: None,
        party_id,
    }
}
