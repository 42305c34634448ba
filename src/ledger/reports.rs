//! Financial statements derived from the trial balance
//!
//! Revenue and expense rows feed the income statement; asset, liability,
//! and equity rows feed the balance sheet. Revenue accounts normally
//! carry credit balances, so a revenue row's contribution is the
//! absolute value of its net balance; expense contributions are the net
//! debit as-is.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::{AccountType, TrialBalanceRow};

/// Income statement for a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub revenues: Vec<TrialBalanceRow>,
    pub expenses: Vec<TrialBalanceRow>,
    pub total_revenue: BigDecimal,
    pub total_expense: BigDecimal,
    pub net_income: BigDecimal,
}

/// Balance sheet as of the end of a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub assets: Vec<TrialBalanceRow>,
    pub liabilities: Vec<TrialBalanceRow>,
    pub equity: Vec<TrialBalanceRow>,
    pub net_income: BigDecimal,
}

/// Income statement and balance sheet bundled together, the way the
/// reporting views consume them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Financials {
    pub income_statement: IncomeStatement,
    pub balance_sheet: BalanceSheet,
}

/// Split trial-balance rows by account type into the two statements.
/// Pure function; the aggregator feeds it a fresh trial balance.
pub fn financials_from_trial_balance(rows: &[TrialBalanceRow]) -> Financials {
    let of_type = |t: AccountType| -> Vec<TrialBalanceRow> {
        rows.iter()
            .filter(|r| r.account_type == t)
            .cloned()
            .collect()
    };

    let revenues = of_type(AccountType::Revenue);
    let expenses = of_type(AccountType::Expense);

    let total_revenue: BigDecimal = revenues.iter().map(|r| r.net_balance.abs()).sum();
    let total_expense: BigDecimal = expenses.iter().map(|r| r.net_balance.clone()).sum();
    let net_income = &total_revenue - &total_expense;

    Financials {
        income_statement: IncomeStatement {
            revenues,
            expenses,
            total_revenue,
            total_expense,
            net_income: net_income.clone(),
        },
        balance_sheet: BalanceSheet {
            assets: of_type(AccountType::Asset),
            liabilities: of_type(AccountType::Liability),
            equity: of_type(AccountType::Equity),
            net_income,
        },
    }
}
