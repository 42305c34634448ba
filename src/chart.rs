//! Standard chart-of-accounts setup for tenant onboarding

use uuid::Uuid;

use crate::traits::JournalStore;
use crate::types::{Account, AccountType, JournalResult};

/// Create the conventional small-business chart of accounts for a
/// tenant. The codes line up with the
/// [`SystemAccounts`](crate::journal::adapters::SystemAccounts) defaults
/// so the transaction adapters work out of the box; tenants can remap
/// codes later through chart configuration.
///
/// Accounts the adapters depend on are flagged as system accounts so the
/// store refuses to delete them.
pub async fn setup_standard_chart<S: JournalStore>(
    store: &S,
    company_id: Uuid,
) -> JournalResult<Vec<Account>> {
    let accounts = vec![
        // Assets
        Account::new(company_id, "1010", "Cash", AccountType::Asset).system(),
        Account::new(company_id, "1020", "Bank", AccountType::Asset),
        Account::new(company_id, "1100", "Accounts Receivable", AccountType::Asset).system(),
        Account::new(company_id, "1200", "Inventory", AccountType::Asset),
        Account::new(company_id, "1400", "VAT Recoverable", AccountType::Asset).system(),
        // Liabilities
        Account::new(company_id, "2010", "Accounts Payable", AccountType::Liability).system(),
        Account::new(company_id, "2020", "VAT Payable", AccountType::Liability).system(),
        // Equity
        Account::new(company_id, "3010", "Capital", AccountType::Equity),
        Account::new(company_id, "3020", "Retained Earnings", AccountType::Equity),
        // Revenue
        Account::new(company_id, "4010", "Sales Revenue", AccountType::Revenue).system(),
        Account::new(company_id, "4020", "Other Revenue", AccountType::Revenue),
        // Expenses
        Account::new(company_id, "5010", "General Expenses", AccountType::Expense).system(),
        Account::new(company_id, "5020", "Rent Expense", AccountType::Expense),
        Account::new(company_id, "5030", "Salaries Expense", AccountType::Expense),
    ];

    for account in &accounts {
        store.save_account(account).await?;
    }

    Ok(accounts)
}
