//! Basic journal usage example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use journal_core::{
    setup_standard_chart, validate_draft, DraftEntry, DraftLine, IntegrityAuditor,
    JournalPoster, LedgerAggregator, MemoryStore, PostingContext, ReceiptBond, SaleInvoice,
    SystemAccounts,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Journal Core - Basic Posting Example\n");

    let store = MemoryStore::new();
    let company_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    // 1. Set up the chart of accounts for the tenant
    println!("📊 Setting up Chart of Accounts...");
    let chart = setup_standard_chart(&store, company_id).await?;
    for account in &chart {
        println!(
            "  ✓ {} - {} ({:?})",
            account.code, account.name, account.account_type
        );
    }
    println!();

    let cash = chart.iter().find(|a| a.code == "1010").unwrap().id;
    let capital = chart.iter().find(|a| a.code == "3010").unwrap().id;
    let receivables = chart.iter().find(|a| a.code == "1100").unwrap().id;

    let poster = JournalPoster::new(store.clone());
    let accounts = SystemAccounts::default();

    // 2. Post a manual opening entry
    println!("💰 Posting transactions...\n");
    let opening = validate_draft(&DraftEntry {
        date: "2024-01-01".to_string(),
        description: "Initial owner investment".to_string(),
        lines: vec![
            DraftLine::debit(cash, 50000.0),
            DraftLine::credit(capital, 50000.0),
        ],
    })?;
    poster
        .post(company_id, user_id, opening, PostingContext::manual())
        .await?;
    println!("  ✓ Opening capital of 50,000 posted");

    // 3. Journalize a credit sale with 15% VAT through the adapter
    poster
        .post_sale_invoice(
            company_id,
            user_id,
            SaleInvoice {
                invoice_id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                description: "Invoice #1001 - goods sold on credit".to_string(),
                total: BigDecimal::from(1150),
                tax: BigDecimal::from(150),
                party_id: None,
            },
            &accounts,
        )
        .await?;
    println!("  ✓ Sale invoice of 1,150 (incl. 150 VAT) posted");

    // 4. Record the customer's partial payment
    poster
        .post_receipt_bond(
            company_id,
            user_id,
            ReceiptBond {
                bond_id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
                description: "Partial payment on invoice #1001".to_string(),
                amount: BigDecimal::from(500),
                party_id: None,
            },
            &accounts,
        )
        .await?;
    println!("  ✓ Receipt bond of 500 posted");

    // 5. Read the receivables ledger back
    let aggregator = LedgerAggregator::new(store.clone());
    println!("\n📖 Accounts Receivable ledger:");
    for row in aggregator.ledger(company_id, receivables, None, None).await? {
        println!(
            "  {} #{:<3} debit {:>8} credit {:>8} balance {:>8}",
            row.entry_date, row.entry_number, row.debit, row.credit, row.balance
        );
    }

    // 6. Trial balance and financial statements
    let trial_balance = aggregator.trial_balance(company_id, None, None).await?;
    println!("\n🔍 Trial Balance:");
    for row in &trial_balance {
        println!(
            "  {} {:<22} debit {:>8} credit {:>8} net {:>8}",
            row.code, row.name, row.total_debit, row.total_credit, row.net_balance
        );
    }

    let financials = aggregator.financials(company_id, None, None).await?;
    println!("\n💹 Net income: {}", financials.income_statement.net_income);

    // 7. Integrity scan
    let report = IntegrityAuditor::new(store).scan(company_id).await?;
    println!(
        "\n🔍 Integrity scan: {} entries, {} unbalanced, {} degenerate",
        report.total, report.unbalanced, report.errors
    );
    if report.is_clean() {
        println!("  ✅ Books are clean!");
    } else {
        for finding in &report.findings {
            println!("  ❌ {}", finding.message);
        }
    }

    Ok(())
}
