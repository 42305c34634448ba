//! # Journal Core
//!
//! A multi-tenant double-entry journal engine: posting validation,
//! atomic submission, ledger/trial-balance aggregation, and integrity
//! auditing over a storage-agnostic persistence trait.
//!
//! ## Features
//!
//! - **Pre-flight validation**: line purity, minimum lines, and the
//!   balance invariant checked before any I/O
//! - **Atomic posting**: one header plus all lines persist together or
//!   not at all, with per-tenant sequential entry numbers and
//!   reference-based idempotency
//! - **Transaction adapters**: sale/purchase invoices, receipt/payment
//!   bonds, and expense payments journalized against tenant-configured
//!   system accounts
//! - **Read-side aggregation**: per-account ledgers with running
//!   balances, exhaustive trial balances, financial statements, and
//!   monthly performance series
//! - **Integrity auditing**: batch detection of unbalanced and
//!   degenerate entries, reported as data for human review
//! - **Storage abstraction**: database-agnostic design with a
//!   trait-based store
//!
//! ## Quick Start
//!
//! ```rust
//! use journal_core::{
//!     setup_standard_chart, validate_draft, DraftEntry, DraftLine, JournalPoster,
//!     MemoryStore, PostingContext,
//! };
//! use uuid::Uuid;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> journal_core::JournalResult<()> {
//! let store = MemoryStore::new();
//! let company_id = Uuid::new_v4();
//! let chart = setup_standard_chart(&store, company_id).await?;
//! let cash = chart.iter().find(|a| a.code == "1010").unwrap().id;
//! let sales = chart.iter().find(|a| a.code == "4010").unwrap().id;
//!
//! let entry = validate_draft(&DraftEntry {
//!     date: "2024-01-10".to_string(),
//!     description: "Cash sale of goods".to_string(),
//!     lines: vec![DraftLine::debit(cash, 500.0), DraftLine::credit(sales, 500.0)],
//! })?;
//!
//! let poster = JournalPoster::new(store);
//! poster
//!     .post(company_id, Uuid::new_v4(), entry, PostingContext::manual())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod chart;
pub mod journal;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use audit::*;
pub use chart::*;
pub use journal::*;
pub use ledger::*;
pub use traits::*;
pub use types::*;
pub use utils::*;
