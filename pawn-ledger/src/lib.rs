pub mod models;
pub mod ledger;
pub mod commands;

pub use models::{EntryKind, LedgerEntry, LedgerSummary};
pub use ledger::{Ledger, LedgerError};
pub use commands::{Command, Outcome};
