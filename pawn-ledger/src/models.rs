use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use pawn_catalog::{Amount, Imei};

/// What a journal entry records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// Cash paid out against a pledged device
    Pledge,
    /// Cash received for a sold device
    Sale,
    /// Device handed back. Carries no amount.
    Release,
}

/// One movement on the shop's running balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub imei: Imei,
    pub kind: EntryKind,
    pub amount: Amount,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(imei: Imei, kind: EntryKind, amount: Amount) -> Self {
        Self {
            id: Uuid::new_v4(),
            imei,
            kind,
            amount,
            created_at: Utc::now(),
        }
    }

    pub fn pledge(imei: Imei, amount: Amount) -> Self {
        Self::new(imei, EntryKind::Pledge, amount)
    }

    pub fn sale(imei: Imei, amount: Amount) -> Self {
        Self::new(imei, EntryKind::Sale, amount)
    }

    /// Releases never refund the pledge
    pub fn release(imei: Imei) -> Self {
        Self::new(imei, EntryKind::Release, 0)
    }
}

/// Point-in-time totals for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerSummary {
    pub balance: Amount,
    pub pledged_total: Amount,
    pub sales_total: Amount,
    pub available_count: usize,
    pub sold_count: usize,
}
