use serde::{Deserialize, Serialize};
use pawn_catalog::{Amount, Device, DeviceKind, Imei};
use crate::ledger::{Ledger, LedgerError};
use crate::models::LedgerSummary;

/// A validated request against the ledger.
///
/// Front ends parse and validate their own input, then hand one of these
/// to [`Ledger::execute`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Pledge {
        imei: Imei,
        price: Amount,
        manufacturer: String,
        allowed_for_sale: bool,
        kind: DeviceKind,
    },
    Sell {
        imei: Imei,
    },
    Release {
        imei: Imei,
    },
    ListAvailable,
    ListSold,
    Balance,
    Summary,
}

impl Command {
    pub fn pledge_phone(
        imei: Imei,
        price: Amount,
        manufacturer: impl Into<String>,
        allowed_for_sale: bool,
        supports_5g: bool,
    ) -> Self {
        Command::Pledge {
            imei,
            price,
            manufacturer: manufacturer.into(),
            allowed_for_sale,
            kind: DeviceKind::Phone { supports_5g },
        }
    }

    pub fn pledge_tablet(
        imei: Imei,
        price: Amount,
        manufacturer: impl Into<String>,
        allowed_for_sale: bool,
        can_make_calls: bool,
    ) -> Self {
        Command::Pledge {
            imei,
            price,
            manufacturer: manufacturer.into(),
            allowed_for_sale,
            kind: DeviceKind::Tablet { can_make_calls },
        }
    }
}

/// Result of a successfully executed command
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    Pledged { imei: Imei, balance: Amount },
    Sold { imei: Imei, price: Amount, balance: Amount },
    Released { imei: Imei, removed: usize },
    Listing { text: String },
    Balance { balance: Amount },
    Summary { summary: LedgerSummary },
}

impl Ledger {
    pub fn execute(&mut self, command: Command) -> Result<Outcome, LedgerError> {
        match command {
            Command::Pledge { imei, price, manufacturer, allowed_for_sale, kind } => {
                self.pledge(Device::new(imei, price, manufacturer, allowed_for_sale, kind));
                Ok(Outcome::Pledged { imei, balance: self.balance() })
            }
            Command::Sell { imei } => {
                let price = self.sell(imei)?;
                Ok(Outcome::Sold { imei, price, balance: self.balance() })
            }
            Command::Release { imei } => {
                let removed = self.release(imei)?;
                Ok(Outcome::Released { imei, removed })
            }
            Command::ListAvailable => Ok(Outcome::Listing { text: self.list_available() }),
            Command::ListSold => Ok(Outcome::Listing { text: self.list_sold() }),
            Command::Balance => Ok(Outcome::Balance { balance: self.balance() }),
            Command::Summary => Ok(Outcome::Summary { summary: self.summary() }),
        }
    }
}
