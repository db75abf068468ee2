use serde::{Deserialize, Serialize};
use crate::pricing::{Amount, MarkupPolicy};

/// IMEI-like device identifier. Unique by convention only.
pub type Imei = u64;

/// Variant-specific attributes of a pledged device
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceKind {
    Phone { supports_5g: bool },
    Tablet { can_make_calls: bool },
}

/// An electronic device held by the shop
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Device {
    imei: Imei,
    pledge_price: Amount,
    manufacturer: String,
    allowed_for_sale: bool,
    sold: bool,
    kind: DeviceKind,
}

impl Device {
    pub fn new(
        imei: Imei,
        pledge_price: Amount,
        manufacturer: impl Into<String>,
        allowed_for_sale: bool,
        kind: DeviceKind,
    ) -> Self {
        Self {
            imei,
            pledge_price,
            manufacturer: manufacturer.into(),
            allowed_for_sale,
            sold: false,
            kind,
        }
    }

    pub fn phone(
        imei: Imei,
        pledge_price: Amount,
        manufacturer: impl Into<String>,
        allowed_for_sale: bool,
        supports_5g: bool,
    ) -> Self {
        Self::new(
            imei,
            pledge_price,
            manufacturer,
            allowed_for_sale,
            DeviceKind::Phone { supports_5g },
        )
    }

    pub fn tablet(
        imei: Imei,
        pledge_price: Amount,
        manufacturer: impl Into<String>,
        allowed_for_sale: bool,
        can_make_calls: bool,
    ) -> Self {
        Self::new(
            imei,
            pledge_price,
            manufacturer,
            allowed_for_sale,
            DeviceKind::Tablet { can_make_calls },
        )
    }

    pub fn imei(&self) -> Imei {
        self.imei
    }

    pub fn pledge_price(&self) -> Amount {
        self.pledge_price
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn allowed_for_sale(&self) -> bool {
        self.allowed_for_sale
    }

    pub fn is_sold(&self) -> bool {
        self.sold
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Fields shared by every device kind, one per line
    pub fn describe_common(&self) -> String {
        format!(
            "IMEI: {}\nManufacturer: {}\nPrice of Pledge: {}\nAllowed for Sale: {}\nSold: {}",
            self.imei,
            self.manufacturer,
            self.pledge_price,
            yes_no(self.allowed_for_sale),
            yes_no(self.sold),
        )
    }

    /// Full multi-line description including the variant-specific field
    pub fn describe(&self) -> String {
        let extra = match self.kind {
            DeviceKind::Phone { supports_5g } => {
                format!("Supports 5G Network: {}", yes_no(supports_5g))
            }
            DeviceKind::Tablet { can_make_calls } => {
                format!("Can Make Phone Calls: {}", yes_no(can_make_calls))
            }
        };
        format!("{}\n{}", self.describe_common(), extra)
    }

    /// Price with no markup. Kind-specific pricing goes through `selling_price`.
    pub fn base_selling_price(&self) -> Amount {
        self.pledge_price
    }

    /// Selling price under the default markup rules
    pub fn selling_price(&self) -> Amount {
        self.selling_price_with(&MarkupPolicy::default())
    }

    /// Selling price under a given markup policy
    pub fn selling_price_with(&self, policy: &MarkupPolicy) -> Amount {
        let markup = match self.kind {
            DeviceKind::Phone { supports_5g: true } => policy.phone_5g_markup_percent,
            DeviceKind::Phone { supports_5g: false } => policy.phone_markup_percent,
            DeviceKind::Tablet { .. } => policy.tablet_markup_percent,
        };
        MarkupPolicy::apply(self.base_selling_price(), markup)
    }

    /// Transition: unsold → sold. Refused for devices not allowed for sale.
    ///
    /// Does not guard against selling twice; the ledger only offers unsold
    /// devices here.
    pub fn mark_sold(&mut self) -> Result<(), DeviceError> {
        if !self.allowed_for_sale {
            tracing::warn!("Device {} is not allowed for sale", self.imei);
            return Err(DeviceError::NotForSale(self.imei));
        }

        self.sold = true;
        Ok(())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("Device {0} is not allowed for sale")]
    NotForSale(Imei),
}
