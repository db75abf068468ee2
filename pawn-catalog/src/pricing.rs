use serde::{Deserialize, Serialize};

/// Whole currency units. Pledges and sales never go negative.
pub type Amount = u64;

/// Flat markup rules applied over the pledge price when a device is sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupPolicy {
    /// Markup for phones that support 5G networks (percent)
    #[serde(default = "default_phone_5g_markup")]
    pub phone_5g_markup_percent: u32,

    /// Markup for phones without 5G (percent)
    #[serde(default = "default_phone_markup")]
    pub phone_markup_percent: u32,

    /// Markup for tablets, regardless of calling capability (percent)
    #[serde(default = "default_tablet_markup")]
    pub tablet_markup_percent: u32,
}

fn default_phone_5g_markup() -> u32 { 40 }
fn default_phone_markup() -> u32 { 30 }
fn default_tablet_markup() -> u32 { 30 }

impl Default for MarkupPolicy {
    fn default() -> Self {
        Self {
            phone_5g_markup_percent: default_phone_5g_markup(),
            phone_markup_percent: default_phone_markup(),
            tablet_markup_percent: default_tablet_markup(),
        }
    }
}

impl MarkupPolicy {
    /// Apply a percentage markup to a base price.
    ///
    /// Integer arithmetic, truncating toward zero. Saturates instead of
    /// wrapping on absurdly large prices.
    pub fn apply(base_price: Amount, markup_percent: u32) -> Amount {
        let factor = 100 + u128::from(markup_percent);
        let marked_up = u128::from(base_price) * factor / 100;
        Amount::try_from(marked_up).unwrap_or(Amount::MAX)
    }
}
