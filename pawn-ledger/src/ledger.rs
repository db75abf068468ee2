use pawn_catalog::{Amount, Device, DeviceError, Imei, MarkupPolicy};
use crate::models::{EntryKind, LedgerEntry, LedgerSummary};

/// The shop: owns every pledged device and keeps the running cash balance.
///
/// The balance is an accumulator. Pledges add the pledge price, sales add
/// the selling price, releases add nothing.
#[derive(Debug)]
pub struct Ledger {
    devices: Vec<Device>,
    balance: Amount,
    policy: MarkupPolicy,
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_policy(MarkupPolicy::default())
    }

    pub fn with_policy(policy: MarkupPolicy) -> Self {
        Self {
            devices: Vec::new(),
            balance: 0,
            policy,
            entries: Vec::new(),
        }
    }

    pub fn policy(&self) -> &MarkupPolicy {
        &self.policy
    }

    /// Take a device into inventory and pay out its pledge price
    pub fn pledge(&mut self, device: Device) {
        let imei = device.imei();
        let amount = device.pledge_price();

        if self.find(imei).is_some() {
            tracing::debug!("IMEI {} is already in the ledger, keeping both", imei);
        }

        self.balance = self.balance.saturating_add(amount);
        self.entries.push(LedgerEntry::pledge(imei, amount));
        self.devices.push(device);

        tracing::info!("Pledged device {} for {}", imei, amount);
    }

    /// Sell the first unsold device with this IMEI.
    ///
    /// Returns the amount received. Nothing changes on error.
    pub fn sell(&mut self, imei: Imei) -> Result<Amount, LedgerError> {
        let policy = self.policy;
        let device = self.devices.iter_mut()
            .find(|d| d.imei() == imei && !d.is_sold())
            .ok_or_else(|| {
                tracing::warn!("No unsold device with IMEI {}", imei);
                LedgerError::NotFound(imei)
            })?;

        let price = device.selling_price_with(&policy);
        device.mark_sold()?;

        self.balance = self.balance.saturating_add(price);
        self.entries.push(LedgerEntry::sale(imei, price));

        tracing::info!("Sold device {} for {}", imei, price);
        Ok(price)
    }

    /// Remove every unsold device with this IMEI.
    ///
    /// Returns how many were removed. The pledge is not refunded.
    pub fn release(&mut self, imei: Imei) -> Result<usize, LedgerError> {
        let before = self.devices.len();
        self.devices.retain(|d| d.imei() != imei || d.is_sold());
        let removed = before - self.devices.len();

        if removed == 0 {
            tracing::warn!("No releasable device with IMEI {}", imei);
            return Err(LedgerError::NotFound(imei));
        }

        for _ in 0..removed {
            self.entries.push(LedgerEntry::release(imei));
        }

        tracing::info!("Released {} device(s) with IMEI {}", removed, imei);
        Ok(removed)
    }

    /// Descriptions of unsold devices in pledge order
    pub fn list_available(&self) -> String {
        self.describe_where(|d| !d.is_sold())
    }

    /// Descriptions of sold devices in pledge order
    pub fn list_sold(&self) -> String {
        self.describe_where(|d| d.is_sold())
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// First device with this IMEI, sold or not
    pub fn find(&self, imei: Imei) -> Option<&Device> {
        self.devices.iter().find(|d| d.imei() == imei)
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn summary(&self) -> LedgerSummary {
        let total = |kind: EntryKind| -> Amount {
            self.entries.iter()
                .filter(|e| e.kind == kind)
                .fold(0, |acc: Amount, e| acc.saturating_add(e.amount))
        };
        let sold_count = self.devices.iter().filter(|d| d.is_sold()).count();

        LedgerSummary {
            balance: self.balance,
            pledged_total: total(EntryKind::Pledge),
            sales_total: total(EntryKind::Sale),
            available_count: self.devices.len() - sold_count,
            sold_count,
        }
    }

    fn describe_where(&self, predicate: impl Fn(&Device) -> bool) -> String {
        self.devices.iter()
            .filter(|d| predicate(d))
            .map(Device::describe)
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("No matching device with IMEI {0}")]
    NotFound(Imei),

    #[error(transparent)]
    Device(#[from] DeviceError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawn_catalog::DeviceKind;

    fn ids(text: &str) -> Vec<String> {
        text.lines()
            .filter_map(|line| line.strip_prefix("IMEI: "))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_pledge_adds_to_balance() {
        let mut ledger = Ledger::new();
        ledger.pledge(Device::phone(1, 100, "Samsung", true, true));
        ledger.pledge(Device::tablet(2, 250, "Apple", true, false));

        assert_eq!(ledger.balance(), 350);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ids(&ledger.list_available()), vec!["1", "2"]);
        assert!(ledger.list_sold().is_empty());

        let tablet = ledger.find(2).unwrap();
        assert_eq!(tablet.kind(), DeviceKind::Tablet { can_make_calls: false });
        assert!(tablet.allowed_for_sale());
    }

    #[test]
    fn test_sell_lifecycle() {
        let mut ledger = Ledger::new();
        ledger.pledge(Device::phone(1, 100, "Samsung", true, true));

        assert_eq!(ledger.sell(1), Ok(140));
        assert_eq!(ledger.balance(), 240);
        assert!(ledger.find(1).unwrap().is_sold());
        assert!(format!("{:?}", ledger).contains("balance: 240"));

        // Already sold
        assert_eq!(ledger.sell(1), Err(LedgerError::NotFound(1)));
        assert_eq!(ledger.balance(), 240);
    }

    #[test]
    fn test_sell_unknown() {
        let mut ledger = Ledger::new();
        ledger.pledge(Device::phone(1, 100, "Samsung", true, true));

        assert_eq!(ledger.sell(99), Err(LedgerError::NotFound(99)));
        assert_eq!(ledger.balance(), 100);
        assert_eq!(ledger.entries().len(), 1);
    }

    #[test]
    fn test_sell_not_allowed_leaves_state() {
        let mut ledger = Ledger::new();
        ledger.pledge(Device::phone(3, 50, "Nokia", false, true));

        let result = ledger.sell(3);
        assert_eq!(result, Err(LedgerError::Device(DeviceError::NotForSale(3))));
        assert_eq!(ledger.balance(), 50);
        assert!(!ledger.find(3).unwrap().is_sold());
        assert_eq!(ledger.entries().len(), 1);
    }

    #[test]
    fn test_sell_takes_first_unsold_duplicate() {
        let mut ledger = Ledger::new();
        ledger.pledge(Device::phone(5, 100, "First", true, true));
        ledger.pledge(Device::tablet(5, 200, "Second", true, false));

        assert_eq!(ledger.sell(5), Ok(140));
        assert_eq!(ledger.sell(5), Ok(260));
        assert_eq!(ledger.sell(5), Err(LedgerError::NotFound(5)));
        assert_eq!(ledger.balance(), 300 + 140 + 260);
    }

    #[test]
    fn test_release_removes_all_unsold_duplicates() {
        let mut ledger = Ledger::new();
        ledger.pledge(Device::phone(7, 100, "A", true, true));
        ledger.pledge(Device::phone(7, 100, "B", true, true));
        ledger.pledge(Device::phone(7, 100, "C", true, true));
        ledger.sell(7).unwrap();

        assert_eq!(ledger.release(7), Ok(2));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.find(7).unwrap().is_sold());
        assert_eq!(ledger.find(7).unwrap().manufacturer(), "A");
    }

    #[test]
    fn test_release_sold_fails() {
        let mut ledger = Ledger::new();
        ledger.pledge(Device::tablet(2, 200, "Apple", true, true));
        ledger.sell(2).unwrap();

        assert_eq!(ledger.release(2), Err(LedgerError::NotFound(2)));
        assert_eq!(ids(&ledger.list_sold()), vec!["2"]);
    }

    #[test]
    fn test_release_does_not_refund() {
        let mut ledger = Ledger::new();
        ledger.pledge(Device::phone(3, 50, "Nokia", false, true));

        assert_eq!(ledger.release(3), Ok(1));
        assert_eq!(ledger.balance(), 50);
        assert!(ledger.is_empty());
        assert_eq!(ledger.entries().last().unwrap().kind, EntryKind::Release);
    }

    #[test]
    fn test_custom_policy_pricing() {
        let policy = MarkupPolicy {
            phone_5g_markup_percent: 100,
            ..MarkupPolicy::default()
        };
        let mut ledger = Ledger::with_policy(policy);
        assert_eq!(ledger.policy(), &policy);
        assert_eq!(Ledger::new().policy(), &MarkupPolicy::default());
        ledger.pledge(Device::phone(1, 100, "Samsung", true, true));

        assert_eq!(ledger.sell(1), Ok(200));
        assert_eq!(ledger.balance(), 300);
    }

    #[test]
    fn test_balance_matches_journal() {
        let mut ledger = Ledger::new();
        ledger.pledge(Device::phone(1, 100, "Samsung", true, true));
        ledger.pledge(Device::tablet(2, 200, "Apple", true, false));
        ledger.pledge(Device::phone(3, 50, "Nokia", false, false));
        ledger.sell(1).unwrap();
        ledger.sell(3).unwrap_err();
        ledger.release(3).unwrap();

        let journal_total: Amount = ledger.entries().iter().map(|e| e.amount).sum();
        assert_eq!(journal_total, ledger.balance());

        let summary = ledger.summary();
        assert_eq!(summary.balance, 490);
        assert_eq!(summary.pledged_total, 350);
        assert_eq!(summary.sales_total, 140);
        assert_eq!(summary.available_count, 1);
        assert_eq!(summary.sold_count, 1);
    }

    #[test]
    fn test_lists_are_joined_descriptions() {
        let mut ledger = Ledger::new();
        let first = Device::phone(1, 10, "A", true, true);
        let second = Device::tablet(2, 20, "B", true, true);
        let expected = format!("{}\n{}", first.describe(), second.describe());
        ledger.pledge(first);
        ledger.pledge(second);

        assert_eq!(ledger.list_available(), expected);
    }
}
