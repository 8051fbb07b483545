//! Purchase history kept for the end-of-game report.

use serde::Serialize;

use crate::item::Item;

/// Where and for how much a purchased unit was later sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sale {
    pub island: String,
    pub price: i32,
}

/// A snapshot of one purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// The item as bought; `item.price` is what was paid.
    pub item: Item,
    /// Set exactly once, when the unit is sold.
    pub sale: Option<Sale>,
}

impl LedgerEntry {
    pub fn is_sold(&self) -> bool {
        self.sale.is_some()
    }

    /// Sale price minus purchase price, if sold.
    pub fn profit(&self) -> Option<i32> {
        self.sale.as_ref().map(|sale| sale.price - self.item.price)
    }
}

/// Append-only record of every purchase made during a game.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoodsLedger {
    entries: Vec<LedgerEntry>,
}

impl GoodsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a purchase.
    pub fn record_purchase(&mut self, item: &Item) {
        self.entries.push(LedgerEntry {
            item: item.clone(),
            sale: None,
        });
    }

    /// Mark the oldest unsold entry named `name` as sold.
    ///
    /// Returns false if no unsold entry with that name exists.
    pub fn record_sale(&mut self, name: &str, island: &str, price: i32) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|e| e.item.name == name && !e.is_sold())
        {
            Some(entry) => {
                entry.sale = Some(Sale {
                    island: island.to_string(),
                    price,
                });
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total realised profit over all sold entries.
    pub fn realised_profit(&self) -> i32 {
        self.entries.iter().filter_map(LedgerEntry::profit).sum()
    }

    /// The entry with the highest realised profit.
    pub fn best_trade(&self) -> Option<&LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.is_sold())
            .max_by_key(|e| e.profit())
    }

    /// The entry with the lowest realised profit.
    pub fn worst_trade(&self) -> Option<&LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.is_sold())
            .min_by_key(|e| e.profit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silk(price: i32) -> Item {
        Item::goods("Silk", "Bolts of silk", 1, 30).priced_at(price)
    }

    #[test]
    fn new_ledger_is_empty() {
        let ledger = GoodsLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.realised_profit(), 0);
    }

    #[test]
    fn sales_match_oldest_unsold_entry_first() {
        let mut ledger = GoodsLedger::new();
        ledger.record_purchase(&silk(30));
        ledger.record_purchase(&silk(35));

        assert!(ledger.record_sale("Silk", "Port Royal", 50));
        assert_eq!(
            ledger.entries()[0].sale,
            Some(Sale {
                island: "Port Royal".to_string(),
                price: 50
            })
        );
        assert!(!ledger.entries()[1].is_sold());

        assert!(ledger.record_sale("Silk", "Tortuga", 20));
        assert_eq!(ledger.entries()[1].sale.as_ref().map(|s| s.price), Some(20));
        assert_eq!(ledger.entries()[0].sale.as_ref().map(|s| s.price), Some(50));

        assert!(!ledger.record_sale("Silk", "Tortuga", 20));
    }

    #[test]
    fn unknown_name_sells_nothing() {
        let mut ledger = GoodsLedger::new();
        ledger.record_purchase(&silk(30));
        assert!(!ledger.record_sale("Rum", "Tortuga", 10));
        assert!(!ledger.entries()[0].is_sold());
    }

    #[test]
    fn best_and_worst_trades() {
        let mut ledger = GoodsLedger::new();
        ledger.record_purchase(&silk(30));
        ledger.record_purchase(&silk(30));
        ledger.record_purchase(&silk(30));
        ledger.record_sale("Silk", "A", 45);
        ledger.record_sale("Silk", "B", 20);

        assert_eq!(ledger.realised_profit(), 5);
        assert_eq!(ledger.best_trade().and_then(LedgerEntry::profit), Some(15));
        assert_eq!(ledger.worst_trade().and_then(LedgerEntry::profit), Some(-10));
    }
}
