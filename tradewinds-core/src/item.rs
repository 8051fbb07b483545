//! Tradable goods and weapons.

use serde::{Deserialize, Serialize};

/// Combat stats carried by a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// How many times the weapon fires per turn.
    pub shots: u32,
    /// Exclusive ceiling of a single shot's raw damage.
    pub damage: u32,
}

/// What an item is used for once it is in the hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Goods,
    Weapon(WeaponStats),
}

/// A unit that can be bought, carried and sold.
///
/// Items are plain values: a store offer, a cargo unit and a ledger entry
/// are independent copies and never alias one another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    /// Cargo space the item occupies.
    pub size: u32,
    /// Price at the store this copy was taken from.
    pub price: i32,
    /// Catalog value, independent of any island.
    pub base_price: i32,
    pub kind: ItemKind,
}

impl Item {
    /// Create a trade good.
    pub fn goods(name: &str, description: &str, size: u32, base_price: i32) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            size,
            price: base_price,
            base_price,
            kind: ItemKind::Goods,
        }
    }

    /// Create a weapon.
    pub fn weapon(
        name: &str,
        description: &str,
        size: u32,
        base_price: i32,
        stats: WeaponStats,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            size,
            price: base_price,
            base_price,
            kind: ItemKind::Weapon(stats),
        }
    }

    /// A copy of this item priced for a particular store.
    pub fn priced_at(&self, price: i32) -> Self {
        Self {
            price,
            ..self.clone()
        }
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon(_))
    }

    pub fn weapon_stats(&self) -> Option<WeaponStats> {
        match self.kind {
            ItemKind::Weapon(stats) => Some(stats),
            ItemKind::Goods => None,
        }
    }
}
