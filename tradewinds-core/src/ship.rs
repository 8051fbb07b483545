//! The player's vessel and the pirates'.

use serde::Serialize;

use crate::item::{Item, WeaponStats};

/// A capacity-constrained hold with health and combat stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ship {
    pub name: String,
    max_health: i32,
    /// Never above `max_health`. Combat and storms may drive it to zero
    /// or below, which marks the ship as destroyed.
    health: i32,
    max_space: u32,
    /// Days are the route distance divided by this, rounded up.
    pub speed: u32,
    /// Ceiling of the damage-resist roll against each incoming shot.
    pub endurance: u32,
    pub crew: u32,
    cargo: Vec<Item>,
}

impl Ship {
    /// A ship at full health with an empty hold.
    pub fn new(
        name: &str,
        max_health: i32,
        max_space: u32,
        speed: u32,
        endurance: u32,
        crew: u32,
    ) -> Self {
        Self {
            name: name.to_string(),
            max_health,
            health: max_health,
            max_space,
            speed,
            endurance,
            crew,
            cargo: Vec::new(),
        }
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    /// Set health, clamped from above to `max_health`.
    pub fn set_health(&mut self, health: i32) {
        self.health = health.min(self.max_health);
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    pub fn is_damaged(&self) -> bool {
        self.health < self.max_health
    }

    /// Health points missing, counting a wreck as zero health.
    pub fn damage(&self) -> i32 {
        self.max_health - self.health.max(0)
    }

    pub fn max_space(&self) -> u32 {
        self.max_space
    }

    pub fn space_used(&self) -> u32 {
        self.cargo.iter().map(|item| item.size).sum()
    }

    pub fn space_free(&self) -> u32 {
        self.max_space.saturating_sub(self.space_used())
    }

    pub fn has_room_for(&self, item: &Item) -> bool {
        item.size <= self.space_free()
    }

    pub fn cargo(&self) -> &[Item] {
        &self.cargo
    }

    /// Stow an item. Rejected, leaving the hold untouched, if it would
    /// overflow.
    pub fn add_cargo(&mut self, item: Item) -> bool {
        if !self.has_room_for(&item) {
            return false;
        }
        self.cargo.push(item);
        true
    }

    /// Take out the first unit named `name`.
    pub fn remove_cargo(&mut self, name: &str) -> Option<Item> {
        let idx = self.cargo.iter().position(|item| item.name == name)?;
        Some(self.cargo.remove(idx))
    }

    /// Number of units named `name` in the hold.
    pub fn count_of(&self, name: &str) -> usize {
        self.cargo.iter().filter(|item| item.name == name).count()
    }

    /// Unload everything, returning what was aboard.
    pub fn empty_cargo(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.cargo)
    }

    /// Total catalog value of the hold.
    pub fn cargo_base_value(&self) -> i32 {
        self.cargo.iter().map(|item| item.base_price).sum()
    }

    /// Stats of every weapon in the hold.
    pub fn weapons(&self) -> impl Iterator<Item = WeaponStats> + '_ {
        self.cargo.iter().filter_map(Item::weapon_stats)
    }

    /// Can any weapon aboard roll a non-zero shot?
    pub fn is_armed(&self) -> bool {
        self.weapons().any(|w| w.shots > 0 && w.damage > 1)
    }
}
