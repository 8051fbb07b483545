//! The world a game is played in: goods, weapons, ship designs, islands and
//! routes, loaded from a JSON document.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::error::CatalogError;
use crate::geography::{Archipelago, Island, RouteRisk, Store};
use crate::item::{Item, WeaponStats};
use crate::ship::Ship;

/// The catalog bundled with the game.
const STANDARD_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    goods: Vec<GoodsEntry>,
    weapons: Vec<WeaponEntry>,
    ships: Vec<ShipEntry>,
    islands: Vec<IslandEntry>,
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GoodsEntry {
    name: String,
    #[serde(default)]
    description: String,
    size: u32,
    base_price: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WeaponEntry {
    name: String,
    #[serde(default)]
    description: String,
    size: u32,
    base_price: i32,
    shots: u32,
    damage: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShipEntry {
    name: String,
    max_health: i32,
    max_space: u32,
    speed: u32,
    endurance: u32,
    crew: u32,
    #[serde(default)]
    weapons: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IslandEntry {
    name: String,
    #[serde(default)]
    prices: BTreeMap<String, i32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RouteEntry {
    between: (String, String),
    distance: u32,
    pirate_danger: f64,
    weather_danger: f64,
    lost_sailors: f64,
}

/// A ship design. Every ship in play is built from one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipTemplate {
    pub name: String,
    pub max_health: i32,
    pub max_space: u32,
    pub speed: u32,
    pub endurance: u32,
    pub crew: u32,
    /// Weapons stowed aboard when the ship is launched.
    pub loadout: Vec<Item>,
}

impl ShipTemplate {
    /// A fresh ship at full health with its loadout aboard. Loadout that
    /// does not fit is left ashore.
    pub fn launch(&self) -> Ship {
        let mut ship = Ship::new(
            &self.name,
            self.max_health,
            self.max_space,
            self.speed,
            self.endurance,
            self.crew,
        );
        for weapon in &self.loadout {
            if !ship.add_cargo(weapon.clone()) {
                log::warn!("{} has no room for its {}", self.name, weapon.name);
            }
        }
        ship
    }
}

/// Read-only templates the engine is initialised from.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub goods: Vec<Item>,
    pub weapons: Vec<Item>,
    pub ships: Vec<ShipTemplate>,
    pub archipelago: Archipelago,
}

impl Catalog {
    /// The bundled catalog.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_json(STANDARD_CATALOG)
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::build(file)
    }

    /// Look up a good or weapon by name.
    pub fn item(&self, name: &str) -> Option<&Item> {
        self.goods
            .iter()
            .chain(self.weapons.iter())
            .find(|item| item.name == name)
    }

    fn build(file: CatalogFile) -> Result<Self, CatalogError> {
        if file.ships.is_empty() {
            return Err(CatalogError::Empty("ships"));
        }
        if file.islands.is_empty() {
            return Err(CatalogError::Empty("islands"));
        }

        let mut seen = HashSet::new();
        let mut goods = Vec::with_capacity(file.goods.len());
        for entry in file.goods {
            check_unique(&mut seen, "item", &entry.name)?;
            check_price(&entry.name, entry.base_price)?;
            goods.push(Item::goods(
                &entry.name,
                &entry.description,
                entry.size,
                entry.base_price,
            ));
        }
        let mut weapons = Vec::with_capacity(file.weapons.len());
        for entry in file.weapons {
            check_unique(&mut seen, "item", &entry.name)?;
            check_price(&entry.name, entry.base_price)?;
            weapons.push(Item::weapon(
                &entry.name,
                &entry.description,
                entry.size,
                entry.base_price,
                WeaponStats {
                    shots: entry.shots,
                    damage: entry.damage,
                },
            ));
        }

        let mut ship_names = HashSet::new();
        let mut ships = Vec::with_capacity(file.ships.len());
        for entry in file.ships {
            check_unique(&mut ship_names, "ship", &entry.name)?;
            if entry.max_health <= 0 {
                return Err(CatalogError::NotPositive(format!("{} max_health", entry.name)));
            }
            if entry.speed == 0 {
                return Err(CatalogError::NotPositive(format!("{} speed", entry.name)));
            }
            let loadout = entry
                .weapons
                .iter()
                .map(|weapon| {
                    weapons
                        .iter()
                        .find(|w| &w.name == weapon)
                        .cloned()
                        .ok_or_else(|| CatalogError::UnknownWeapon {
                            ship: entry.name.clone(),
                            weapon: weapon.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            ships.push(ShipTemplate {
                name: entry.name,
                max_health: entry.max_health,
                max_space: entry.max_space,
                speed: entry.speed,
                endurance: entry.endurance,
                crew: entry.crew,
                loadout,
            });
        }

        let mut island_names = HashSet::new();
        let mut archipelago = Archipelago::new();
        for entry in &file.islands {
            check_unique(&mut island_names, "island", &entry.name)?;
            if let Some(unknown) = entry
                .prices
                .keys()
                .find(|name| !goods.iter().chain(weapons.iter()).any(|i| &i.name == *name))
            {
                return Err(CatalogError::UnknownItem {
                    island: entry.name.clone(),
                    item: unknown.clone(),
                });
            }
            for (item, price) in &entry.prices {
                check_price(&format!("{} at {}", item, entry.name), *price)?;
            }
            // Catalog order, not map order, so every store lists goods first.
            let stock = goods
                .iter()
                .chain(weapons.iter())
                .filter_map(|item| entry.prices.get(&item.name).map(|p| item.priced_at(*p)))
                .collect();
            archipelago.add_island(Island::new(&entry.name, Store::new(stock)));
        }

        for entry in file.routes {
            let (from, to) = &entry.between;
            let a = archipelago
                .find_island(from)
                .ok_or_else(|| CatalogError::UnknownIsland(from.clone()))?;
            let b = archipelago
                .find_island(to)
                .ok_or_else(|| CatalogError::UnknownIsland(to.clone()))?;
            if a == b {
                return Err(CatalogError::SelfLoop(from.clone()));
            }
            if entry.distance == 0 {
                return Err(CatalogError::NotPositive(format!(
                    "route {} - {} distance",
                    from, to
                )));
            }
            for (field, value) in [
                ("pirate_danger", entry.pirate_danger),
                ("weather_danger", entry.weather_danger),
                ("lost_sailors", entry.lost_sailors),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(CatalogError::BadProbability {
                        from: from.clone(),
                        to: to.clone(),
                        field,
                        value,
                    });
                }
            }
            archipelago.add_route(
                a,
                b,
                entry.distance,
                RouteRisk {
                    pirates: entry.pirate_danger,
                    weather: entry.weather_danger,
                    lost_sailors: entry.lost_sailors,
                },
            );
        }

        Ok(Self {
            goods,
            weapons,
            ships,
            archipelago,
        })
    }
}

fn check_price(what: &str, price: i32) -> Result<(), CatalogError> {
    if price <= 0 {
        return Err(CatalogError::NotPositive(format!("{} price", what)));
    }
    Ok(())
}

fn check_unique(
    seen: &mut HashSet<String>,
    kind: &'static str,
    name: &str,
) -> Result<(), CatalogError> {
    if seen.insert(name.to_string()) {
        Ok(())
    } else {
        Err(CatalogError::Duplicate {
            kind,
            name: name.to_string(),
        })
    }
}
