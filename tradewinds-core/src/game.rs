//! The authoritative game state and every player command.

use std::fmt;
use std::ops::Range;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Catalog, ShipTemplate};
use crate::combat::{resolve_battle, Battle, BattleOutcome};
use crate::config::GameConfig;
use crate::encounter::{roll_encounters, EncounterKind, EncounterOutcome};
use crate::error::SetupError;
use crate::geography::{Archipelago, Island, IslandId, Route, RouteId, Store};
use crate::item::Item;
use crate::ledger::{GoodsLedger, LedgerEntry};
use crate::ship::Ship;

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndReason {
    KilledByPirates,
    ShipDestroyedInStorm,
    OutOfDays,
    Stranded,
    Retired,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::KilledByPirates => write!(f, "Killed by Pirates"),
            EndReason::ShipDestroyedInStorm => write!(f, "Ship destroyed in storm"),
            EndReason::OutOfDays => write!(f, "Out of days"),
            EndReason::Stranded => write!(f, "Stranded"),
            EndReason::Retired => write!(f, "Retired"),
        }
    }
}

/// Why a checked departure was refused. Nothing changes on refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TravelRefusal {
    #[error("The game is over.")]
    GameOver,
    #[error("That route does not leave this island.")]
    NoSuchRoute,
    #[error("There aren't enough days left to take that route.")]
    NotEnoughDays,
    #[error("Your ship must be fully repaired before setting sail.")]
    ShipDamaged,
    #[error("You can't afford to pay your crew for that route.")]
    NotEnoughGold,
}

/// A completed crossing and everything that happened on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voyage {
    pub route: RouteId,
    pub from: IslandId,
    pub to: IslandId,
    pub days: u32,
    /// Gold paid out in wages.
    pub wages: i32,
    pub encounters: Vec<EncounterOutcome>,
}

/// A world chosen and a purse filled, waiting for the captain's name, the
/// length of the game and a ship.
#[derive(Debug, Clone)]
pub struct GameSetup {
    catalog: Catalog,
    config: GameConfig,
    island: IslandId,
}

impl GameSetup {
    pub fn new(catalog: Catalog, config: GameConfig) -> Result<Self, SetupError> {
        let island = IslandId(config.starting_island);
        if catalog.archipelago.island(island).is_none() {
            return Err(SetupError::UnknownIsland(config.starting_island));
        }
        Ok(Self {
            catalog,
            config,
            island,
        })
    }

    pub fn ship_choices(&self) -> &[ShipTemplate] {
        &self.catalog.ships
    }

    pub fn starting_island(&self) -> IslandId {
        self.island
    }

    pub fn starting_gold(&self) -> i32 {
        self.config.starting_gold
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Validate the player's choices and start the game.
    pub fn finish(self, name: &str, days: u32, ship: usize) -> Result<GameState, SetupError> {
        let config = &self.config;
        let name_len = name.chars().count();
        if name_len < config.min_name_len
            || name_len > config.max_name_len
            || !name.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(SetupError::InvalidName {
                min: config.min_name_len,
                max: config.max_name_len,
            });
        }
        if days < config.min_days || days > config.max_days {
            return Err(SetupError::DaysOutOfRange {
                min: config.min_days,
                max: config.max_days,
            });
        }
        let ship = self
            .catalog
            .ships
            .get(ship)
            .ok_or(SetupError::UnknownShip(ship))?
            .launch();

        log::info!(
            "{} sets out from {} aboard the {} with {} gold and {} days",
            name,
            self.catalog.archipelago.islands()[self.island.0].name,
            ship.name,
            self.config.starting_gold,
            days
        );

        Ok(GameState {
            player: name.to_string(),
            island: self.island,
            gold: self.config.starting_gold,
            starting_gold: self.config.starting_gold,
            days: days as i32,
            start_days: days,
            ship,
            ledger: GoodsLedger::new(),
            end_reason: None,
            catalog: self.catalog,
            config: self.config,
        })
    }
}

/// The single authoritative model of a game in progress.
#[derive(Debug, Clone)]
pub struct GameState {
    catalog: Catalog,
    config: GameConfig,
    player: String,
    island: IslandId,
    ship: Ship,
    /// May dip below zero if travel is forced without the checks.
    gold: i32,
    starting_gold: i32,
    days: i32,
    start_days: u32,
    ledger: GoodsLedger,
    end_reason: Option<EndReason>,
}

impl GameState {
    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn gold(&self) -> i32 {
        self.gold
    }

    pub fn days(&self) -> i32 {
        self.days
    }

    pub fn start_days(&self) -> u32 {
        self.start_days
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn cargo(&self) -> &[Item] {
        self.ship.cargo()
    }

    pub fn goods(&self) -> &GoodsLedger {
        &self.ledger
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn archipelago(&self) -> &Archipelago {
        &self.catalog.archipelago
    }

    pub fn island_id(&self) -> IslandId {
        self.island
    }

    pub fn island(&self) -> &Island {
        &self.catalog.archipelago.islands()[self.island.0]
    }

    pub fn store(&self) -> &Store {
        &self.island().store
    }

    /// Routes leaving the current island.
    pub fn routes(&self) -> Vec<(RouteId, &Route)> {
        self.archipelago().routes_from(self.island).collect()
    }

    /// Days the current ship needs for a route.
    pub fn route_days(&self, route: &Route) -> u32 {
        route.days(self.ship.speed)
    }

    /// Crew wages for a route.
    pub fn route_wages(&self, route: &Route) -> f64 {
        f64::from(self.route_days(route)) * f64::from(self.ship.crew) * self.config.wage_modifier
    }

    pub fn repair_cost(&self) -> i32 {
        self.ship.damage() * self.config.repair_cost_per_point
    }

    pub fn can_afford_route(&self, route: RouteId) -> bool {
        self.archipelago()
            .route(route)
            .is_some_and(|r| f64::from(self.gold) >= self.route_wages(r))
    }

    pub fn is_time_for_route(&self, route: RouteId) -> bool {
        self.archipelago()
            .route(route)
            .is_some_and(|r| self.days >= self.route_days(r) as i32)
    }

    pub fn is_over(&self) -> bool {
        self.end_reason.is_some() || self.days <= 0
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self.end_reason {
            Some(reason) => Some(reason),
            None if self.days <= 0 => Some(EndReason::OutOfDays),
            None => None,
        }
    }

    /// Gold the hold would fetch if sold to the local store.
    pub fn sellable_value(&self) -> i32 {
        self.cargo()
            .iter()
            .filter_map(|item| self.store().price_of(&item.name))
            .sum()
    }

    /// No route from here can be taken, even after selling the hold and
    /// paying for repairs.
    pub fn is_stranded(&self) -> bool {
        let mut purse = self.gold + self.sellable_value();
        if self.ship.is_damaged() {
            let cost = self.repair_cost();
            if purse <= cost {
                return true;
            }
            purse -= cost;
        }
        !self.routes().iter().any(|(id, route)| {
            self.is_time_for_route(*id) && f64::from(purse) >= self.route_wages(route)
        })
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Buy one unit at the item's price.
    pub fn buy_item(&mut self, item: &Item) -> bool {
        if self.gold < item.price || !self.ship.add_cargo(item.clone()) {
            log::debug!("could not buy {} for {}", item.name, item.price);
            return false;
        }
        self.gold -= item.price;
        self.ledger.record_purchase(item);
        log::info!("bought {} for {} gold", item.name, item.price);
        true
    }

    /// Sell one unit from the hold at the item's price.
    pub fn sell_item(&mut self, item: &Item) -> bool {
        if self.ship.remove_cargo(&item.name).is_none() {
            log::debug!("no {} aboard to sell", item.name);
            return false;
        }
        self.gold += item.price;
        let island = self.island().name.clone();
        self.ledger.record_sale(&item.name, &island, item.price);
        log::info!("sold {} for {} gold at {}", item.name, item.price, island);
        true
    }

    /// Buy one unit of `name` from the local store.
    pub fn buy_from_store(&mut self, name: &str) -> bool {
        match self.store().offer(name).cloned() {
            Some(item) => self.buy_item(&item),
            None => false,
        }
    }

    /// Sell one unit of `name` to the local store at its local price.
    pub fn sell_to_store(&mut self, name: &str) -> bool {
        match self.store().offer(name).cloned() {
            Some(item) => self.sell_item(&item),
            None => false,
        }
    }

    /// Restore the hull to full health. Requires strictly more gold than the
    /// repair costs.
    pub fn repair_ship(&mut self) -> bool {
        let cost = self.repair_cost();
        if self.gold <= cost {
            log::debug!("repairs cost {}, only {} gold aboard", cost, self.gold);
            return false;
        }
        self.gold -= cost;
        self.ship.set_health(self.ship.max_health());
        log::info!("repaired {} for {} gold", self.ship.name, cost);
        true
    }

    /// Sail a route from the current island, paying its days and wages.
    ///
    /// Affordability and time are not checked; gold and days may go
    /// negative. Returns false, changing nothing, only for a route that
    /// does not touch the current island.
    pub fn travel_route(&mut self, route: RouteId) -> bool {
        let Some(r) = self.archipelago().route(route) else {
            return false;
        };
        if !r.touches(self.island) {
            return false;
        }
        let days = self.route_days(r);
        let wages = self.route_wages(r);
        let to = r.other_end(self.island);

        self.days -= days as i32;
        self.gold = (f64::from(self.gold) - wages) as i32;
        self.island = to;
        log::info!(
            "sailed to {} in {} days, {} days left",
            self.island().name,
            days,
            self.days
        );
        true
    }

    /// Checked travel: depart only if the route is open to us, then resolve
    /// whatever the crossing brings.
    pub fn set_sail(
        &mut self,
        route: RouteId,
        rng: &mut dyn RngCore,
    ) -> Result<Voyage, TravelRefusal> {
        if self.is_over() {
            return Err(TravelRefusal::GameOver);
        }
        let Some(r) = self.archipelago().route(route).cloned() else {
            return Err(TravelRefusal::NoSuchRoute);
        };
        if !r.touches(self.island) {
            return Err(TravelRefusal::NoSuchRoute);
        }
        if !self.is_time_for_route(route) {
            return Err(TravelRefusal::NotEnoughDays);
        }
        if self.ship.is_damaged() {
            return Err(TravelRefusal::ShipDamaged);
        }
        if !self.can_afford_route(route) {
            return Err(TravelRefusal::NotEnoughGold);
        }

        let from = self.island;
        let gold_before = self.gold;
        let days = self.route_days(&r);
        self.travel_route(route);
        let wages = gold_before - self.gold;

        let mut encounters = Vec::new();
        for kind in roll_encounters(&r.risk, self.config.encounter_policy, rng) {
            let outcome = self.resolve_encounter(kind, rng);
            encounters.push(outcome);
            if outcome.ends_game() {
                break;
            }
        }

        Ok(Voyage {
            route,
            from,
            to: self.island,
            days,
            wages,
            encounters,
        })
    }

    /// Resolve one encounter and apply all of its consequences.
    pub fn resolve_encounter(
        &mut self,
        kind: EncounterKind,
        rng: &mut dyn RngCore,
    ) -> EncounterOutcome {
        log::info!("{}", kind);
        let outcome = match kind {
            EncounterKind::Pirates => {
                let battle = self.pirate_battle(rng);
                if !self.ship.is_destroyed() {
                    EncounterOutcome::PiratesRepelled {
                        damage_taken: battle.damage_taken,
                    }
                } else {
                    let confiscated_value = self.ship.cargo_base_value();
                    if self.pirate_loss_outcome() {
                        EncounterOutcome::PiratesSatisfied {
                            damage_taken: battle.damage_taken,
                            confiscated_value,
                        }
                    } else {
                        self.lose_gold();
                        self.end_game(EndReason::KilledByPirates);
                        EncounterOutcome::PiratesUnsatisfied {
                            damage_taken: battle.damage_taken,
                            confiscated_value,
                        }
                    }
                }
            }
            EncounterKind::Weather => {
                let damage = self.weather_event(rng);
                if self.ship.is_destroyed() {
                    self.lose_gold();
                    self.ship.empty_cargo();
                    self.end_game(EndReason::ShipDestroyedInStorm);
                    EncounterOutcome::StormSankShip { damage }
                } else {
                    EncounterOutcome::StormWeathered { damage }
                }
            }
            EncounterKind::LostSailors => EncounterOutcome::SailorsRescued {
                reward: self.sailor_event(rng),
            },
        };
        log::info!("{}", outcome);
        outcome
    }

    /// Fight a pirate ship drawn at random from the catalog.
    pub fn pirate_battle(&mut self, rng: &mut dyn RngCore) -> Battle {
        let Some(template) = self.catalog.ships.choose(rng) else {
            return Battle {
                outcome: BattleOutcome::Stalemate,
                rounds: 0,
                damage_taken: 0,
                damage_dealt: 0,
            };
        };
        let mut pirate = template.launch();
        let battle = resolve_battle(
            &mut self.ship,
            &mut pirate,
            self.config.max_combat_rounds,
            rng,
        );
        log::info!(
            "battle with a pirate {}: {:?} after {} rounds, {} damage taken, {} dealt",
            pirate.name,
            battle.outcome,
            battle.rounds,
            battle.damage_taken,
            battle.damage_dealt
        );
        battle
    }

    /// Fight pirates, returning the damage the player's ship took.
    pub fn pirate_event(&mut self, rng: &mut dyn RngCore) -> i32 {
        self.pirate_battle(rng).damage_taken
    }

    /// Storm damage straight to the hull, returning the damage.
    pub fn weather_event(&mut self, rng: &mut dyn RngCore) -> i32 {
        let damage = roll_in(&self.config.weather_damage, rng);
        self.ship.set_health(self.ship.health() - damage);
        damage
    }

    /// Rescue reward straight to the purse, returning the reward.
    pub fn sailor_event(&mut self, rng: &mut dyn RngCore) -> i32 {
        let reward = roll_in(&self.config.sailor_reward, rng);
        self.gold += reward;
        reward
    }

    /// Hand the hold to victorious pirates. True if they are satisfied with
    /// it and let the crew live.
    pub fn pirate_loss_outcome(&mut self) -> bool {
        self.surrender_cargo() > self.config.pirate_cargo_threshold
    }

    fn surrender_cargo(&mut self) -> i32 {
        let value = self.ship.cargo_base_value();
        self.ship.empty_cargo();
        value
    }

    pub fn lose_gold(&mut self) {
        self.gold = 0;
    }

    /// End the game now. The first reason given sticks.
    pub fn end_game(&mut self, reason: EndReason) {
        self.days = self.days.min(0);
        if self.end_reason.is_none() {
            log::info!("game over: {}", reason);
            self.end_reason = Some(reason);
        }
    }

    // ------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            player: self.player.clone(),
            ship: self.ship.name.clone(),
            island: self.island().name.clone(),
            start_days: self.start_days,
            days_elapsed: self.start_days as i32 - self.days.max(0),
            starting_gold: self.starting_gold,
            final_gold: self.gold,
            profit: self.gold - self.starting_gold,
            goods: self.ledger.entries().to_vec(),
            trade_profit: self.ledger.realised_profit(),
            best_trade: self.ledger.best_trade().cloned(),
            worst_trade: self.ledger.worst_trade().cloned(),
            end_reason: self.end_reason().map(|r| r.to_string()),
        }
    }
}

/// Uniform roll in `range`; its start when the range is empty.
fn roll_in(range: &Range<i32>, rng: &mut dyn RngCore) -> i32 {
    if range.is_empty() {
        range.start
    } else {
        rng.gen_range(range.clone())
    }
}

/// End-of-game report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub player: String,
    pub ship: String,
    /// Where the game ended.
    pub island: String,
    pub start_days: u32,
    pub days_elapsed: i32,
    pub starting_gold: i32,
    pub final_gold: i32,
    pub profit: i32,
    pub goods: Vec<LedgerEntry>,
    /// Sale price minus purchase price over every unit sold.
    pub trade_profit: i32,
    pub best_trade: Option<LedgerEntry>,
    pub worst_trade: Option<LedgerEntry>,
    pub end_reason: Option<String>,
}
