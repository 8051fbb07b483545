use std::fmt;

use rand::RngCore;
use serde::Serialize;

pub mod catalog;
pub mod combat;
pub mod config;
pub mod encounter;
pub mod error;
pub mod game;
pub mod geography;
pub mod item;
pub mod ledger;
pub mod ship;

pub use catalog::{Catalog, ShipTemplate};
pub use config::GameConfig;
pub use encounter::{EncounterKind, EncounterOutcome, EncounterPolicy};
pub use error::{CatalogError, ConfigError, SetupError};
pub use game::{EndReason, GameSetup, GameState, GameSummary, TravelRefusal, Voyage};
pub use geography::{IslandId, RouteId};
pub use item::Item;

/// A counter of how a captain's orders were answered over a game.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderTally {
    pub purchases: u32,
    pub sales: u32,
    pub repairs: u32,
    pub voyages: u32,
    pub refusals: u32,
}

impl OrderTally {
    pub fn record(&mut self, order: &Order, accepted: bool) {
        if !accepted {
            self.refusals += 1;
            return;
        }
        match order {
            Order::Buy(_) => self.purchases += 1,
            Order::Sell(_) => self.sales += 1,
            Order::Repair => self.repairs += 1,
            Order::Sail(_) => self.voyages += 1,
            Order::Retire => {}
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "bought: {}, sold: {}, repaired: {}, sailed: {}, refused: {}",
            self.purchases, self.sales, self.repairs, self.voyages, self.refusals
        )
    }
}

/// A single command a captain gives the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Order {
    Buy(String),
    Sell(String),
    Repair,
    Sail(RouteId),
    Retire,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Buy(name) => write!(f, "buy {}", name),
            Order::Sell(name) => write!(f, "sell {}", name),
            Order::Repair => write!(f, "repair"),
            Order::Sail(route) => write!(f, "sail route {}", route.0),
            Order::Retire => write!(f, "retire"),
        }
    }
}

/// Core trait that every scripted player implements.
pub trait Captain {
    fn name(&self) -> &'static str;
    fn command(&self, game: &GameState) -> Order;
}

/// One turn of a game: the order given and what came of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnSummary {
    pub turn: u32,
    pub order: Order,
    pub accepted: bool,
    pub voyage: Option<Voyage>,
}

/// Everything that happened while a captain had the helm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoyageReport {
    pub captain: &'static str,
    pub turns: Vec<TurnSummary>,
    pub tally: OrderTally,
    pub summary: GameSummary,
}

/// Let a captain play until the game ends or `max_turns` orders have been
/// given. A captain with nowhere left to go ends the game stranded.
pub fn run_voyage(
    game: &mut GameState,
    captain: &dyn Captain,
    rng: &mut dyn RngCore,
    max_turns: u32,
) -> VoyageReport {
    let mut turns = Vec::new();
    let mut tally = OrderTally::default();

    for turn in 1..=max_turns {
        if game.is_over() {
            break;
        }
        if game.is_stranded() {
            game.end_game(EndReason::Stranded);
            break;
        }

        let order = captain.command(game);
        let mut voyage = None;
        let accepted = match &order {
            Order::Buy(name) => game.buy_from_store(name),
            Order::Sell(name) => game.sell_to_store(name),
            Order::Repair => game.repair_ship(),
            Order::Sail(route) => match game.set_sail(*route, rng) {
                Ok(v) => {
                    voyage = Some(v);
                    true
                }
                Err(refusal) => {
                    log::debug!("{} refused: {}", captain.name(), refusal);
                    false
                }
            },
            Order::Retire => {
                game.end_game(EndReason::Retired);
                true
            }
        };

        tally.record(&order, accepted);
        turns.push(TurnSummary {
            turn,
            order,
            accepted,
            voyage,
        });
    }

    VoyageReport {
        captain: captain.name(),
        turns,
        tally,
        summary: game.summary(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn calm_game() -> GameState {
        let json = r#"{
            "goods": [{ "name": "Tea", "size": 1, "base_price": 20 }],
            "weapons": [],
            "ships": [{ "name": "Cutter", "max_health": 50, "max_space": 4, "speed": 5,
                        "endurance": 4, "crew": 4 }],
            "islands": [
                { "name": "Home", "prices": { "Tea": 10 } },
                { "name": "Away", "prices": { "Tea": 30 } }
            ],
            "routes": [{ "between": ["Home", "Away"], "distance": 10,
                         "pirate_danger": 0.0, "weather_danger": 0.0, "lost_sailors": 0.0 }]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        GameSetup::new(catalog, GameConfig::default())
            .unwrap()
            .finish("Grace", 20, 0)
            .unwrap()
    }

    struct TestCaptain;

    impl Captain for TestCaptain {
        fn name(&self) -> &'static str {
            "test-captain"
        }

        fn command(&self, _game: &GameState) -> Order {
            Order::Retire
        }
    }

    #[test]
    fn test_captain_retires() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = calm_game();
        let report = run_voyage(&mut game, &TestCaptain, &mut rng, 10);

        assert_eq!(report.captain, "test-captain");
        assert_eq!(report.turns.len(), 1);
        assert_eq!(report.summary.end_reason.as_deref(), Some("Retired"));
        assert!(game.is_over());
    }

    #[test]
    fn order_displays_human_readable_text() {
        assert_eq!(Order::Buy("Tea".to_string()).to_string(), "buy Tea");
        assert_eq!(Order::Sail(RouteId(2)).to_string(), "sail route 2");
        assert_eq!(Order::Repair.to_string(), "repair");
    }

    #[test]
    fn tally_counts_answers_to_each_order() {
        struct Scripted(Cell<usize>);

        impl Captain for Scripted {
            fn name(&self) -> &'static str {
                "scripted"
            }

            fn command(&self, _game: &GameState) -> Order {
                let orders = [
                    Order::Buy("Tea".to_string()),
                    Order::Sell("Rum".to_string()),
                    Order::Repair,
                    Order::Sail(RouteId(0)),
                    Order::Sell("Tea".to_string()),
                ];
                let turn = self.0.get();
                self.0.set(turn + 1);
                orders.get(turn).cloned().unwrap_or(Order::Retire)
            }
        }

        let mut rng = StdRng::seed_from_u64(4);
        let mut game = calm_game();
        let report = run_voyage(&mut game, &Scripted(Cell::new(0)), &mut rng, 10);

        assert_eq!(
            report.tally,
            OrderTally {
                purchases: 1,
                sales: 1,
                repairs: 1,
                voyages: 1,
                refusals: 1,
            }
        );
        assert_eq!(report.turns.len(), 6);
        assert!(!report.turns[1].accepted);
        assert!(report.turns[3].voyage.is_some());
        assert_eq!(report.summary.end_reason.as_deref(), Some("Retired"));
        assert!(report.tally.describe().contains("refused: 1"));
    }

    #[test]
    fn tea_trader_shuttles_until_out_of_days() {
        struct TeaTrader;

        impl Captain for TeaTrader {
            fn name(&self) -> &'static str {
                "tea-trader"
            }

            fn command(&self, game: &GameState) -> Order {
                let at_home = game.island().name == "Home";
                if at_home && game.ship().space_free() > 0 && game.gold() >= 10 {
                    Order::Buy("Tea".to_string())
                } else if !at_home && !game.cargo().is_empty() {
                    Order::Sell("Tea".to_string())
                } else {
                    Order::Sail(RouteId(0))
                }
            }
        }

        let mut rng = StdRng::seed_from_u64(2);
        let mut game = calm_game();
        let report = run_voyage(&mut game, &TeaTrader, &mut rng, 500);

        // Two days a crossing, 20 days: ten crossings, five round trips.
        assert_eq!(report.tally.voyages, 10);
        assert_eq!(report.tally.purchases, 20);
        assert_eq!(report.tally.sales, 20);
        assert_eq!(report.tally.refusals, 0);
        assert_eq!(report.summary.end_reason.as_deref(), Some("Out of days"));
        // Each round trip: +80 on tea, -8 in wages per crossing.
        assert_eq!(report.summary.profit, 5 * 80 - 10 * 4);
        assert!(report.summary.goods.iter().all(|e| e.profit() == Some(20)));
    }

    #[test]
    fn broke_captain_is_stranded() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = calm_game();
        game.lose_gold();

        let report = run_voyage(&mut game, &TestCaptain, &mut rng, 10);

        assert!(report.turns.is_empty());
        assert_eq!(report.summary.end_reason.as_deref(), Some("Stranded"));
    }
}
