//! Report formatting for the console.

use std::fmt::Write;

use serde::Serialize;
use tradewinds_core::{Catalog, GameState, VoyageReport};

/// JSON document printed by `play --format json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    seed: u64,
    #[serde(flatten)]
    report: &'a VoyageReport,
}

pub(crate) fn format_json(report: &VoyageReport, seed: u64) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport { seed, report })
}

pub(crate) fn format_text(report: &VoyageReport, game: &GameState, seed: u64) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    let _ = writeln!(
        out,
        "Captain {} of the {} ({}), seed {}",
        summary.player, summary.ship, report.captain, seed
    );
    let _ = writeln!(out);

    for turn in &report.turns {
        let status = if turn.accepted { "" } else { " (refused)" };
        let _ = writeln!(out, "{:>4}. {}{}", turn.turn, turn.order, status);
        if let Some(voyage) = &turn.voyage {
            let from = island_name(game, voyage.from);
            let to = island_name(game, voyage.to);
            let _ = writeln!(
                out,
                "      {} -> {}: {} days, {} gold in wages",
                from, to, voyage.days, voyage.wages
            );
            for outcome in &voyage.encounters {
                let _ = writeln!(out, "      {}", outcome);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Game over: {}",
        summary.end_reason.as_deref().unwrap_or("still at sea")
    );
    let _ = writeln!(
        out,
        "Days: {} of {} at {}",
        summary.days_elapsed, summary.start_days, summary.island
    );
    let _ = writeln!(
        out,
        "Gold: {} -> {} (profit {})",
        summary.starting_gold, summary.final_gold, summary.profit
    );
    let _ = writeln!(out, "Orders: {}", report.tally.describe());
    let _ = writeln!(out, "Trade profit: {}", summary.trade_profit);
    for (label, entry) in [
        ("Best", &summary.best_trade),
        ("Worst", &summary.worst_trade),
    ] {
        if let Some(entry) = entry {
            let _ = writeln!(
                out,
                "{} trade: {} ({:+})",
                label,
                entry.item.name,
                entry.profit().unwrap_or(0)
            );
        }
    }

    if !summary.goods.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Goods:");
        for entry in &summary.goods {
            match &entry.sale {
                Some(sale) => {
                    let _ = writeln!(
                        out,
                        "  {:<12} bought {:>4}  sold {:>4} at {}",
                        entry.item.name, entry.item.price, sale.price, sale.island
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "  {:<12} bought {:>4}  unsold",
                        entry.item.name, entry.item.price
                    );
                }
            }
        }
    }

    out
}

pub(crate) fn format_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Ships:");
    for (index, ship) in catalog.ships.iter().enumerate() {
        let weapons: Vec<&str> = ship.loadout.iter().map(|w| w.name.as_str()).collect();
        let _ = writeln!(
            out,
            "  [{}] {:<12} health {:>3}  hold {:>3}  speed {:>2}  endurance {:>2}  crew {:>2}  {}",
            index,
            ship.name,
            ship.max_health,
            ship.max_space,
            ship.speed,
            ship.endurance,
            ship.crew,
            weapons.join(", ")
        );
    }

    let archipelago = &catalog.archipelago;
    let _ = writeln!(out);
    let _ = writeln!(out, "Islands:");
    for island in archipelago.islands() {
        let _ = writeln!(out, "  {}", island.name);
        for item in island.store.items() {
            let _ = writeln!(out, "    {:<12} {:>4}", item.name, item.price);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Routes:");
    for (index, route) in archipelago.routes().iter().enumerate() {
        let (a, b) = route.ends;
        let name = |id| {
            archipelago
                .island(id)
                .map_or("?", |island| island.name.as_str())
        };
        let _ = writeln!(
            out,
            "  [{}] {} <-> {}  distance {}  pirates {:.2}  weather {:.2}  sailors {:.2}",
            index,
            name(a),
            name(b),
            route.distance,
            route.risk.pirates,
            route.risk.weather,
            route.risk.lost_sailors
        );
    }

    out
}

fn island_name(game: &GameState, id: tradewinds_core::IslandId) -> &str {
    game.archipelago()
        .island(id)
        .map_or("?", |island| island.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tradewinds_core::{run_voyage, Captain, GameConfig, GameSetup, Order};

    struct Retiree;

    impl Captain for Retiree {
        fn name(&self) -> &'static str {
            "retiree"
        }

        fn command(&self, _game: &GameState) -> Order {
            Order::Retire
        }
    }

    fn retired_game() -> (VoyageReport, GameState) {
        let catalog = Catalog::standard().unwrap();
        let mut game = GameSetup::new(catalog, GameConfig::default())
            .unwrap()
            .finish("Anne", 25, 0)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let report = run_voyage(&mut game, &Retiree, &mut rng, 10);
        (report, game)
    }

    #[test]
    fn text_report_names_the_end() {
        let (report, game) = retired_game();
        let text = format_text(&report, &game, 1);
        assert!(text.contains("Captain Anne"));
        assert!(text.contains("Game over: Retired"));
        assert!(text.contains("1. retire"));
    }

    #[test]
    fn text_report_names_best_and_worst_trades() {
        let catalog = Catalog::standard().unwrap();
        let mut game = GameSetup::new(catalog, GameConfig::default())
            .unwrap()
            .finish("Anne", 25, 0)
            .unwrap();
        let good = game.store().items()[0].clone();
        assert!(game.buy_item(&good));
        assert!(game.buy_item(&good));
        assert!(game.sell_item(&good.priced_at(good.price + 7)));
        assert!(game.sell_item(&good.priced_at(good.price - 3)));

        let mut rng = StdRng::seed_from_u64(1);
        let report = run_voyage(&mut game, &Retiree, &mut rng, 10);
        let text = format_text(&report, &game, 1);

        assert!(text.contains("Trade profit: 4"));
        assert!(text.contains(&format!("Best trade: {} (+7)", good.name)));
        assert!(text.contains(&format!("Worst trade: {} (-3)", good.name)));
    }

    #[test]
    fn json_report_carries_seed() {
        let (report, _) = retired_game();
        let json = format_json(&report, 77).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["seed"], 77);
        assert_eq!(value["captain"], "retiree");
        assert_eq!(value["summary"]["end_reason"], "Retired");
    }

    #[test]
    fn catalog_lists_every_ship() {
        let catalog = Catalog::standard().unwrap();
        let text = format_catalog(&catalog);
        for ship in &catalog.ships {
            assert!(text.contains(&ship.name));
        }
        assert!(text.contains("Routes:"));
    }
}
