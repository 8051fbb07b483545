use tradewinds_core::{Captain, GameState, Order};

/// A simple example captain that never trades. It keeps the hull patched
/// and takes the first route it can afford the time and wages for.
pub struct ExampleCaptain;

impl Captain for ExampleCaptain {
    fn name(&self) -> &'static str {
        "example-captain"
    }

    fn command(&self, game: &GameState) -> Order {
        if game.ship().is_damaged() {
            return if game.gold() > game.repair_cost() {
                Order::Repair
            } else {
                Order::Retire
            };
        }
        game.routes()
            .into_iter()
            .map(|(id, _)| id)
            .find(|id| game.is_time_for_route(*id) && game.can_afford_route(*id))
            .map_or(Order::Retire, Order::Sail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradewinds_core::{Catalog, GameConfig, GameSetup, RouteId};

    fn new_game() -> GameState {
        GameSetup::new(Catalog::standard().unwrap(), GameConfig::default())
            .unwrap()
            .finish("Mary", 30, 0)
            .unwrap()
    }

    #[test]
    fn sails_the_first_open_route() {
        let game = new_game();
        let first = game.routes()[0].0;
        assert_eq!(ExampleCaptain.command(&game), Order::Sail(first));
        assert_eq!(first, RouteId(0));
    }

    #[test]
    fn retires_when_no_route_is_affordable() {
        let mut game = new_game();
        game.lose_gold();
        assert_eq!(ExampleCaptain.command(&game), Order::Retire);
    }
}
