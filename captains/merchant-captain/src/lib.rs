use tradewinds_core::geography::Route;
use tradewinds_core::{Captain, GameState, Order};

/// MerchantCaptain buys where goods are cheap and sells where a neighbouring
/// island pays more. It never sells at a loss unless it needs the gold for
/// repairs, and always keeps enough back to pay the crew.
pub struct MerchantCaptain;

impl Captain for MerchantCaptain {
    fn name(&self) -> &'static str {
        "merchant-captain"
    }

    fn command(&self, game: &GameState) -> Order {
        let store = game.store();
        let goods = game.cargo().iter().filter(|item| !item.is_weapon());

        if let Some(item) = goods
            .clone()
            .find(|item| store.price_of(&item.name).is_some_and(|p| p > item.price))
        {
            return Order::Sell(item.name.clone());
        }

        if game.ship().is_damaged() {
            if game.gold() > game.repair_cost() {
                return Order::Repair;
            }
            return match goods.clone().find(|item| store.offer(&item.name).is_some()) {
                Some(item) => Order::Sell(item.name.clone()),
                None => Order::Retire,
            };
        }

        if let Some(name) = best_purchase(game) {
            return Order::Buy(name);
        }

        game.routes()
            .into_iter()
            .filter(|(id, _)| game.is_time_for_route(*id) && game.can_afford_route(*id))
            .max_by_key(|(id, route)| (resale_value(game, route), std::cmp::Reverse(id.0)))
            .map_or(Order::Retire, |(id, _)| Order::Sail(id))
    }
}

/// The good with the widest margin against any neighbour that this ship
/// can fit and still pay the crew to carry there.
fn best_purchase(game: &GameState) -> Option<String> {
    let routes = game.routes();
    game.store()
        .items()
        .iter()
        .filter(|offer| !offer.is_weapon() && game.ship().has_room_for(offer))
        .filter_map(|offer| {
            routes
                .iter()
                .filter(|(id, _)| game.is_time_for_route(*id))
                .filter_map(|(_, route)| {
                    let resale = destination_price(game, route, &offer.name)?;
                    let reserve = game.route_wages(route).ceil() as i32;
                    let margin = resale - offer.price;
                    (margin > 0 && game.gold() - offer.price >= reserve).then_some(margin)
                })
                .max()
                .map(|margin| (margin, offer))
        })
        .max_by_key(|(margin, _)| *margin)
        .map(|(_, offer)| offer.name.clone())
}

/// What the goods in the hold would fetch at the far end of a route.
fn resale_value(game: &GameState, route: &Route) -> i32 {
    game.cargo()
        .iter()
        .filter(|item| !item.is_weapon())
        .filter_map(|item| destination_price(game, route, &item.name))
        .sum()
}

fn destination_price(game: &GameState, route: &Route, name: &str) -> Option<i32> {
    game.archipelago()
        .island(route.other_end(game.island_id()))?
        .store
        .price_of(name)
}
