//! Islands, their stores, and the routes between them.

use serde::Serialize;

use crate::item::Item;

/// Index of an island within its [`Archipelago`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IslandId(pub usize);

/// Index of a route within its [`Archipelago`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RouteId(pub usize);

/// Items an island offers, priced for that island.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Store {
    stock: Vec<Item>,
}

impl Store {
    pub fn new(stock: Vec<Item>) -> Self {
        Self { stock }
    }

    pub fn items(&self) -> &[Item] {
        &self.stock
    }

    /// The offer for `name`, if this store trades it.
    pub fn offer(&self, name: &str) -> Option<&Item> {
        self.stock.iter().find(|item| item.name == name)
    }

    pub fn price_of(&self, name: &str) -> Option<i32> {
        self.offer(name).map(|item| item.price)
    }
}

/// A port the player can visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Island {
    pub name: String,
    pub store: Store,
    routes: Vec<RouteId>,
}

impl Island {
    pub fn new(name: &str, store: Store) -> Self {
        Self {
            name: name.to_string(),
            store,
            routes: Vec::new(),
        }
    }

    /// Routes incident to this island.
    pub fn routes(&self) -> &[RouteId] {
        &self.routes
    }
}

/// Per-traversal encounter probabilities of a route, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteRisk {
    pub pirates: f64,
    pub weather: f64,
    pub lost_sailors: f64,
}

impl RouteRisk {
    pub const CALM: RouteRisk = RouteRisk {
        pirates: 0.0,
        weather: 0.0,
        lost_sailors: 0.0,
    };
}

/// An unordered connection between two islands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub ends: (IslandId, IslandId),
    /// Sailing distance; a ship covers `speed` of it per day.
    pub distance: u32,
    pub risk: RouteRisk,
}

impl Route {
    /// Days a ship of the given speed needs for this route, at least one.
    pub fn days(&self, speed: u32) -> u32 {
        self.distance.div_ceil(speed.max(1)).max(1)
    }

    pub fn touches(&self, island: IslandId) -> bool {
        self.ends.0 == island || self.ends.1 == island
    }

    /// The endpoint opposite `from`.
    pub fn other_end(&self, from: IslandId) -> IslandId {
        if self.ends.0 != from {
            self.ends.0
        } else {
            self.ends.1
        }
    }
}

/// The graph of islands connected by routes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Archipelago {
    islands: Vec<Island>,
    routes: Vec<Route>,
}

impl Archipelago {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_island(&mut self, island: Island) -> IslandId {
        self.islands.push(island);
        IslandId(self.islands.len() - 1)
    }

    /// Connect two existing islands.
    ///
    /// # Panics
    /// Panics if either id is not an island of this archipelago.
    pub fn add_route(
        &mut self,
        a: IslandId,
        b: IslandId,
        distance: u32,
        risk: RouteRisk,
    ) -> RouteId {
        let id = RouteId(self.routes.len());
        self.routes.push(Route {
            ends: (a, b),
            distance,
            risk,
        });
        self.islands[a.0].routes.push(id);
        if a != b {
            self.islands[b.0].routes.push(id);
        }
        id
    }

    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn island(&self, id: IslandId) -> Option<&Island> {
        self.islands.get(id.0)
    }

    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(id.0)
    }

    pub fn find_island(&self, name: &str) -> Option<IslandId> {
        self.islands
            .iter()
            .position(|island| island.name == name)
            .map(IslandId)
    }

    /// Routes leaving `island`, paired with their ids.
    pub fn routes_from(
        &self,
        island: IslandId,
    ) -> impl Iterator<Item = (RouteId, &Route)> + '_ {
        self.island(island)
            .into_iter()
            .flat_map(|i| i.routes.iter())
            .filter_map(|id| self.route(*id).map(|route| (*id, route)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_ports() -> (Archipelago, IslandId, IslandId, RouteId) {
        let mut map = Archipelago::new();
        let a = map.add_island(Island::new("Port Royal", Store::default()));
        let b = map.add_island(Island::new("Tortuga", Store::default()));
        let r = map.add_route(a, b, 10, RouteRisk::CALM);
        (map, a, b, r)
    }

    #[test]
    fn route_is_incident_to_both_ends() {
        let (map, a, b, r) = two_ports();
        assert_eq!(map.island(a).map(|i| i.routes().to_vec()), Some(vec![r]));
        assert_eq!(map.island(b).map(|i| i.routes().to_vec()), Some(vec![r]));
        assert_eq!(map.routes_from(b).count(), 1);
    }

    #[test]
    fn other_end_works_from_either_side() {
        let (map, a, b, r) = two_ports();
        let route = map.route(r).unwrap();
        assert_eq!(route.other_end(a), b);
        assert_eq!(route.other_end(b), a);
        assert!(route.touches(a));
        assert!(!route.touches(IslandId(7)));
    }

    #[test]
    fn days_round_up_with_a_floor_of_one() {
        let route = Route {
            ends: (IslandId(0), IslandId(1)),
            distance: 10,
            risk: RouteRisk::CALM,
        };
        assert_eq!(route.days(3), 4);
        assert_eq!(route.days(5), 2);
        assert_eq!(route.days(40), 1);
        assert_eq!(route.days(0), 10);
    }

    #[test]
    fn store_lookup_by_name() {
        let store = Store::new(vec![Item::goods("Tea", "", 1, 12).priced_at(18)]);
        assert_eq!(store.price_of("Tea"), Some(18));
        assert!(store.offer("Coffee").is_none());
    }

    #[test]
    fn find_island_by_name() {
        let (map, _, b, _) = two_ports();
        assert_eq!(map.find_island("Tortuga"), Some(b));
        assert_eq!(map.find_island("Nassau"), None);
    }
}
