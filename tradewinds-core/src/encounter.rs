//! Random encounters at sea.

use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::geography::RouteRisk;

/// The kinds of encounter a route can spring, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterKind {
    Pirates,
    Weather,
    LostSailors,
}

impl EncounterKind {
    pub const ALL: [EncounterKind; 3] = [
        EncounterKind::Pirates,
        EncounterKind::Weather,
        EncounterKind::LostSailors,
    ];

    /// This kind's probability on a route.
    pub fn chance(self, risk: &RouteRisk) -> f64 {
        match self {
            EncounterKind::Pirates => risk.pirates,
            EncounterKind::Weather => risk.weather,
            EncounterKind::LostSailors => risk.lost_sailors,
        }
    }
}

impl fmt::Display for EncounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncounterKind::Pirates => write!(f, "Pirates!"),
            EncounterKind::Weather => write!(f, "A storm approaches!"),
            EncounterKind::LostSailors => write!(f, "Sailors adrift!"),
        }
    }
}

/// How the encounters of a single crossing are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterPolicy {
    /// Roll every kind independently and resolve each that fires, in order.
    /// An encounter that ends the game cancels the rest.
    #[default]
    Sequential,
    /// Roll in order and resolve only the first kind that fires.
    FirstOnly,
}

/// Roll for encounters on one crossing of a route.
pub fn roll_encounters(
    risk: &RouteRisk,
    policy: EncounterPolicy,
    rng: &mut dyn RngCore,
) -> Vec<EncounterKind> {
    let mut fired = Vec::new();
    for kind in EncounterKind::ALL {
        if trial(kind.chance(risk), rng) {
            fired.push(kind);
            if policy == EncounterPolicy::FirstOnly {
                break;
            }
        }
    }
    fired
}

/// One Bernoulli trial. Out-of-range probabilities are clamped; NaN never
/// fires.
fn trial(probability: f64, rng: &mut dyn RngCore) -> bool {
    if probability.is_nan() {
        return false;
    }
    rng.gen_bool(probability.clamp(0.0, 1.0))
}

/// What an encounter did to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EncounterOutcome {
    /// Pirates were sunk or sailed off.
    PiratesRepelled { damage_taken: i32 },
    /// The fight was lost but the cargo bought the crew's lives.
    PiratesSatisfied {
        damage_taken: i32,
        confiscated_value: i32,
    },
    /// The fight was lost and the cargo was not enough.
    PiratesUnsatisfied {
        damage_taken: i32,
        confiscated_value: i32,
    },
    StormWeathered { damage: i32 },
    StormSankShip { damage: i32 },
    SailorsRescued { reward: i32 },
}

impl EncounterOutcome {
    pub fn kind(&self) -> EncounterKind {
        match self {
            EncounterOutcome::PiratesRepelled { .. }
            | EncounterOutcome::PiratesSatisfied { .. }
            | EncounterOutcome::PiratesUnsatisfied { .. } => EncounterKind::Pirates,
            EncounterOutcome::StormWeathered { .. } | EncounterOutcome::StormSankShip { .. } => {
                EncounterKind::Weather
            }
            EncounterOutcome::SailorsRescued { .. } => EncounterKind::LostSailors,
        }
    }

    pub fn ends_game(&self) -> bool {
        matches!(
            self,
            EncounterOutcome::PiratesUnsatisfied { .. } | EncounterOutcome::StormSankShip { .. }
        )
    }
}

impl fmt::Display for EncounterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncounterOutcome::PiratesRepelled { damage_taken } => write!(
                f,
                "You fought them off! Your ship has taken {} damage.",
                damage_taken
            ),
            EncounterOutcome::PiratesSatisfied { .. } => write!(
                f,
                "You lost the fight. The pirates take all your goods and let you go."
            ),
            EncounterOutcome::PiratesUnsatisfied { .. } => write!(
                f,
                "You lost the fight. Unhappy with your goods, the pirates make you walk the plank."
            ),
            EncounterOutcome::StormWeathered { damage } => {
                write!(f, "Your ship has taken {} damage.", damage)
            }
            EncounterOutcome::StormSankShip { .. } => {
                write!(f, "Your ship has been destroyed in the storm.")
            }
            EncounterOutcome::SailorsRescued { reward } => write!(
                f,
                "The sailors give you {} gold as a reward for rescuing them.",
                reward
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CERTAIN: RouteRisk = RouteRisk {
        pirates: 1.0,
        weather: 1.0,
        lost_sailors: 1.0,
    };

    #[test]
    fn calm_route_springs_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(roll_encounters(&RouteRisk::CALM, EncounterPolicy::Sequential, &mut rng)
                .is_empty());
        }
    }

    #[test]
    fn sequential_presents_in_fixed_order() {
        let mut rng = StdRng::seed_from_u64(2);
        let fired = roll_encounters(&CERTAIN, EncounterPolicy::Sequential, &mut rng);
        assert_eq!(fired, EncounterKind::ALL.to_vec());
    }

    #[test]
    fn first_only_stops_at_first_hit() {
        let mut rng = StdRng::seed_from_u64(3);
        let risk = RouteRisk {
            pirates: 0.0,
            ..CERTAIN
        };
        let fired = roll_encounters(&risk, EncounterPolicy::FirstOnly, &mut rng);
        assert_eq!(fired, vec![EncounterKind::Weather]);
    }

    #[test]
    fn trials_follow_route_odds() {
        let mut rng = StdRng::seed_from_u64(4);
        let risk = RouteRisk {
            pirates: 0.25,
            weather: 0.0,
            lost_sailors: 0.0,
        };
        let hits = (0..4000)
            .filter(|_| !roll_encounters(&risk, EncounterPolicy::Sequential, &mut rng).is_empty())
            .count();
        assert!((800..1200).contains(&hits), "got {} hits", hits);
    }

    #[test]
    fn nan_odds_never_fire() {
        let mut rng = StdRng::seed_from_u64(5);
        let risk = RouteRisk {
            pirates: f64::NAN,
            weather: 0.0,
            lost_sailors: 0.0,
        };
        assert!(roll_encounters(&risk, EncounterPolicy::Sequential, &mut rng).is_empty());
    }

    #[test]
    fn only_losing_outcomes_end_the_game() {
        assert!(EncounterOutcome::StormSankShip { damage: 30 }.ends_game());
        assert!(EncounterOutcome::PiratesUnsatisfied {
            damage_taken: 90,
            confiscated_value: 10
        }
        .ends_game());
        assert!(!EncounterOutcome::PiratesSatisfied {
            damage_taken: 90,
            confiscated_value: 100
        }
        .ends_game());
        assert_eq!(
            EncounterOutcome::SailorsRescued { reward: 25 }.kind(),
            EncounterKind::LostSailors
        );
    }
}
