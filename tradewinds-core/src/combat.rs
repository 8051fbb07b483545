//! Turn-based ship-to-ship combat.
//!
//! Each turn the attacker fires every weapon in its hold `shots` times. A
//! shot rolls raw damage in `[0, damage)`; a non-zero roll is met by a
//! resistance roll in `[0, endurance)` of the defender, and the defender
//! loses `raw - min(resistance, raw)` health. The player fires first, and a
//! pirate sunk by the player's volley does not fire back.

use rand::{Rng, RngCore};
use serde::Serialize;

use crate::ship::Ship;

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BattleOutcome {
    /// The pirate ship was sunk.
    Victory,
    /// The player's ship was sunk.
    Defeat,
    /// Neither side could finish the other.
    Stalemate,
}

/// Summary of a finished battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Battle {
    pub outcome: BattleOutcome,
    pub rounds: u32,
    /// Player health lost; may exceed what the ship had left.
    pub damage_taken: i32,
    pub damage_dealt: i32,
}

/// Fight until one ship is sunk, or `max_rounds` rounds pass.
///
/// Both ships fight from their current health. A battle between ships that
/// cannot hurt each other is a stalemate without a shot fired.
pub fn resolve_battle(
    player: &mut Ship,
    pirate: &mut Ship,
    max_rounds: u32,
    rng: &mut dyn RngCore,
) -> Battle {
    let player_start = player.health();
    let pirate_start = pirate.health();
    let mut rounds = 0;

    let outcome = if !player.is_armed() && !pirate.is_armed() {
        BattleOutcome::Stalemate
    } else {
        loop {
            if player.is_destroyed() {
                break BattleOutcome::Defeat;
            }
            if pirate.is_destroyed() {
                break BattleOutcome::Victory;
            }
            if rounds == max_rounds {
                break BattleOutcome::Stalemate;
            }
            rounds += 1;

            volley(player, pirate, rng);
            if pirate.is_destroyed() {
                break BattleOutcome::Victory;
            }
            volley(pirate, player, rng);
        }
    };

    if outcome == BattleOutcome::Stalemate {
        log::warn!(
            "{} and {} broke off after {} rounds",
            player.name,
            pirate.name,
            rounds
        );
    }

    Battle {
        outcome,
        rounds,
        damage_taken: player_start - player.health(),
        damage_dealt: pirate_start - pirate.health(),
    }
}

/// One side's turn: every weapon in the attacker's hold fires at the
/// defender.
pub fn volley(attacker: &Ship, defender: &mut Ship, rng: &mut dyn RngCore) {
    for weapon in attacker.weapons() {
        for _ in 0..weapon.shots {
            let raw = roll_below(weapon.damage, rng);
            if raw > 0 {
                let resisted = roll_below(defender.endurance, rng).min(raw);
                defender.set_health(defender.health() - raw + resisted);
            }
        }
    }
}

/// Uniform roll in `[0, ceiling)`; zero when the ceiling is zero.
fn roll_below(ceiling: u32, rng: &mut dyn RngCore) -> i32 {
    if ceiling == 0 {
        return 0;
    }
    rng.gen_range(0..ceiling) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Item, WeaponStats};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gun(shots: u32, damage: u32) -> Item {
        Item::weapon("Gun", "", 1, 10, WeaponStats { shots, damage })
    }

    fn hull(name: &str, health: i32, endurance: u32) -> Ship {
        Ship::new(name, health, 20, 5, endurance, 10)
    }

    #[test]
    fn overwhelming_broadside_wins_unscathed() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut player = hull("Player", 100, 1);
        player.add_cargo(gun(1000, 2));
        let mut pirate = hull("Pirate", 10, 1);

        let battle = resolve_battle(&mut player, &mut pirate, 100, &mut rng);

        assert_eq!(battle.outcome, BattleOutcome::Victory);
        assert_eq!(battle.rounds, 1);
        assert!(pirate.health() <= 0);
        assert_eq!(player.health(), 100);
        assert_eq!(battle.damage_taken, 0);
    }

    #[test]
    fn unarmed_player_is_eventually_sunk() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut player = hull("Player", 40, 3);
        let mut pirate = hull("Pirate", 40, 3);
        pirate.add_cargo(gun(2, 12));

        let battle = resolve_battle(&mut player, &mut pirate, 10_000, &mut rng);

        assert_eq!(battle.outcome, BattleOutcome::Defeat);
        assert!(player.is_destroyed());
        assert_eq!(battle.damage_taken, 40 - player.health());
        assert_eq!(battle.damage_dealt, 0);
    }

    #[test]
    fn battles_never_end_with_both_afloat() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut player = hull("Player", 60, 8);
            player.add_cargo(gun(2, 15));
            let mut pirate = hull("Pirate", 70, 6);
            pirate.add_cargo(gun(4, 6));

            let battle = resolve_battle(&mut player, &mut pirate, 10_000, &mut rng);

            assert_ne!(battle.outcome, BattleOutcome::Stalemate, "seed {}", seed);
            assert!(player.is_destroyed() || pirate.is_destroyed(), "seed {}", seed);
            assert_eq!(
                battle.outcome == BattleOutcome::Victory,
                !player.is_destroyed(),
                "seed {}",
                seed
            );
        }
    }

    #[test]
    fn damaged_player_fights_from_current_health() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut player = hull("Player", 100, 1);
        player.set_health(30);
        player.add_cargo(gun(1000, 2));
        let mut pirate = hull("Pirate", 10, 1);

        let battle = resolve_battle(&mut player, &mut pirate, 100, &mut rng);
        assert_eq!(battle.outcome, BattleOutcome::Victory);
        assert_eq!(player.health(), 30);
    }

    #[test]
    fn unarmed_ships_stalemate_immediately() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut player = hull("Player", 50, 5);
        let mut pirate = hull("Pirate", 50, 5);
        pirate.add_cargo(gun(3, 1));

        let battle = resolve_battle(&mut player, &mut pirate, 100, &mut rng);

        assert_eq!(battle.outcome, BattleOutcome::Stalemate);
        assert_eq!(battle.rounds, 0);
        assert_eq!(player.health(), 50);
    }

    #[test]
    fn round_cap_forces_stalemate() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut player = hull("Player", 10_000, 5);
        player.add_cargo(gun(1, 2));
        let mut pirate = hull("Pirate", 10_000, 5);
        pirate.add_cargo(gun(1, 2));

        let battle = resolve_battle(&mut player, &mut pirate, 5, &mut rng);

        assert_eq!(battle.outcome, BattleOutcome::Stalemate);
        assert_eq!(battle.rounds, 5);
    }

    #[test]
    fn endurance_mitigates_but_never_heals() {
        let mut rng = StdRng::seed_from_u64(11);
        let attacker = {
            let mut ship = hull("Attacker", 10, 1);
            ship.add_cargo(gun(500, 10));
            ship
        };
        let mut defender = hull("Defender", 100_000, 50);

        volley(&attacker, &mut defender, &mut rng);

        let lost = 100_000 - defender.health();
        assert!(lost >= 0);
        assert!(lost <= 500 * 9);
    }
}
