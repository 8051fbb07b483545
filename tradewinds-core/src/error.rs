//! Errors raised while loading data and setting up a game.
//!
//! Player commands never fail with these; they report success as a bool.

use thiserror::Error;

/// A catalog document that cannot be turned into a playable world.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog has no {0}")]
    Empty(&'static str),
    #[error("duplicate {kind} name: {name}")]
    Duplicate { kind: &'static str, name: String },
    #[error("route references unknown island: {0}")]
    UnknownIsland(String),
    #[error("route from {0} loops back to itself")]
    SelfLoop(String),
    #[error("ship {ship} carries unknown weapon: {weapon}")]
    UnknownWeapon { ship: String, weapon: String },
    #[error("island {island} prices unknown item: {item}")]
    UnknownItem { island: String, item: String },
    #[error("route {from} - {to}: {field} must be between 0 and 1 (got {value})")]
    BadProbability {
        from: String,
        to: String,
        field: &'static str,
        value: f64,
    },
    #[error("{0} must be positive")]
    NotPositive(String),
}

/// Invalid choices when completing game setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("Name must be between {min} and {max} letters.")]
    InvalidName { min: usize, max: usize },
    #[error("Days must be between {min} and {max}.")]
    DaysOutOfRange { min: u32, max: u32 },
    #[error("No ship at index {0}")]
    UnknownShip(usize),
    #[error("No island at index {0}")]
    UnknownIsland(usize),
}

/// A config file the engine cannot run with.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} range is empty")]
    EmptyRange(&'static str),
    #[error("{0} exceeds {1}")]
    Inverted(&'static str, &'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("{0} must not be zero")]
    Zero(&'static str),
}
