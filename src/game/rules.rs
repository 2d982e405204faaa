//! Fixed constants of the ruleset.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Arena width in game units.
pub const MAP_WIDTH: f64 = 17630.0;
/// Arena height in game units.
pub const MAP_HEIGHT: f64 = 9000.0;
/// Radius of the circle monsters target once they reach it.
pub const BASE_RADIUS: f64 = 5000.0;
/// A monster this close to a base damages it.
pub const DAMAGE_RADIUS: f64 = 300.0;
/// Mana spent per spell.
pub const CAST_COST: u32 = 10;
/// Distance from my base inside which an enemy wind can push a monster home.
pub const WIND_THREAT_RANGE: f64 = 2900.0;
/// Reach of an enemy hero's spells.
pub const SPELL_RANGE: f64 = 1280.0;
/// Base health at match start.
pub const STARTING_BASE_HEALTH: u32 = 3;

/// Ruleset constants used by threat classification and the action layer.
///
/// Every field falls back to the game's value when omitted from a JSON file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    /// Arena width.
    pub map_width: f64,
    /// Arena height.
    pub map_height: f64,
    /// Base perimeter radius.
    pub base_radius: f64,
    /// Damage ring radius around a base.
    pub damage_radius: f64,
    /// Mana cost of one spell.
    pub cast_cost: u32,
    /// Proximity threshold for the enemy-wind threat rule.
    pub wind_threat_range: f64,
    /// Interaction radius of an enemy hero.
    pub spell_range: f64,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            map_width: MAP_WIDTH,
            map_height: MAP_HEIGHT,
            base_radius: BASE_RADIUS,
            damage_radius: DAMAGE_RADIUS,
            cast_cost: CAST_COST,
            wind_threat_range: WIND_THREAT_RANGE,
            spell_range: SPELL_RANGE,
        }
    }
}

impl Ruleset {
    /// Parse a ruleset from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a distance is not a
    /// finite non-negative number.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let rules: Ruleset = serde_json::from_str(json).map_err(RulesError::Parse)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load a ruleset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails [`Ruleset::from_json`].
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let json = fs::read_to_string(path).map_err(RulesError::Io)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), RulesError> {
        let distances = [
            ("map_width", self.map_width),
            ("map_height", self.map_height),
            ("base_radius", self.base_radius),
            ("damage_radius", self.damage_radius),
            ("wind_threat_range", self.wind_threat_range),
            ("spell_range", self.spell_range),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(RulesError::Invalid(format!("{name} must be finite and >= 0, got {value}")));
            }
        }
        if self.damage_radius > self.base_radius {
            return Err(RulesError::Invalid(format!(
                "damage_radius {} exceeds base_radius {}",
                self.damage_radius, self.base_radius
            )));
        }
        Ok(())
    }
}

/// Error loading a ruleset.
#[derive(Debug)]
pub enum RulesError {
    /// File could not be read.
    Io(io::Error),
    /// JSON did not parse.
    Parse(serde_json::Error),
    /// A value is out of range.
    Invalid(String),
}

impl fmt::Display for RulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Failed to read rules: {e}"),
            Self::Parse(e) => write!(f, "Invalid rules JSON: {e}"),
            Self::Invalid(message) => write!(f, "Invalid rules: {message}"),
        }
    }
}

impl std::error::Error for RulesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}
