//! Game layer.
//!
//! Turns raw per-turn telemetry into queryable state:
//! - Entities with derived threat fields
//! - Factions with base, health, mana and heroes
//! - Turn state that is rebuilt from scratch every turn
//! - Commands for my heroes

mod action;
mod entity;
mod faction;
mod rules;
mod state;

pub use crate::geometry::Point;
pub use action::{Command, CommandError, Orders, FLAGGED_MESSAGE};
pub use entity::{Entity, EntityId, EntityKind, EntityRecord, Surroundings, ThreatTarget};
pub use faction::Faction;
pub use rules::{
    Ruleset, RulesError, BASE_RADIUS, CAST_COST, DAMAGE_RADIUS, MAP_HEIGHT, MAP_WIDTH,
    SPELL_RANGE, STARTING_BASE_HEALTH, WIND_THREAT_RANGE,
};
pub use state::{FactionSnapshot, MatchSetup, TurnBuilder, TurnInput, TurnState};
