//! Entities seen this turn and their threat classification.
//!
//! An [`Entity`] is built once from an [`EntityRecord`] and never changes.
//! Everything it derives (distances, turns before impact, whether it can hit
//! my base) is computed in [`Entity::new`] from the record and the explicit
//! [`Surroundings`] of the turn.

use serde::{Deserialize, Serialize};

use crate::game::{Faction, Ruleset};
use crate::geometry::{line_circle_crossing, Circle, Point};

/// Unique identifier of an entity, stable across turns.
pub type EntityId = u32;

/// What an entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EntityKind {
    /// Neutral creature following its own trajectory.
    Monster = 0,
    /// One of my heroes.
    MyHero = 1,
    /// One of the opponent's heroes.
    EnemyHero = 2,
}

impl EntityKind {
    /// Decode the wire code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Monster),
            1 => Some(Self::MyHero),
            2 => Some(Self::EnemyHero),
            _ => None,
        }
    }
}

/// Which base a monster's trajectory endangers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ThreatTarget {
    /// Neither base.
    #[default]
    None = 0,
    /// My base.
    MyBase = 1,
    /// The opponent's base.
    EnemyBase = 2,
}

impl ThreatTarget {
    /// Decode the wire code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::MyBase),
            2 => Some(Self::EnemyBase),
            _ => None,
        }
    }
}

/// One raw input row, before anything is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Entity id.
    pub id: EntityId,
    /// Entity kind.
    pub kind: EntityKind,
    /// Position this turn.
    pub position: Point,
    /// Turns of shield left (0 = unshielded).
    pub shield_life: u32,
    /// Whether a control spell is acting on it.
    pub is_controlled: bool,
    /// Remaining health.
    pub health: u32,
    /// Displacement next turn if nothing interferes.
    pub vector: Point,
    /// Whether it is targeting a base (reported, not recomputed).
    pub near_base: bool,
    /// Base its trajectory threatens (reported).
    pub threat_for: ThreatTarget,
    /// Turns before impact when the feed reports it; derived otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turns_before_hit: Option<u32>,
}

impl EntityRecord {
    /// A stationary, unshielded record with everything else zeroed.
    #[must_use]
    pub const fn new(id: EntityId, kind: EntityKind, position: Point) -> Self {
        Self {
            id,
            kind,
            position,
            shield_life: 0,
            is_controlled: false,
            health: 0,
            vector: Point::new(0.0, 0.0),
            near_base: false,
            threat_for: ThreatTarget::None,
            turns_before_hit: None,
        }
    }
}

/// What an entity needs from the rest of the turn to derive its fields.
///
/// `enemy` must be the opponent's faction with its full hero list for the
/// turn; [`crate::game::TurnBuilder`] guarantees that for monsters.
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    /// My base.
    pub my_base: Point,
    /// The opponent's base.
    pub enemy_base: Point,
    /// The opponent's faction.
    pub enemy: &'a Faction,
    /// Ruleset constants.
    pub rules: &'a Ruleset,
}

/// An entity for the current turn, with derived fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    /// Entity id.
    pub id: EntityId,
    /// Entity kind.
    pub kind: EntityKind,
    /// Position this turn.
    pub position: Point,
    /// Turns of shield left.
    pub shield_life: u32,
    /// Whether a control spell is acting on it.
    pub is_controlled: bool,
    /// Remaining health.
    pub health: u32,
    /// Displacement next turn.
    pub vector: Point,
    /// Whether it is targeting a base.
    pub near_base: bool,
    /// Base its trajectory threatens.
    pub threat_for: ThreatTarget,
    distance_from_my_base: f64,
    distance_from_enemy_base: f64,
    turns_before_hit: Option<u32>,
    can_hit_my_base: bool,
}

impl Entity {
    /// Build an entity and derive its fields.
    #[must_use]
    pub fn new(record: EntityRecord, surroundings: &Surroundings<'_>) -> Self {
        let distance_from_my_base = record.position.distance(surroundings.my_base);
        let distance_from_enemy_base = record.position.distance(surroundings.enemy_base);

        let turns_before_hit = match record.kind {
            EntityKind::Monster => record
                .turns_before_hit
                .or_else(|| turns_until_impact(&record, surroundings.my_base, surroundings.rules)),
            EntityKind::MyHero | EntityKind::EnemyHero => None,
        };

        let can_hit_my_base = record.kind == EntityKind::Monster
            && (turns_before_hit == Some(0)
                || can_be_winded_home(&record, distance_from_my_base, surroundings));

        Self {
            id: record.id,
            kind: record.kind,
            position: record.position,
            shield_life: record.shield_life,
            is_controlled: record.is_controlled,
            health: record.health,
            vector: record.vector,
            near_base: record.near_base,
            threat_for: record.threat_for,
            distance_from_my_base,
            distance_from_enemy_base,
            turns_before_hit,
            can_hit_my_base,
        }
    }

    /// True for monsters.
    #[must_use]
    pub fn is_monster(&self) -> bool {
        self.kind == EntityKind::Monster
    }

    /// True for my heroes.
    #[must_use]
    pub fn is_my_hero(&self) -> bool {
        self.kind == EntityKind::MyHero
    }

    /// True for the opponent's heroes.
    #[must_use]
    pub fn is_enemy_hero(&self) -> bool {
        self.kind == EntityKind::EnemyHero
    }

    /// The feed reports this entity heading for my base.
    #[must_use]
    pub fn threatens_my_base(&self) -> bool {
        self.threat_for == ThreatTarget::MyBase
    }

    /// The feed reports this entity heading for the opponent's base.
    #[must_use]
    pub fn threatens_enemy_base(&self) -> bool {
        self.threat_for == ThreatTarget::EnemyBase
    }

    /// Strikes my base this turn.
    #[must_use]
    pub fn will_hit_my_base(&self) -> bool {
        self.turns_before_hit == Some(0)
    }

    /// Strikes my base this turn, or could be pushed into it by an enemy hero
    /// standing close enough with mana to cast.
    ///
    /// Fixed at construction; later casts in the same turn do not change it.
    #[must_use]
    pub const fn can_hit_my_base(&self) -> bool {
        self.can_hit_my_base
    }

    /// Turns before this monster reaches my base's damage ring, if its
    /// trajectory gets there.
    #[must_use]
    pub const fn turns_before_hit(&self) -> Option<u32> {
        self.turns_before_hit
    }

    /// Distance to my base at construction.
    #[must_use]
    pub const fn distance_from_my_base(&self) -> f64 {
        self.distance_from_my_base
    }

    /// Distance to the opponent's base at construction.
    #[must_use]
    pub const fn distance_from_enemy_base(&self) -> f64 {
        self.distance_from_enemy_base
    }

    /// Distance from this entity to `point`.
    #[must_use]
    pub fn distance_from(&self, point: Point) -> f64 {
        self.position.distance(point)
    }
}

/// Turns a monster needs to reach the damage ring of `base`.
///
/// Outside the perimeter the monster follows its vector; once inside it
/// walks straight at the base.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn turns_until_impact(record: &EntityRecord, base: Point, rules: &Ruleset) -> Option<u32> {
    let distance = record.position.distance(base);
    if distance <= rules.damage_radius {
        return Some(0);
    }

    let speed = record.vector.length();
    if !speed.is_finite() || speed <= 0.0 {
        return None;
    }

    let perimeter = Circle::new(base, rules.base_radius);
    let entry = if perimeter.contains(record.position) {
        if record.vector.dot(base - record.position) <= 0.0 {
            return None;
        }
        record.position
    } else {
        line_circle_crossing(record.position, record.position + record.vector, perimeter)
            .ok()?
            .first_along(record.position, record.vector)?
    };

    let path = record.position.distance(entry) + (entry.distance(base) - rules.damage_radius).max(0.0);
    let turns = (path / speed).ceil();
    Some(turns.min(f64::from(u32::MAX)) as u32)
}

/// An unshielded monster near my base with an enemy hero in spell range is
/// one wind away from scoring.
fn can_be_winded_home(record: &EntityRecord, distance_from_my_base: f64, surroundings: &Surroundings<'_>) -> bool {
    let rules = surroundings.rules;
    record.shield_life == 0
        && distance_from_my_base <= rules.wind_threat_range
        && surroundings.enemy.can_cast()
        && surroundings
            .enemy
            .heroes
            .iter()
            .any(|hero| hero.distance_from(record.position) <= rules.spell_range)
}
