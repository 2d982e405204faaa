//! Turn state management.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::game::{
    Entity, EntityId, EntityKind, EntityRecord, Faction, Ruleset, Surroundings,
    STARTING_BASE_HEALTH,
};
use crate::geometry::Point;

/// The one-time setup read at match start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    /// X of the corner my base sits on.
    pub base_x: i32,
    /// Y of the corner my base sits on.
    pub base_y: i32,
    /// Heroes each faction controls.
    pub heroes_per_player: u32,
}

/// A faction's health and mana as reported at the start of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FactionSnapshot {
    /// Base health.
    pub health: u32,
    /// Mana.
    pub mana: u32,
}

/// Everything the feed reports for one turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TurnInput {
    /// My faction.
    pub me: FactionSnapshot,
    /// The opponent's faction.
    pub enemy: FactionSnapshot,
    /// Entity rows in input order.
    pub entities: Vec<EntityRecord>,
    /// Rows that were dropped while reading the turn.
    #[serde(default)]
    pub dropped: u32,
}

/// Complete state for the current turn.
///
/// Created once per match. Each turn, [`TurnState::begin_turn`] overwrites
/// both factions and clears every entity list; nothing carries over except
/// the base positions and the turn counter.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnState {
    /// My faction.
    pub me: Faction,
    /// The opponent's faction.
    pub enemy: Faction,
    /// Monsters seen this turn, in input order.
    pub monsters: Vec<Entity>,
    /// Number of turns started so far.
    turn: u32,
    /// Heroes each faction controls.
    heroes_per_player: u32,
    /// Set when an input row was dropped this turn.
    flagged: bool,
    /// Ruleset constants.
    rules: Ruleset,
}

impl TurnState {
    /// Create the state for a new match.
    ///
    /// The opponent's base is the diagonally opposite corner of the arena.
    #[must_use]
    pub fn new(setup: MatchSetup, rules: Ruleset) -> Self {
        let my_base = Point::new(f64::from(setup.base_x), f64::from(setup.base_y));
        let enemy_base = Point::new(
            if setup.base_x == 0 { rules.map_width } else { 0.0 },
            if setup.base_y == 0 { rules.map_height } else { 0.0 },
        );

        Self {
            me: Faction::new(my_base, STARTING_BASE_HEALTH, 0, rules.cast_cost),
            enemy: Faction::new(enemy_base, STARTING_BASE_HEALTH, 0, rules.cast_cost),
            monsters: Vec::new(),
            turn: 0,
            heroes_per_player: setup.heroes_per_player,
            flagged: false,
            rules,
        }
    }

    /// Get the current turn number (1 after the first `begin_turn`).
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Heroes each faction controls.
    #[must_use]
    pub const fn heroes_per_player(&self) -> u32 {
        self.heroes_per_player
    }

    /// Ruleset constants.
    #[must_use]
    pub const fn rules(&self) -> &Ruleset {
        &self.rules
    }

    /// True if an input row was dropped this turn.
    #[must_use]
    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Start a new turn.
    ///
    /// Health and mana are overwritten, every entity list is cleared and the
    /// returned builder repopulates them.
    pub fn begin_turn(&mut self, me: FactionSnapshot, enemy: FactionSnapshot) -> TurnBuilder<'_> {
        self.turn += 1;
        self.me.set_health(me.health);
        self.me.set_mana(me.mana);
        self.me.heroes.clear();
        self.enemy.set_health(enemy.health);
        self.enemy.set_mana(enemy.mana);
        self.enemy.heroes.clear();
        self.monsters.clear();
        self.flagged = false;

        TurnBuilder {
            state: self,
            pending: Vec::new(),
            done: false,
        }
    }

    /// Replace the state with a whole turn of input.
    pub fn apply(&mut self, input: &TurnInput) {
        let mut builder = self.begin_turn(input.me, input.enemy);
        for record in &input.entities {
            builder.add(*record);
        }
        if input.dropped > 0 {
            builder.flag_anomaly();
        }
        builder.finish();

        debug!(
            turn = self.turn,
            monsters = self.monsters.len(),
            my_heroes = self.me.heroes.len(),
            enemy_heroes = self.enemy.heroes.len(),
            threats = self.threats_to_my_base().count(),
            "turn loaded"
        );
    }

    /// Mark the turn as anomalous.
    pub fn flag_anomaly(&mut self) {
        self.flagged = true;
    }

    /// Look up a monster by id.
    #[must_use]
    pub fn monster(&self, id: EntityId) -> Option<&Entity> {
        self.monsters.iter().find(|monster| monster.id == id)
    }

    /// Look up any entity by id.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.monster(id)
            .or_else(|| self.me.hero(id))
            .or_else(|| self.enemy.hero(id))
    }

    /// Monsters heading for my base or able to reach it this turn.
    pub fn threats_to_my_base(&self) -> impl Iterator<Item = &Entity> {
        self.monsters
            .iter()
            .filter(|monster| monster.threatens_my_base() || monster.can_hit_my_base())
    }

    fn surroundings(&self) -> Surroundings<'_> {
        Surroundings {
            my_base: self.me.base,
            enemy_base: self.enemy.base,
            enemy: &self.enemy,
            rules: &self.rules,
        }
    }
}

/// Repopulates a [`TurnState`] for one turn.
///
/// Heroes are built as they arrive. Monsters are held back and built when the
/// builder is finished (or dropped), once both hero lists are complete, so
/// their threat derivation always sees every enemy hero of the turn.
#[derive(Debug)]
#[must_use = "monsters are only built when the builder is finished"]
pub struct TurnBuilder<'a> {
    /// State being populated.
    state: &'a mut TurnState,
    /// Monster records waiting for the hero lists to be complete.
    pending: Vec<EntityRecord>,
    /// Whether monsters were already built.
    done: bool,
}

impl TurnBuilder<'_> {
    /// Add one entity row.
    pub fn add(&mut self, record: EntityRecord) {
        match record.kind {
            EntityKind::Monster => self.pending.push(record),
            EntityKind::MyHero => {
                let hero = Entity::new(record, &self.state.surroundings());
                self.state.me.heroes.push(hero);
            }
            EntityKind::EnemyHero => {
                let hero = Entity::new(record, &self.state.surroundings());
                self.state.enemy.heroes.push(hero);
            }
        }
    }

    /// Mark the turn as anomalous.
    pub fn flag_anomaly(&mut self) {
        if !self.state.flagged {
            warn!(turn = self.state.turn, "turn flagged: input rows were dropped");
        }
        self.state.flag_anomaly();
    }

    /// Build the held-back monsters.
    pub fn finish(mut self) {
        self.build_monsters();
    }

    fn build_monsters(&mut self) {
        if self.done {
            return;
        }
        self.done = true;

        let pending = std::mem::take(&mut self.pending);
        let monsters: Vec<Entity> = {
            let surroundings = self.state.surroundings();
            pending
                .into_iter()
                .map(|record| Entity::new(record, &surroundings))
                .collect()
        };
        self.state.monsters = monsters;
    }
}

impl Drop for TurnBuilder<'_> {
    fn drop(&mut self) {
        self.build_monsters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ThreatTarget;

    fn create_test_state() -> TurnState {
        let setup = MatchSetup {
            base_x: 0,
            base_y: 0,
            heroes_per_player: 3,
        };
        TurnState::new(setup, Ruleset::default())
    }

    fn snapshot(health: u32, mana: u32) -> FactionSnapshot {
        FactionSnapshot { health, mana }
    }

    #[test]
    fn test_bases_from_corner() {
        let state = create_test_state();
        assert_eq!(state.me.base, Point::new(0.0, 0.0));
        assert_eq!(state.enemy.base, Point::new(17630.0, 9000.0));

        let flipped = TurnState::new(
            MatchSetup {
                base_x: 17630,
                base_y: 9000,
                heroes_per_player: 3,
            },
            Ruleset::default(),
        );
        assert_eq!(flipped.enemy.base, Point::new(0.0, 0.0));
        assert_eq!(flipped.heroes_per_player(), 3);
    }

    #[test]
    fn test_begin_turn_resets_everything() {
        let mut state = create_test_state();
        {
            let mut builder = state.begin_turn(snapshot(3, 50), snapshot(2, 40));
            builder.add(EntityRecord::new(0, EntityKind::MyHero, Point::new(100.0, 100.0)));
            builder.add(EntityRecord::new(1, EntityKind::Monster, Point::new(4000.0, 4000.0)));
            builder.flag_anomaly();
            builder.finish();
        }
        assert_eq!(state.turn(), 1);
        assert_eq!(state.me.heroes.len(), 1);
        assert_eq!(state.monsters.len(), 1);
        assert!(state.is_flagged());

        state.begin_turn(snapshot(1, 5), snapshot(3, 0)).finish();
        assert_eq!(state.turn(), 2);
        assert!(state.me.heroes.is_empty());
        assert!(state.monsters.is_empty());
        assert!(!state.is_flagged());
        assert_eq!(state.me.base_health, 1);
        assert_eq!(state.me.mana, 5);
        assert_eq!(state.enemy.mana, 0);
    }

    #[test]
    fn test_monsters_see_enemy_heroes_listed_after_them() {
        let mut state = create_test_state();
        let monster = EntityRecord {
            threat_for: ThreatTarget::MyBase,
            ..EntityRecord::new(5, EntityKind::Monster, Point::new(2000.0, 1000.0))
        };
        let enemy_hero = EntityRecord::new(9, EntityKind::EnemyHero, Point::new(2500.0, 1500.0));

        let mut builder = state.begin_turn(snapshot(3, 0), snapshot(3, 30));
        builder.add(monster);
        builder.add(enemy_hero);
        drop(builder);

        let built = state.monster(5).unwrap();
        assert!(built.can_hit_my_base());
        assert_eq!(state.threats_to_my_base().count(), 1);
        assert!(state.entity(9).unwrap().is_enemy_hero());
        assert!(state.entity(42).is_none());
    }

    #[test]
    fn test_apply_flags_dropped_rows() {
        let mut state = create_test_state();
        let input = TurnInput {
            me: snapshot(3, 20),
            enemy: snapshot(3, 20),
            entities: vec![EntityRecord::new(0, EntityKind::MyHero, Point::new(0.0, 0.0))],
            dropped: 1,
        };
        state.apply(&input);
        assert!(state.is_flagged());
        assert_eq!(state.me.heroes.len(), 1);
    }
}
