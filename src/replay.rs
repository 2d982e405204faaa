//! Match recordings and offline threat analysis.
//!
//! A [`Recording`] holds the setup and every turn's raw input, so a match can
//! be re-evaluated later with a different ruleset. [`analyze`] rebuilds each
//! turn independently and reports the monsters endangering my base.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::{EntityId, MatchSetup, Ruleset, TurnInput, TurnState};

/// A recorded match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Setup lines of the match.
    pub setup: MatchSetup,
    /// Ruleset in force when recorded.
    #[serde(default)]
    pub rules: Ruleset,
    /// Raw input of every turn, in order.
    pub turns: Vec<TurnInput>,
}

impl Recording {
    /// Start an empty recording.
    #[must_use]
    pub fn new(setup: MatchSetup, rules: Ruleset) -> Self {
        Self {
            setup,
            rules,
            turns: Vec::new(),
        }
    }

    /// Append one turn.
    pub fn push(&mut self, turn: TurnInput) {
        self.turns.push(turn);
    }

    /// Save to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let file = File::create(path).map_err(ReplayError::Io)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self).map_err(ReplayError::Json)?;
        writer.flush().map_err(ReplayError::Io)
    }

    /// Load from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a recording.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let file = File::open(path).map_err(ReplayError::Io)?;
        serde_json::from_reader(BufReader::new(file)).map_err(ReplayError::Json)
    }
}

/// Error saving or loading a recording.
#[derive(Debug)]
pub enum ReplayError {
    /// File could not be opened, read or written.
    Io(io::Error),
    /// JSON could not be produced or parsed.
    Json(serde_json::Error),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Recording I/O failed: {e}"),
            Self::Json(e) => write!(f, "Invalid recording: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

/// One monster endangering my base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThreatEntry {
    /// Monster id.
    pub id: EntityId,
    /// Distance to my base.
    pub distance: f64,
    /// Turns before it reaches the damage ring, if it does.
    pub turns_before_hit: Option<u32>,
    /// Whether it can hit my base this turn.
    pub can_hit: bool,
    /// Shield turns left.
    pub shield_life: u32,
}

/// Threats for one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreatReport {
    /// Turn number (1-based).
    pub turn: u32,
    /// My mana that turn.
    pub mana: u32,
    /// Opponent's mana that turn.
    pub enemy_mana: u32,
    /// Whether input rows were dropped that turn.
    pub flagged: bool,
    /// Threats, most urgent first.
    pub threats: Vec<ThreatEntry>,
}

impl ThreatReport {
    /// Report the threats of a populated turn.
    #[must_use]
    pub fn from_state(state: &TurnState) -> Self {
        let mut threats: Vec<ThreatEntry> = state
            .threats_to_my_base()
            .map(|monster| ThreatEntry {
                id: monster.id,
                distance: monster.distance_from_my_base(),
                turns_before_hit: monster.turns_before_hit(),
                can_hit: monster.can_hit_my_base(),
                shield_life: monster.shield_life,
            })
            .collect();

        // Immediate hits first, then by turns left, then by distance
        threats.sort_by(|a, b| {
            b.can_hit
                .cmp(&a.can_hit)
                .then_with(|| {
                    a.turns_before_hit
                        .unwrap_or(u32::MAX)
                        .cmp(&b.turns_before_hit.unwrap_or(u32::MAX))
                })
                .then_with(|| a.distance.total_cmp(&b.distance))
        });

        Self {
            turn: state.turn(),
            mana: state.me.mana,
            enemy_mana: state.enemy.mana,
            flagged: state.is_flagged(),
            threats,
        }
    }
}

/// Evaluate every turn of a recording.
///
/// Turns are independent (the state is rebuilt from scratch each turn), so
/// they are evaluated in parallel. Reports come back in turn order.
#[must_use]
pub fn analyze(recording: &Recording) -> Vec<ThreatReport> {
    recording
        .turns
        .par_iter()
        .enumerate()
        .map(|(index, input)| {
            let mut state = TurnState::new(recording.setup, recording.rules);
            state.apply(input);
            let mut report = ThreatReport::from_state(&state);
            report.turn = u32::try_from(index + 1).unwrap_or(u32::MAX);
            report
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{EntityKind, EntityRecord, FactionSnapshot, ThreatTarget};
    use crate::geometry::Point;

    fn monster(id: EntityId, x: f64, y: f64) -> EntityRecord {
        EntityRecord {
            vector: Point::new(-300.0, -300.0),
            threat_for: ThreatTarget::MyBase,
            ..EntityRecord::new(id, EntityKind::Monster, Point::new(x, y))
        }
    }

    fn recording() -> Recording {
        let setup = MatchSetup {
            base_x: 0,
            base_y: 0,
            heroes_per_player: 3,
        };
        let mut recording = Recording::new(setup, Ruleset::default());
        for turn in 0..4u32 {
            recording.push(TurnInput {
                me: FactionSnapshot {
                    health: 3,
                    mana: turn * 10,
                },
                enemy: FactionSnapshot { health: 3, mana: 0 },
                entities: vec![monster(1, 4000.0, 4000.0), monster(2, 1000.0, 1000.0)],
                dropped: 0,
            });
        }
        recording
    }

    #[test]
    fn test_analyze_keeps_turn_order() {
        let reports = analyze(&recording());
        let turns: Vec<u32> = reports.iter().map(|r| r.turn).collect();
        assert_eq!(turns, vec![1, 2, 3, 4]);
        assert_eq!(reports[3].mana, 30);
    }

    #[test]
    fn test_report_orders_by_urgency() {
        let reports = analyze(&recording());
        let ids: Vec<EntityId> = reports[0].threats.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(reports[0].threats[0].turns_before_hit < reports[0].threats[1].turns_before_hit);
    }
}
