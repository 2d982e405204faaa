//! Commands issued to heroes.

use std::fmt;

use crate::game::{EntityId, TurnState};
use crate::geometry::Point;

/// Message shown instead of the caller's when the turn is flagged.
pub const FLAGGED_MESSAGE: &str = "DEBUG";

/// A command for one hero.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Stay in place.
    Wait {
        /// Label shown in the viewer.
        message: String,
    },
    /// Walk towards a point.
    Move {
        /// Destination.
        to: Point,
        /// Label shown in the viewer.
        message: String,
    },
    /// Push nearby entities towards a point.
    Wind {
        /// Direction target.
        toward: Point,
        /// Label shown in the viewer.
        message: String,
    },
    /// Shield an entity.
    Shield {
        /// Entity to shield.
        target: EntityId,
        /// Label shown in the viewer.
        message: String,
    },
    /// Force an entity to walk towards a point.
    Control {
        /// Entity to control.
        target: EntityId,
        /// Direction target.
        toward: Point,
        /// Label shown in the viewer.
        message: String,
    },
}

impl Command {
    /// True for the three spells.
    #[must_use]
    pub const fn is_spell(&self) -> bool {
        matches!(
            self,
            Command::Wind { .. } | Command::Shield { .. } | Command::Control { .. }
        )
    }
}

/// Round a coordinate to the integer the protocol expects.
#[allow(clippy::cast_possible_truncation)]
fn wire(value: f64) -> i64 {
    value.round() as i64
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Wait { message } => write!(f, "WAIT {message}"),
            Command::Move { to, message } => {
                write!(f, "MOVE {} {} {message}", wire(to.x), wire(to.y))
            }
            Command::Wind { toward, message } => {
                write!(f, "SPELL WIND {} {} {message}", wire(toward.x), wire(toward.y))
            }
            Command::Shield { target, message } => write!(f, "SPELL SHIELD {target} {message}"),
            Command::Control {
                target,
                toward,
                message,
            } => write!(
                f,
                "SPELL CONTROL {target} {} {} {message}",
                wire(toward.x),
                wire(toward.y)
            ),
        }
    }
}

/// Error issuing a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Not enough mana left this turn.
    InsufficientMana {
        /// Mana available.
        available: u32,
        /// Mana needed.
        cost: u32,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::InsufficientMana { available, cost } => {
                write!(f, "insufficient mana: {available} available, {cost} needed")
            }
        }
    }
}

impl std::error::Error for CommandError {}

/// Issues commands for my heroes, debiting mana for each spell.
#[derive(Debug)]
pub struct Orders<'a> {
    state: &'a mut TurnState,
}

impl<'a> Orders<'a> {
    /// Issue commands against the given turn.
    #[must_use]
    pub fn new(state: &'a mut TurnState) -> Self {
        Self { state }
    }

    /// Mana left after the spells issued so far.
    #[must_use]
    pub const fn mana(&self) -> u32 {
        self.state.me.mana
    }

    /// Stay in place.
    #[must_use]
    pub fn wait(&self, message: &str) -> Command {
        Command::Wait {
            message: self.label(message),
        }
    }

    /// Walk towards `to`.
    #[must_use]
    pub fn move_to(&self, to: Point, message: &str) -> Command {
        Command::Move {
            to,
            message: self.label(message),
        }
    }

    /// Cast wind towards `toward`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InsufficientMana`] if the spell is unaffordable.
    pub fn wind(&mut self, toward: Point, message: &str) -> Result<Command, CommandError> {
        self.state.me.debit_cast()?;
        Ok(Command::Wind {
            toward,
            message: self.label(message),
        })
    }

    /// Cast shield on `target`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InsufficientMana`] if the spell is unaffordable.
    pub fn shield(&mut self, target: EntityId, message: &str) -> Result<Command, CommandError> {
        self.state.me.debit_cast()?;
        Ok(Command::Shield {
            target,
            message: self.label(message),
        })
    }

    /// Cast control on `target`, sending it towards `toward`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InsufficientMana`] if the spell is unaffordable.
    pub fn control(
        &mut self,
        target: EntityId,
        toward: Point,
        message: &str,
    ) -> Result<Command, CommandError> {
        self.state.me.debit_cast()?;
        Ok(Command::Control {
            target,
            toward,
            message: self.label(message),
        })
    }

    fn label(&self, message: &str) -> String {
        if self.state.is_flagged() {
            FLAGGED_MESSAGE.to_string()
        } else {
            message.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{FactionSnapshot, MatchSetup, Ruleset};

    fn state_with_mana(mana: u32) -> TurnState {
        let setup = MatchSetup {
            base_x: 0,
            base_y: 0,
            heroes_per_player: 3,
        };
        let mut state = TurnState::new(setup, Ruleset::default());
        state
            .begin_turn(
                FactionSnapshot { health: 3, mana },
                FactionSnapshot { health: 3, mana: 0 },
            )
            .finish();
        state
    }

    #[test]
    fn test_render_commands() {
        let mut state = state_with_mana(100);
        let mut orders = Orders::new(&mut state);

        assert_eq!(orders.wait("idle").to_string(), "WAIT idle");
        assert_eq!(
            orders.move_to(Point::new(1200.4, 799.6), "go").to_string(),
            "MOVE 1200 800 go"
        );
        assert_eq!(
            orders.wind(Point::new(17630.0, 9000.0), "push").unwrap().to_string(),
            "SPELL WIND 17630 9000 push"
        );
        assert_eq!(
            orders.shield(4, "").unwrap().to_string(),
            "SPELL SHIELD 4 "
        );
        assert_eq!(
            orders
                .control(7, Point::new(10.0, 20.0), "away")
                .unwrap()
                .to_string(),
            "SPELL CONTROL 7 10 20 away"
        );
        assert_eq!(orders.mana(), 70);
    }

    #[test]
    fn test_spell_without_mana_fails() {
        let mut state = state_with_mana(15);
        let mut orders = Orders::new(&mut state);

        let first = orders.wind(Point::new(0.0, 0.0), "");
        assert!(first.unwrap().is_spell());
        assert_eq!(
            orders.shield(1, ""),
            Err(CommandError::InsufficientMana {
                available: 5,
                cost: 10
            })
        );
        assert!(!orders.wait("").is_spell());
        assert_eq!(state.me.mana, 5);
    }

    #[test]
    fn test_flagged_turn_overrides_messages() {
        let mut state = state_with_mana(10);
        state.flag_anomaly();
        let mut orders = Orders::new(&mut state);

        assert_eq!(orders.wait("hold").to_string(), "WAIT DEBUG");
        assert_eq!(
            orders.wind(Point::new(1.0, 2.0), "push").unwrap().to_string(),
            "SPELL WIND 1 2 DEBUG"
        );
    }
}
