//! Line protocol spoken with the game referee.
//!
//! ```text
//! setup:      baseX baseY
//!             heroesPerPlayer
//! each turn:  health mana            (me)
//!             health mana            (opponent)
//!             entityCount
//!             id type x y shieldLife isControlled health vx vy nearBase threatFor
//!             ...
//! ```
//!
//! A row with an unknown entity kind or threat code is dropped and counted;
//! any other malformed line is an error.

use std::fmt;
use std::io::{self, BufRead};

use tracing::warn;

use crate::game::{
    EntityKind, EntityRecord, FactionSnapshot, MatchSetup, ThreatTarget, TurnInput,
};
use crate::geometry::Point;

/// Number of integers on an entity row.
pub const ENTITY_FIELDS: usize = 11;

/// Error reading the referee's input.
#[derive(Debug)]
pub enum ProtocolError {
    /// Reading stdin failed.
    Io(io::Error),
    /// Input ended in the middle of a block.
    UnexpectedEof {
        /// Line number that was expected.
        line: usize,
    },
    /// A line did not have the expected shape.
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },
    /// Entity row with an unknown kind code.
    UnknownEntityKind {
        /// 1-based line number.
        line: usize,
        /// The code received.
        code: i64,
    },
    /// Entity row with an unknown threat code.
    UnknownThreat {
        /// 1-based line number.
        line: usize,
        /// The code received.
        code: i64,
    },
}

impl ProtocolError {
    /// True for errors that only invalidate one entity row.
    #[must_use]
    pub const fn is_row_level(&self) -> bool {
        matches!(
            self,
            Self::UnknownEntityKind { .. } | Self::UnknownThreat { .. }
        )
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof { line } => write!(f, "Unexpected end of input at line {line}"),
            Self::Malformed { line, reason } => write!(f, "Malformed line {line}: {reason}"),
            Self::UnknownEntityKind { line, code } => {
                write!(f, "Unknown entity kind {code} at line {line}")
            }
            Self::UnknownThreat { line, code } => {
                write!(f, "Unknown threat code {code} at line {line}")
            }
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ProtocolError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Parse exactly `N` whitespace-separated integers.
fn parse_numbers<const N: usize>(text: &str, line: usize) -> Result<[i64; N], ProtocolError> {
    let mut values = [0i64; N];
    let mut fields = text.split_whitespace();
    for (index, slot) in values.iter_mut().enumerate() {
        let field = fields.next().ok_or_else(|| ProtocolError::Malformed {
            line,
            reason: format!("expected {N} fields, found {index}"),
        })?;
        *slot = field.parse().map_err(|_| ProtocolError::Malformed {
            line,
            reason: format!("field {} is not an integer: {field:?}", index + 1),
        })?;
    }
    if fields.next().is_some() {
        return Err(ProtocolError::Malformed {
            line,
            reason: format!("expected {N} fields, found more"),
        });
    }
    Ok(values)
}

fn to_u32(value: i64, field: &str, line: usize) -> Result<u32, ProtocolError> {
    u32::try_from(value).map_err(|_| ProtocolError::Malformed {
        line,
        reason: format!("{field} out of range: {value}"),
    })
}

fn to_i32(value: i64, field: &str, line: usize) -> Result<i32, ProtocolError> {
    i32::try_from(value).map_err(|_| ProtocolError::Malformed {
        line,
        reason: format!("{field} out of range: {value}"),
    })
}

/// Coordinates fit comfortably in `i32`, so the conversion is exact.
fn coordinate(value: i64, field: &str, line: usize) -> Result<f64, ProtocolError> {
    to_i32(value, field, line).map(f64::from)
}

/// Parse one entity row.
///
/// `line` is only used for error reporting.
///
/// # Errors
///
/// Returns [`ProtocolError::UnknownEntityKind`] or
/// [`ProtocolError::UnknownThreat`] for unknown codes, and
/// [`ProtocolError::Malformed`] for anything else that is wrong.
pub fn parse_entity_row(text: &str, line: usize) -> Result<EntityRecord, ProtocolError> {
    let [id, kind, x, y, shield_life, is_controlled, health, vx, vy, near_base, threat_for] =
        parse_numbers::<ENTITY_FIELDS>(text, line)?;

    let kind = EntityKind::from_code(kind)
        .ok_or(ProtocolError::UnknownEntityKind { line, code: kind })?;
    let threat_for = ThreatTarget::from_code(threat_for)
        .ok_or(ProtocolError::UnknownThreat { line, code: threat_for })?;

    Ok(EntityRecord {
        id: to_u32(id, "id", line)?,
        kind,
        position: Point::new(coordinate(x, "x", line)?, coordinate(y, "y", line)?),
        shield_life: to_u32(shield_life, "shieldLife", line)?,
        is_controlled: is_controlled != 0,
        health: to_u32(health, "health", line)?,
        vector: Point::new(coordinate(vx, "vx", line)?, coordinate(vy, "vy", line)?),
        near_base: near_base != 0,
        threat_for,
        turns_before_hit: None,
    })
}

/// Reads the setup and then one turn at a time.
#[derive(Debug)]
pub struct TurnReader<R> {
    reader: R,
    line: usize,
    buffer: String,
}

impl<R: BufRead> TurnReader<R> {
    /// Wrap a buffered reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buffer: String::new(),
        }
    }

    /// Number of lines consumed so far.
    #[must_use]
    pub const fn lines_read(&self) -> usize {
        self.line
    }

    /// Read the two setup lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the input ends or a line is malformed.
    pub fn read_setup(&mut self) -> Result<MatchSetup, ProtocolError> {
        let (line, text) = self.expect_line()?;
        let [base_x, base_y] = parse_numbers::<2>(&text, line)?;
        let (line, text) = self.expect_line()?;
        let [heroes] = parse_numbers::<1>(&text, line)?;

        Ok(MatchSetup {
            base_x: to_i32(base_x, "baseX", line - 1)?,
            base_y: to_i32(base_y, "baseY", line - 1)?,
            heroes_per_player: to_u32(heroes, "heroesPerPlayer", line)?,
        })
    }

    /// Read one turn.
    ///
    /// Returns `Ok(None)` when the input ends cleanly between turns. Rows with
    /// unknown codes are logged, dropped and counted in [`TurnInput::dropped`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input ends mid-turn or a line is malformed.
    pub fn read_turn(&mut self) -> Result<Option<TurnInput>, ProtocolError> {
        let Some((line, text)) = self.next_line()? else {
            return Ok(None);
        };
        let me = Self::parse_snapshot(&text, line)?;
        let (line, text) = self.expect_line()?;
        let enemy = Self::parse_snapshot(&text, line)?;
        let (line, text) = self.expect_line()?;
        let [count] = parse_numbers::<1>(&text, line)?;
        let count = to_u32(count, "entityCount", line)?;

        let mut input = TurnInput {
            me,
            enemy,
            entities: Vec::new(),
            dropped: 0,
        };
        for _ in 0..count {
            let (line, text) = self.expect_line()?;
            match parse_entity_row(&text, line) {
                Ok(record) => input.entities.push(record),
                Err(e) if e.is_row_level() => {
                    warn!(line, row = %text, error = %e, "dropping entity row");
                    input.dropped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Some(input))
    }

    fn parse_snapshot(text: &str, line: usize) -> Result<FactionSnapshot, ProtocolError> {
        let [health, mana] = parse_numbers::<2>(text, line)?;
        Ok(FactionSnapshot {
            health: to_u32(health, "health", line)?,
            mana: to_u32(mana, "mana", line)?,
        })
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>, ProtocolError> {
        self.buffer.clear();
        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        Ok(Some((self.line, self.buffer.trim().to_string())))
    }

    fn expect_line(&mut self) -> Result<(usize, String), ProtocolError> {
        let expected = self.line + 1;
        self.next_line()?
            .ok_or(ProtocolError::UnexpectedEof { line: expected })
    }
}
