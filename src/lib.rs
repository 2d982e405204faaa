// Allow unwrap and lossy casts in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::cast_possible_truncation))]
//! Warden: the decision core of a turn-based arena-control bot.
//!
//! Each turn the referee reports monsters and heroes; this crate turns that
//! telemetry into state a strategy can query:
//! - Exact line/circle and circle/circle intersections
//! - Threat classification for every monster against my base
//! - Faction mana bookkeeping and hero commands
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Protocol shell / Recordings       │
//! ├─────────────────────────────────────┤
//! │   Turn state, factions, entities    │
//! ├─────────────────────────────────────┤
//! │         Geometry kernel             │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod game;
pub mod geometry;
pub mod protocol;
pub mod replay;

pub use error::{GeometryError, GeometryResult};

// Re-export key types at crate root for convenience
pub use game::{
    Command, Entity, EntityKind, EntityRecord, Faction, MatchSetup, Orders, Ruleset, TurnInput,
    TurnState,
};
pub use geometry::{Circle, Crossing, Point};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_display() {
        let message = GeometryError::InvalidRadius(-2.0).to_string();
        assert!(message.contains("-2"));
        assert!(GeometryError::CoincidentCircles.to_string().contains("coincide"));
    }
}
