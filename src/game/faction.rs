//! Faction state: base, health, mana and live heroes.

use crate::game::{CommandError, Entity, EntityId, Point};

/// One side of the match.
#[derive(Debug, Clone, PartialEq)]
pub struct Faction {
    /// Corner of the arena this faction defends.
    pub base: Point,
    /// Remaining base health.
    pub base_health: u32,
    /// Mana available this turn.
    pub mana: u32,
    /// Heroes seen this turn, in input order.
    pub heroes: Vec<Entity>,
    /// Mana cost of one spell.
    cast_cost: u32,
}

impl Faction {
    /// Create a faction with no heroes.
    #[must_use]
    pub fn new(base: Point, base_health: u32, mana: u32, cast_cost: u32) -> Self {
        Self {
            base,
            base_health,
            mana,
            heroes: Vec::new(),
            cast_cost,
        }
    }

    /// Overwrite base health from the turn input.
    pub fn set_health(&mut self, value: u32) {
        self.base_health = value;
    }

    /// Overwrite mana from the turn input.
    pub fn set_mana(&mut self, value: u32) {
        self.mana = value;
    }

    /// Mana cost of one spell.
    #[must_use]
    pub const fn cast_cost(&self) -> u32 {
        self.cast_cost
    }

    /// True if one spell is affordable.
    #[must_use]
    pub const fn can_cast(&self) -> bool {
        self.mana >= self.cast_cost
    }

    /// True if a spell is affordable while keeping `secure_level` more in reserve.
    ///
    /// `can_secure_cast(0)` is the same as [`Faction::can_cast`].
    #[must_use]
    pub fn can_secure_cast(&self, secure_level: u32) -> bool {
        u64::from(self.mana) >= u64::from(self.cast_cost) * (u64::from(secure_level) + 1)
    }

    /// Component-wise absolute offset of `point` from this faction's base.
    #[must_use]
    pub fn coord_to_base(&self, point: Point) -> Point {
        Point::new((self.base.x - point.x).abs(), (self.base.y - point.y).abs())
    }

    /// Look up a hero by id.
    #[must_use]
    pub fn hero(&self, id: EntityId) -> Option<&Entity> {
        self.heroes.iter().find(|hero| hero.id == id)
    }

    /// Spend the mana for one spell.
    pub(crate) fn debit_cast(&mut self) -> Result<(), CommandError> {
        if !self.can_cast() {
            return Err(CommandError::InsufficientMana {
                available: self.mana,
                cost: self.cast_cost,
            });
        }
        self.mana -= self.cast_cost;
        Ok(())
    }
}
