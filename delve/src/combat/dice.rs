//! Dice used by skill power

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// `count` dice of `sides` faces plus a flat `bonus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub count: u32,
    pub sides: u32,
    #[serde(default)]
    pub bonus: i32,
}

impl DiceRoll {
    pub fn new(count: u32, sides: u32, bonus: i32) -> Self {
        Self { count, sides, bonus }
    }

    /// Faceless dice contribute nothing
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        if self.sides == 0 {
            return self.bonus;
        }
        let faces: u32 = (0..self.count).map(|_| rng.random_range(1..=self.sides)).sum();
        faces as i32 + self.bonus
    }

    pub fn range(&self) -> RangeInclusive<i32> {
        let low = if self.sides == 0 { 0 } else { self.count as i32 };
        low + self.bonus..=(self.count * self.sides) as i32 + self.bonus
    }
}
