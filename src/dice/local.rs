//! In-process dice, seeded for deterministic replays

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::dice::{DiceNotation, DiceRoll, DiceRoller};

/// Uniform local roller backed by ChaCha8
#[derive(Debug, Clone)]
pub struct LocalDice {
    rng: ChaCha8Rng,
}

impl LocalDice {
    /// Deterministic roller for a given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Roller seeded from the thread RNG
    pub fn from_random_seed() -> Self {
        Self::new(rand::random())
    }
}

impl DiceRoller for LocalDice {
    fn roll(&mut self, notation: &DiceNotation) -> DiceRoll {
        let sides = notation.sides.max(1);
        let rolls = (0..notation.count)
            .map(|_| self.rng.gen_range(1..=sides))
            .collect();
        DiceRoll::from_faces(rolls, notation.modifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolls_stay_in_range() {
        let mut dice = LocalDice::new(7);
        let notation = DiceNotation::new(3, 6, 2);
        for _ in 0..200 {
            let roll = dice.roll(&notation);
            assert!(roll.is_consistent_with(&notation));
            assert!(roll.total >= notation.min_total() && roll.total <= notation.max_total());
        }
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let notation = DiceNotation::new(4, 20, 0);
        let mut a = LocalDice::new(42);
        let mut b = LocalDice::new(42);
        for _ in 0..20 {
            assert_eq!(a.roll(&notation), b.roll(&notation));
        }
    }
}
