//! Dice that replay a fixed sequence of faces
//!
//! Used to replay a recorded battle and to pin rolls in tests.

use std::collections::VecDeque;

use crate::dice::{DiceNotation, DiceRoll, DiceRoller};

/// Replays queued faces; an exhausted script rolls the lowest face
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
    dice_rolled: usize,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            dice_rolled: 0,
        }
    }

    /// Queue more faces
    pub fn push(&mut self, faces: impl IntoIterator<Item = u32>) {
        self.faces.extend(faces);
    }

    /// Faces not yet consumed
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }

    /// Individual dice rolled so far
    pub fn dice_rolled(&self) -> usize {
        self.dice_rolled
    }
}

impl DiceRoller for ScriptedDice {
    fn roll(&mut self, notation: &DiceNotation) -> DiceRoll {
        let sides = notation.sides.max(1);
        let rolls = (0..notation.count)
            .map(|_| {
                self.dice_rolled += 1;
                self.faces.pop_front().unwrap_or(1).clamp(1, sides)
            })
            .collect();
        DiceRoll::from_faces(rolls, notation.modifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order() {
        let mut dice = ScriptedDice::new([4, 2, 6]);
        let roll = dice.roll(&DiceNotation::new(2, 6, 1));
        assert_eq!(roll.rolls, vec![4, 2]);
        assert_eq!(roll.total, 7);
        assert_eq!(dice.remaining(), 1);
        assert_eq!(dice.dice_rolled(), 2);
    }

    #[test]
    fn test_faces_clamped_to_die() {
        let mut dice = ScriptedDice::new([20]);
        assert_eq!(dice.roll(&DiceNotation::new(1, 6, 0)).rolls, vec![6]);
    }

    #[test]
    fn test_exhausted_script_rolls_lowest() {
        let mut dice = ScriptedDice::default();
        assert_eq!(dice.roll(&DiceNotation::new(1, 20, 0)).rolls, vec![1]);
    }
}
