//! Remote-first dice with a local fallback
//!
//! The one place where a failed or malformed dice service answer is turned
//! into a local roll. Callers never see the failure.

use tracing::warn;

use crate::dice::{DiceNotation, DiceRoll, DiceRoller, DiceService, LocalDice};

/// Tries `S` first, falls back to a seeded `LocalDice`
pub struct ResilientDice<S> {
    service: S,
    fallback: LocalDice,
    fallbacks_used: u32,
}

impl<S: DiceService> ResilientDice<S> {
    pub fn new(service: S, fallback_seed: u64) -> Self {
        Self {
            service,
            fallback: LocalDice::new(fallback_seed),
            fallbacks_used: 0,
        }
    }

    /// How many rolls were served locally
    pub fn fallbacks_used(&self) -> u32 {
        self.fallbacks_used
    }
}

impl<S: DiceService> DiceRoller for ResilientDice<S> {
    fn roll(&mut self, notation: &DiceNotation) -> DiceRoll {
        match self.service.fetch_roll(notation) {
            Ok(roll) if roll.is_consistent_with(notation) => return roll,
            Ok(roll) => {
                warn!(%notation, ?roll, "dice service returned an impossible roll, rolling locally");
            }
            Err(e) => {
                warn!(%notation, error = %e, "dice service unavailable, rolling locally");
            }
        }
        self.fallbacks_used += 1;
        self.fallback.roll(notation)
    }
}
