//! Battlefield terrain and its effect on movement
//!
//! Terrain is uniform per battlefield and only changes what a step costs.

use serde::{Deserialize, Serialize};

/// Ground type of a battlefield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Terrain {
    Cave,
    #[default]
    Forest,
    Desert, // Loose sand, every step costs a fifth more
    Winter,
}

impl Terrain {
    /// Movement cost multiplier (1.0 = normal)
    pub fn movement_multiplier(&self) -> f32 {
        match self {
            Terrain::Cave => 1.0,
            Terrain::Forest => 1.0,
            Terrain::Desert => 1.2,
            Terrain::Winter => 1.0,
        }
    }

    pub fn profile(&self) -> TerrainProfile {
        TerrainProfile {
            movement_multiplier: self.movement_multiplier(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Terrain::Cave => "cave",
            Terrain::Forest => "forest",
            Terrain::Desert => "desert",
            Terrain::Winter => "winter",
        }
    }
}

/// Read-only movement profile consumed by path costing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainProfile {
    /// Non-negative multiplier on the base step cost
    pub movement_multiplier: f32,
}

impl TerrainProfile {
    /// Returns None for negative or non-finite multipliers
    pub fn new(movement_multiplier: f32) -> Option<Self> {
        (movement_multiplier.is_finite() && movement_multiplier >= 0.0)
            .then_some(Self { movement_multiplier })
    }

    /// Cost of one hex step
    pub fn step_cost(&self, base_movement_cost: u32) -> f64 {
        // Multiply in f32 so 5 * 1.2 lands on 6.0 rather than 6.0000002
        (base_movement_cost as f32 * self.movement_multiplier) as f64
    }
}

impl Default for TerrainProfile {
    fn default() -> Self {
        Terrain::default().profile()
    }
}
