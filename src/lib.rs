//! Hex Skirmish - turn-based tactical duels on a hex grid

pub mod battle;
pub mod core;
pub mod dice;
pub mod llm;
