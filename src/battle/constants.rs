//! Battle constants - fallback values for content files that omit them

// Battle map
pub const DEFAULT_GRID_COLS: u32 = 15;
pub const DEFAULT_GRID_ROWS: u32 = 12;
pub const DEFAULT_HEX_SIZE: u32 = 30; // pixels, rendering only

// Player stat block
pub const PLAYER_HP: u32 = 100;
pub const PLAYER_SPEED: u32 = 30;
pub const PLAYER_MANA: u32 = 30;

// Race/class characters: mana = BASE + 2 * intelligence + wisdom
pub const CHARACTER_BASE_MANA: u32 = 20;
pub const DEFAULT_RACE: &str = "human";
pub const DEFAULT_CLASS: &str = "warrior";

// Spell costs by spell level
pub const LEVEL_1_MANA_COST: u32 = 5;
pub const LEVEL_2_MANA_COST: u32 = 10;

// Turn counter starts here
pub const FIRST_TURN: u32 = 1;
