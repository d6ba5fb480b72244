// File Extensions
pub const BEATMAP_EXTENSION: &str = "osu";
pub const OUTPUT_EXTENSION: &str = "wind";

// Playfield
pub const LANE_COUNT: u8 = 9; // lanes are numbered 0..=8

// Map Defaults
pub const DEFAULT_DIFFICULTY: i32 = 1;
