//! The leveling curve.
//!
//! Level-up cost grows 20% per level; XP left over after a level-up
//! carries forward, and one large delta can cascade through several
//! levels in a single call.

/// Cost of the first level-up.
pub const BASE_LEVEL_COST: u32 = 1000;

/// Geometric growth per level.
pub const LEVEL_GROWTH_RATE: f64 = 1.2;

/// A profile's leveling fields, detached from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelState {
    pub level: u32,
    pub current_xp: u32,
    pub xp_to_next_level: u32,
    pub total_xp: u64,
}

impl LevelState {
    /// A fresh level-1 profile.
    pub fn new() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            xp_to_next_level: xp_to_next_level(1),
            total_xp: 0,
        }
    }
}

impl Default for LevelState {
    fn default() -> Self {
        Self::new()
    }
}

/// XP required to leave the given level: floor(1000 x 1.2^(level-1)).
pub fn xp_to_next_level(level: u32) -> u32 {
    let level = level.max(1);
    (f64::from(BASE_LEVEL_COST) * LEVEL_GROWTH_RATE.powi(level as i32 - 1)).floor() as u32
}

/// Apply an XP delta, cascading through as many level-ups as it covers.
pub fn apply_xp(state: LevelState, delta: u32) -> LevelState {
    let mut state = state;
    state.total_xp += u64::from(delta);
    state.current_xp += delta;
    while state.current_xp >= state.xp_to_next_level {
        state.current_xp -= state.xp_to_next_level;
        state.level += 1;
        state.xp_to_next_level = xp_to_next_level(state.level);
    }
    state
}
