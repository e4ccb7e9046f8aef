// src/cost.rs
//
// Upgrade cost model: what it still takes to bring a brawler from its
// current power level to the maximum.

use crate::config::consts::MAX_LEVEL;

/// (power points, coins) for each level transition; entry `i` covers
/// level `i + 1` → `i + 2`, so the last entry is 10 → 11.
pub static COST_TABLE: [(u64, u64); 10] = [
    (20, 20),
    (30, 35),
    (50, 75),
    (80, 140),
    (130, 290),
    (210, 480),
    (340, 800),
    (550, 1250),
    (890, 1875),
    (1440, 2800),
];

/// Remaining (points, coins) to reach max level from `level`.
/// Levels below 1 count as 1; max level and above cost nothing.
pub fn remaining_cost(level: i64) -> (u64, u64) {
    let level = level.max(1);
    if level >= MAX_LEVEL {
        return (0, 0);
    }
    let from = (level - 1) as usize;
    COST_TABLE[from..]
        .iter()
        .fold((0, 0), |(p, c), &(dp, dc)| (p + dp, c + dc))
}
