//! Streak-driven difficulty
//!
//! More wins mean more swaps and faster swaps. The curve is smooth up to
//! [`HARD_STREAK`], then jumps to a fixed hard setting.

use serde::{Deserialize, Serialize};

use crate::consts::{HARD_STREAK, MIN_HARD_SWAP_PACE, MIN_SWAP_PACE};

/// Swap count and pace for one round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub swap_count: u32,
    /// Seconds per swap (lower is faster)
    pub swap_pace: f32,
}

/// Pure difficulty curve
pub fn compute(streak: u32, base: Difficulty) -> Difficulty {
    if streak >= HARD_STREAK {
        return Difficulty {
            swap_count: (base.swap_count as f64 * 2.5).floor() as u32,
            swap_pace: (base.swap_pace / 2.5).max(MIN_HARD_SWAP_PACE),
        };
    }

    let multiplier = 1.0 + streak as f64 * 0.1;
    Difficulty {
        swap_count: (base.swap_count as f64 * multiplier).floor() as u32,
        swap_pace: (base.swap_pace / (1.0 + streak as f32 * 0.12)).max(MIN_SWAP_PACE),
    }
}

/// Holds the baseline captured at game start and the current setting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyController {
    baseline: Difficulty,
    current: Difficulty,
}

impl DifficultyController {
    pub fn new(baseline: Difficulty) -> Self {
        Self {
            baseline,
            current: baseline,
        }
    }

    pub fn baseline(&self) -> Difficulty {
        self.baseline
    }

    pub fn current(&self) -> Difficulty {
        self.current
    }

    /// Recompute the current setting for a streak (always from the baseline)
    pub fn update(&mut self, streak: u32) -> Difficulty {
        self.current = compute(streak, self.baseline);
        self.current
    }

    /// Back to the baseline
    pub fn reset(&mut self) {
        self.current = self.baseline;
    }
}
