//! Jar Shuffle - round engine for a shell game
//!
//! Core modules:
//! - `sim`: Deterministic round engine (permutation tracking, shuffle sequencing,
//!   difficulty, rewards, input gating)
//! - `settings`: Data-driven table layout and pacing
//! - `error`: Configuration and settings errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SettingsError};
pub use settings::{ContainerConfig, Settings};
pub use sim::{Calibration, ShellGame, Viewport};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz is plenty for a turn-based table)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Swaps per round before any streak scaling
    pub const BASE_SWAP_COUNT: u32 = 10;
    /// Seconds per swap animation before any streak scaling
    pub const BASE_SWAP_PACE: f32 = 0.35;

    /// Fastest swap pace allowed by the smooth difficulty curve
    pub const MIN_SWAP_PACE: f32 = 0.15;
    /// Fastest swap pace allowed once the hard escalation kicks in
    pub const MIN_HARD_SWAP_PACE: f32 = 0.12;
    /// Streak at which the hard escalation replaces the smooth curve
    pub const HARD_STREAK: u32 = 10;

    /// Pause after each swap lands before the next one begins
    pub const SWAP_SETTLE_SECS: f32 = 0.05;
    /// How long a jar stays lifted during a reveal
    pub const REVEAL_SECS: f32 = 0.6;
    /// Delay before the next round after a win
    pub const WIN_RESTART_SECS: f32 = 1.5;
    /// Delay before the next round after a loss
    pub const LOSS_RESTART_SECS: f32 = 2.0;
    /// Delay between the demo reveal and the first real round
    pub const DEMO_SETTLE_SECS: f32 = 1.0;

    /// Reward paid out on the first win of a streak
    pub const FIRST_WIN_REWARD: u64 = 2;
}
