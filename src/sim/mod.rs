//! Deterministic round engine
//!
//! All game logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time advances only through `tick`
//! - Stable iteration order (by container id)
//! - No rendering or platform dependencies

pub mod difficulty;
pub mod geometry;
pub mod permutation;
pub mod reward;
pub mod round;
pub mod shuffle;
pub mod state;
pub mod tick;
pub mod timeline;

pub use difficulty::{Difficulty, DifficultyController, compute as compute_difficulty};
pub use geometry::{Bounds, Calibration, Rect, Viewport, classify, classify_world};
pub use permutation::PermutationTracker;
pub use reward::RewardLedger;
pub use round::{ClickOutcome, IgnoreReason, PlayerInput, ShellGame, StartOutcome};
pub use shuffle::{AppliedSwap, SwapOp, SwapRun, generate as generate_swaps, run_sequentially};
pub use state::{
    Container, ContainerId, GameEvent, GamePhase, RevealKind, Round, SessionStats, Token, TokenId,
};
pub use tick::{TickInput, run_until, tick};
pub use timeline::{Cue, Timeline};
