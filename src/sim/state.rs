//! Round state and core data types
//!
//! Jars and balls are plain identifiers here; presentation looks up its own
//! nodes by id, never the other way around.

use serde::{Deserialize, Serialize};

use super::geometry::Bounds;

/// Stable logical index of a jar, assigned once at table setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(pub usize);

impl ContainerId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identity of a hidden ball within a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

/// A jar on the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    /// Current physical slot (mutated only by swaps)
    pub slot: usize,
    pub bounds: Bounds,
    pub active: bool,
}

/// A hidden ball. Its position is always derived from the owning jar's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub owner: ContainerId,
}

/// Current phase of the round state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Between rounds
    Idle,
    /// Swaps are being applied
    Shuffling,
    /// Input gate open, waiting for the one accepted click
    WaitingForInput,
    /// A jar is lifted
    Revealing,
    /// Outcome shown, next round pending
    Settling,
}

/// Why a jar is being lifted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealKind {
    /// Opening demo: show where the ball starts, no guess involved
    Demo,
    /// The jar the player picked
    Guess,
    /// After a miss, the jar that actually held the ball
    Corrective,
}

/// Per-round bookkeeping, reset when the next round begins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based round counter for the session
    pub number: u32,
    pub demo: bool,
    pub swap_count: u32,
    pub swap_pace: f32,
    /// Streak when the round started
    pub streak: u32,
    /// Reward when the round started
    pub reward: u64,
    /// Jar the player picked
    pub guess: Option<ContainerId>,
    /// Outcome, known as soon as the click is accepted
    pub won: Option<bool>,
    /// The corrective reveal already ran (at most one per round)
    pub corrective_shown: bool,
}

/// Notifications for presentation, drained after each call into the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted {
        round: u32,
        demo: bool,
        swap_count: u32,
        swap_pace: f32,
    },
    SwapApplied {
        slot_a: usize,
        slot_b: usize,
        container_a: ContainerId,
        container_b: ContainerId,
    },
    /// Shuffle finished; the input gate is open
    InputOpened,
    RevealStart {
        container: ContainerId,
        tokens: Vec<TokenId>,
        kind: RevealKind,
    },
    RoundSettled {
        won: bool,
        streak: u32,
        reward: u64,
    },
    /// Self-restart suppressed; the session ends after the current round
    Stopped,
}

/// Session-wide counters (not persisted)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Rounds that reached a guess (demo excluded)
    pub rounds: u32,
    pub wins: u32,
    pub best_streak: u32,
}
