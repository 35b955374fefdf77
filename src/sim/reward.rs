//! Streak and reward bookkeeping
//!
//! First win of a streak pays [`FIRST_WIN_REWARD`], every further win doubles
//! it, any loss wipes both streak and reward.

use serde::{Deserialize, Serialize};

use crate::consts::FIRST_WIN_REWARD;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardLedger {
    streak: u32,
    reward: u64,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consecutive correct guesses
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Current payout
    pub fn reward(&self) -> u64 {
        self.reward
    }

    /// Record a win, returns the new reward
    pub fn record_win(&mut self) -> u64 {
        self.streak += 1;
        self.reward = if self.reward == 0 {
            FIRST_WIN_REWARD
        } else {
            self.reward.saturating_mul(2)
        };
        self.reward
    }

    /// Record a loss: streak and reward drop to zero
    pub fn record_loss(&mut self) {
        self.streak = 0;
        self.reward = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_doubles_then_resets() {
        let mut ledger = RewardLedger::new();
        assert_eq!(ledger.reward(), 0);

        let rewards: Vec<u64> = (0..3).map(|_| ledger.record_win()).collect();
        assert_eq!(rewards, vec![2, 4, 8]);
        assert_eq!(ledger.streak(), 3);

        ledger.record_loss();
        assert_eq!(ledger.reward(), 0);
        assert_eq!(ledger.streak(), 0);

        assert_eq!(ledger.record_win(), 2);
        assert_eq!(ledger.streak(), 1);
    }

    #[test]
    fn test_reward_saturates() {
        let mut ledger = RewardLedger::new();
        for _ in 0..80 {
            ledger.record_win();
        }
        assert_eq!(ledger.reward(), u64::MAX);
        assert_eq!(ledger.streak(), 80);
    }
}
