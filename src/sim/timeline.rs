//! Fire-and-forget scheduled cues
//!
//! Pacing of the shuffle and reveal phases. Once scheduled a cue cannot be
//! cancelled; cues due at the same time fire in the order they were scheduled.

use serde::{Deserialize, Serialize};

/// What to do when a scheduled delay elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Swap animation finished: apply the next swap
    ApplySwap,
    /// Post-swap pause finished
    SwapSettled,
    /// Reveal animation finished
    RevealDone,
    /// Settle delay finished: back to idle
    SettleDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Scheduled {
    at: f64,
    seq: u64,
    cue: Cue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    /// Seconds since the session began
    now: f64,
    next_seq: u64,
    /// Kept sorted by (at, seq)
    pending: Vec<Scheduled>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Schedule a cue `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, cue: Cue) {
        let entry = Scheduled {
            at: self.now + delay.max(0.0) as f64,
            seq: self.next_seq,
            cue,
        };
        self.next_seq += 1;
        let pos = self
            .pending
            .iter()
            .position(|s| (s.at, s.seq) > (entry.at, entry.seq))
            .unwrap_or(self.pending.len());
        self.pending.insert(pos, entry);
    }

    /// Move the clock forward
    pub fn advance(&mut self, dt: f32) {
        self.advance_to(self.now + dt.max(0.0) as f64);
    }

    /// Move the clock to `until`; never runs backwards
    pub fn advance_to(&mut self, until: f64) {
        self.now = self.now.max(until);
    }

    /// Pop the earliest cue that is due now, if any
    pub fn pop_due(&mut self) -> Option<Cue> {
        self.pop_due_by(self.now)
    }

    /// Pop the earliest cue due at or before `until`. The clock moves to the
    /// moment that cue was due, so anything its handler schedules is timed
    /// from there rather than from `until`.
    pub fn pop_due_by(&mut self, until: f64) -> Option<Cue> {
        match self.pending.first() {
            Some(first) if first.at <= until => {
                let entry = self.pending.remove(0);
                self.now = self.now.max(entry.at);
                Some(entry.cue)
            }
            _ => None,
        }
    }

    /// Seconds until the next cue fires
    pub fn time_to_next(&self) -> Option<f64> {
        self.pending.first().map(|s| (s.at - self.now).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_time_order() {
        let mut t = Timeline::new();
        t.schedule(0.5, Cue::RevealDone);
        t.schedule(0.2, Cue::ApplySwap);
        assert_eq!(t.pop_due(), None);

        t.advance(0.3);
        assert_eq!(t.pop_due(), Some(Cue::ApplySwap));
        assert_eq!(t.pop_due(), None);

        t.advance(0.3);
        assert_eq!(t.pop_due(), Some(Cue::RevealDone));
        assert!(t.is_idle());
    }

    #[test]
    fn test_same_time_keeps_schedule_order() {
        let mut t = Timeline::new();
        t.schedule(0.0, Cue::SwapSettled);
        t.schedule(0.0, Cue::SettleDone);
        assert_eq!(t.pop_due(), Some(Cue::SwapSettled));
        assert_eq!(t.pop_due(), Some(Cue::SettleDone));
    }

    #[test]
    fn test_pop_due_by_times_follow_ups_from_the_fired_cue() {
        let mut t = Timeline::new();
        t.schedule(0.25, Cue::ApplySwap);

        assert_eq!(t.pop_due_by(2.0), Some(Cue::ApplySwap));
        assert_eq!(t.now(), 0.25);

        // Scheduled from 0.25, so still inside the same step
        t.schedule(0.5, Cue::SwapSettled);
        assert_eq!(t.pop_due_by(2.0), Some(Cue::SwapSettled));
        assert_eq!(t.now(), 0.75);

        t.schedule(1.5, Cue::SettleDone);
        assert_eq!(t.pop_due_by(2.0), None);
        t.advance_to(2.0);
        assert_eq!(t.now(), 2.0);
        assert!((t.time_to_next().unwrap() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_advance_to_never_rewinds() {
        let mut t = Timeline::new();
        t.advance(1.0);
        t.advance_to(0.5);
        assert_eq!(t.now(), 1.0);
    }

    #[test]
    fn test_time_to_next() {
        let mut t = Timeline::new();
        assert_eq!(t.time_to_next(), None);
        t.schedule(1.0, Cue::SettleDone);
        t.advance(0.25);
        assert!((t.time_to_next().unwrap() - 0.75).abs() < 1e-9);
    }
}
