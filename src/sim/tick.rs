//! Fixed timestep driver
//!
//! Player input is handled first, then every cue that falls due within the
//! step fires in order, each at the time it was due. Follow-up cues a handler
//! schedules are timed from that moment, so one long step plays out exactly
//! like many short ones.

use super::round::{ClickOutcome, PlayerInput, ShellGame};
use crate::consts::SIM_DT;

/// Input collected since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Clicks in arrival order
    pub clicks: Vec<PlayerInput>,
    /// End the session after the current round
    pub stop: bool,
}

/// Advance the game by `dt` seconds. Returns the outcome of each click.
pub fn tick(game: &mut ShellGame, input: &TickInput, dt: f32) -> Vec<ClickOutcome> {
    if input.stop {
        game.stop();
    }

    let outcomes = input.clicks.iter().map(|click| game.submit(*click)).collect();

    let until = game.timeline.now() + dt.max(0.0) as f64;
    while let Some(cue) = game.timeline.pop_due_by(until) {
        game.handle_cue(cue);
    }
    game.timeline.advance_to(until);

    outcomes
}

/// Tick with no input until `done` holds or `max_secs` of game time pass.
/// Returns whether `done` was reached.
pub fn run_until(game: &mut ShellGame, mut done: impl FnMut(&ShellGame) -> bool, max_secs: f32) -> bool {
    let idle = TickInput::default();
    let steps = (max_secs / SIM_DT).ceil() as u32;
    for _ in 0..steps {
        if done(game) {
            return true;
        }
        tick(game, &idle, SIM_DT);
    }
    done(game)
}
