//! Round state machine
//!
//! Idle -> Shuffling -> WaitingForInput -> Revealing -> Settling -> Idle, then
//! the next round starts on its own until the session is stopped. The opening
//! demo round jumps from Idle straight to Revealing.
//!
//! The input gate is owned here and nowhere else. Every input path goes
//! through [`ShellGame::submit`], which closes the gate before hit-testing so a
//! second event for the same physical click can never be accepted.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{Difficulty, DifficultyController};
use super::geometry::classify;
use super::permutation::PermutationTracker;
use super::reward::RewardLedger;
use super::shuffle::{self, SwapRun};
use super::state::{
    Container, ContainerId, GameEvent, GamePhase, RevealKind, Round, SessionStats,
};
use super::timeline::{Cue, Timeline};
use crate::error::ConfigError;
use crate::settings::Settings;

/// A click as delivered by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerInput {
    /// Raw pointer release, screen coordinates
    Pointer(Vec2),
    /// Release reported by a jar's own listener
    Container(ContainerId),
}

/// Why a click was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Not waiting for a guess (idle, shuffling, demo)
    NotAccepting,
    /// This round's guess was already taken
    GateClosed,
    /// Missed every active jar
    NoContainer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickOutcome {
    Accepted { container: ContainerId, won: bool },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartOutcome {
    Started { demo: bool },
    /// A round is already in progress
    Ignored,
}

/// The shell game engine
#[derive(Debug, Clone)]
pub struct ShellGame {
    settings: Settings,
    /// Nominal position of each slot (the jars' initial positions)
    slot_positions: Vec<Vec2>,
    tracker: PermutationTracker,
    difficulty: DifficultyController,
    ledger: RewardLedger,
    seed: u64,
    rng: Pcg32,
    pub(crate) timeline: Timeline,
    phase: GamePhase,
    round: Option<Round>,
    swaps: SwapRun,
    reveal: Option<RevealKind>,
    /// The input gate
    input_open: bool,
    demo_available: bool,
    auto_restart: bool,
    rounds_started: u32,
    stats: SessionStats,
    events: Vec<GameEvent>,
}

impl ShellGame {
    /// Set up the table. Configuration problems surface on [`ShellGame::start_round`].
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        log::info!(
            "Table ready: {} containers, seed {}",
            settings.containers.len(),
            seed
        );

        let containers = settings
            .containers
            .iter()
            .enumerate()
            .map(|(i, c)| Container {
                id: ContainerId(i),
                slot: i,
                bounds: c.bounds(),
                active: c.active,
            })
            .collect();
        let slot_positions = settings.containers.iter().map(|c| c.position).collect();
        let difficulty = DifficultyController::new(Difficulty {
            swap_count: settings.base_swap_count,
            swap_pace: settings.base_swap_pace,
        });

        Self {
            settings,
            slot_positions,
            tracker: PermutationTracker::new(containers),
            difficulty,
            ledger: RewardLedger::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            timeline: Timeline::new(),
            phase: GamePhase::Idle,
            round: None,
            swaps: SwapRun::default(),
            reveal: None,
            input_open: false,
            demo_available: true,
            auto_restart: true,
            rounds_started: 0,
            stats: SessionStats::default(),
            events: Vec::new(),
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// The current (or last finished) round
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn streak(&self) -> u32 {
        self.ledger.streak()
    }

    pub fn reward(&self) -> u64 {
        self.ledger.reward()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty.current()
    }

    pub fn tracker(&self) -> &PermutationTracker {
        &self.tracker
    }

    pub fn containers(&self) -> &[Container] {
        self.tracker.containers()
    }

    pub fn slot_positions(&self) -> &[Vec2] {
        &self.slot_positions
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn is_input_open(&self) -> bool {
        self.input_open
    }

    pub fn auto_restart(&self) -> bool {
        self.auto_restart
    }

    /// Session clock in seconds
    pub fn now(&self) -> f64 {
        self.timeline.now()
    }

    /// Swaps still to apply this round
    pub fn swaps_remaining(&self) -> usize {
        self.swaps.remaining()
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Screen point at the center of a jar's hit-box in its current slot
    pub fn screen_point_of(&self, id: ContainerId) -> Option<Vec2> {
        let container = self.tracker.container(id)?;
        let position = *self.slot_positions.get(container.slot)?;
        let hit_box = container.bounds.hit_box(position);
        let center = (hit_box.min + hit_box.max) * 0.5;
        Some(self.settings.viewport.to_screen(center))
    }

    // === Session control ===

    /// Suppress the self-restart; the current round still runs to completion
    pub fn stop(&mut self) {
        if self.auto_restart {
            self.auto_restart = false;
            log::info!("Session stopping after the current round");
            self.events.push(GameEvent::Stopped);
        }
    }

    /// Re-enable the self-restart (takes effect at the next settle)
    pub fn resume(&mut self) {
        self.auto_restart = true;
    }

    // === Transitions ===

    /// Begin a round. Ignored unless idle; fails when the table cannot host a
    /// round. `is_demo` is honored only for the first round of the session.
    pub fn start_round(&mut self, is_demo: bool) -> Result<StartOutcome, ConfigError> {
        if self.phase != GamePhase::Idle {
            log::debug!("Start ignored: round already in progress ({:?})", self.phase);
            return Ok(StartOutcome::Ignored);
        }
        if let Err(err) = self.settings.validate() {
            log::error!("Cannot start round: {}", err);
            return Err(err);
        }

        let active = self.tracker.active_ids();
        let needed = self.settings.required_active();
        if active.len() < needed {
            let err = if active.is_empty() {
                ConfigError::NoActiveContainers
            } else {
                ConfigError::NotEnoughActiveContainers {
                    needed,
                    active: active.len(),
                }
            };
            log::error!("Cannot start round: {}", err);
            return Err(err);
        }
        let first = active[self.rng.random_range(0..active.len())];
        let mut owners = vec![first];
        if self.settings.double_token {
            let rest: Vec<ContainerId> = active.iter().copied().filter(|c| *c != first).collect();
            let second = if rest.is_empty() {
                log::warn!("Double token on a one-jar table; both balls share it");
                first
            } else {
                rest[self.rng.random_range(0..rest.len())]
            };
            owners.push(second);
        }
        self.tracker.place_tokens(&owners);

        let demo = is_demo && self.demo_available;
        self.demo_available = false;

        let streak = self.ledger.streak();
        let difficulty = self.difficulty.update(streak);
        self.rounds_started += 1;
        self.round = Some(Round {
            number: self.rounds_started,
            demo,
            swap_count: difficulty.swap_count,
            swap_pace: difficulty.swap_pace,
            streak,
            reward: self.ledger.reward(),
            guess: None,
            won: None,
            corrective_shown: false,
        });
        self.events.push(GameEvent::RoundStarted {
            round: self.rounds_started,
            demo,
            swap_count: difficulty.swap_count,
            swap_pace: difficulty.swap_pace,
        });
        log::info!(
            "Round {} started (demo: {}, streak: {}, swaps: {}, pace: {:.3}s)",
            self.rounds_started,
            demo,
            streak,
            difficulty.swap_count,
            difficulty.swap_pace
        );

        if demo {
            let owners = self.token_owners();
            self.begin_reveal(&owners, RevealKind::Demo);
            return Ok(StartOutcome::Started { demo });
        }

        self.phase = GamePhase::Shuffling;
        let ops = shuffle::generate(self.tracker.len(), difficulty.swap_count, &mut self.rng);
        self.swaps = SwapRun::new(ops);
        if self.swaps.is_empty() {
            self.open_input();
        } else {
            self.timeline.schedule(difficulty.swap_pace, Cue::ApplySwap);
        }
        Ok(StartOutcome::Started { demo })
    }

    /// Pointer shorthand for [`ShellGame::submit`]
    pub fn submit_click(&mut self, screen_point: Vec2) -> ClickOutcome {
        self.submit(PlayerInput::Pointer(screen_point))
    }

    /// The single entry point for player input
    pub fn submit(&mut self, input: PlayerInput) -> ClickOutcome {
        if !self.input_open {
            let guessed = self.round.as_ref().is_some_and(|r| r.guess.is_some());
            let reason = match self.phase {
                GamePhase::Revealing | GamePhase::Settling if guessed => IgnoreReason::GateClosed,
                _ => IgnoreReason::NotAccepting,
            };
            log::debug!("Click ignored ({:?}): {:?}", reason, input);
            return ClickOutcome::Ignored(reason);
        }
        self.input_open = false;

        let target = match input {
            PlayerInput::Pointer(point) => classify(
                point,
                &self.settings.viewport,
                self.tracker.containers(),
                &self.slot_positions,
            ),
            PlayerInput::Container(id) => self
                .tracker
                .container(id)
                .filter(|c| c.active)
                .map(|c| c.id),
        };

        match target {
            Some(container) => self.resolve_guess(container),
            None => {
                self.input_open = true;
                log::debug!("Click ignored: {:?} hit no container", input);
                ClickOutcome::Ignored(IgnoreReason::NoContainer)
            }
        }
    }

    fn resolve_guess(&mut self, container: ContainerId) -> ClickOutcome {
        let won = self.tracker.holds_token(container);
        if won {
            self.ledger.record_win();
            self.stats.wins += 1;
            self.stats.best_streak = self.stats.best_streak.max(self.ledger.streak());
        } else {
            self.ledger.record_loss();
            self.difficulty.reset();
        }
        self.stats.rounds += 1;

        if let Some(round) = self.round.as_mut() {
            round.guess = Some(container);
            round.won = Some(won);
        }
        log::info!(
            "Guess {:?}: {} (streak: {}, reward: {})",
            container,
            if won { "correct" } else { "wrong" },
            self.ledger.streak(),
            self.ledger.reward()
        );

        self.begin_reveal(&[container], RevealKind::Guess);
        ClickOutcome::Accepted { container, won }
    }

    fn open_input(&mut self) {
        self.phase = GamePhase::WaitingForInput;
        self.input_open = true;
        self.events.push(GameEvent::InputOpened);
        log::debug!("Shuffle complete, waiting for a guess");
    }

    /// Jars hiding a ball, without repeats, in ball order
    fn token_owners(&self) -> Vec<ContainerId> {
        let mut owners: Vec<ContainerId> = Vec::new();
        for token in self.tracker.tokens() {
            if !owners.contains(&token.owner) {
                owners.push(token.owner);
            }
        }
        owners
    }

    /// Lift every given jar at once; a single `RevealDone` ends the reveal
    fn begin_reveal(&mut self, containers: &[ContainerId], kind: RevealKind) {
        self.phase = GamePhase::Revealing;
        self.reveal = Some(kind);
        for &container in containers {
            self.events.push(GameEvent::RevealStart {
                container,
                tokens: self.tracker.tokens_in(container),
                kind,
            });
        }
        self.timeline.schedule(self.settings.reveal_secs, Cue::RevealDone);
    }

    /// Dispatch a scheduled cue
    pub(crate) fn handle_cue(&mut self, cue: Cue) {
        log::debug!("Cue {:?} at {:.3}s ({:?})", cue, self.timeline.now(), self.phase);
        match cue {
            Cue::ApplySwap => self.on_apply_swap(),
            Cue::SwapSettled => self.on_swap_settled(),
            Cue::RevealDone => self.on_reveal_done(),
            Cue::SettleDone => self.on_settle_done(),
        }
    }

    fn on_apply_swap(&mut self) {
        if self.phase != GamePhase::Shuffling {
            log::warn!("Swap cue outside shuffle ({:?})", self.phase);
            return;
        }
        if let Some(applied) = self.swaps.apply_next(&mut self.tracker) {
            log::debug!(
                "Swap slots {} <-> {} ({:?} <-> {:?})",
                applied.op.slot_a,
                applied.op.slot_b,
                applied.container_a,
                applied.container_b
            );
            self.events.push(GameEvent::SwapApplied {
                slot_a: applied.op.slot_a,
                slot_b: applied.op.slot_b,
                container_a: applied.container_a,
                container_b: applied.container_b,
            });
        }
        self.timeline
            .schedule(self.settings.swap_settle_secs, Cue::SwapSettled);
    }

    fn on_swap_settled(&mut self) {
        if self.phase != GamePhase::Shuffling {
            return;
        }
        if self.swaps.is_finished() {
            self.open_input();
        } else {
            self.timeline
                .schedule(self.difficulty.current().swap_pace, Cue::ApplySwap);
        }
    }

    fn on_reveal_done(&mut self) {
        if self.phase != GamePhase::Revealing {
            return;
        }
        let kind = self.reveal.take();
        let reveal_on_miss = self.settings.reveal_on_miss;
        let owners = self.token_owners();

        let corrective = match (kind, self.round.as_mut()) {
            (Some(RevealKind::Guess), Some(round))
                if round.won == Some(false)
                    && reveal_on_miss
                    && !round.corrective_shown
                    && !owners.is_empty() =>
            {
                round.corrective_shown = true;
                true
            }
            _ => false,
        };

        if corrective {
            self.begin_reveal(&owners, RevealKind::Corrective);
        } else {
            self.settle();
        }
    }

    fn settle(&mut self) {
        self.phase = GamePhase::Settling;
        let (demo, won) = self
            .round
            .as_ref()
            .map(|r| (r.demo, r.won.unwrap_or(false)))
            .unwrap_or((false, false));

        let delay = if demo {
            self.settings.demo_settle_secs
        } else {
            self.events.push(GameEvent::RoundSettled {
                won,
                streak: self.ledger.streak(),
                reward: self.ledger.reward(),
            });
            if won {
                self.settings.win_restart_secs
            } else {
                self.settings.loss_restart_secs
            }
        };
        self.timeline.schedule(delay, Cue::SettleDone);
    }

    fn on_settle_done(&mut self) {
        if self.phase != GamePhase::Settling {
            return;
        }
        self.phase = GamePhase::Idle;
        self.tracker.clear_tokens();

        if !self.auto_restart {
            log::info!(
                "Session stopped: {} rounds, {} wins, best streak {}",
                self.stats.rounds,
                self.stats.wins,
                self.stats.best_streak
            );
            return;
        }
        if let Err(err) = self.start_round(false) {
            log::error!("Next round failed to start: {}", err);
        }
    }
}
