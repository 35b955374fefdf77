//! Jar Shuffle headless runner
//!
//! Plays a session with a simulated player at the fixed timestep and logs
//! what presentation would animate.
//!
//! Usage: `jar-shuffle [settings.json] [rounds]`

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use jar_shuffle::consts::*;
use jar_shuffle::settings::Settings;
use jar_shuffle::sim::{GameEvent, GamePhase, PlayerInput, ShellGame, TickInput, tick};

/// Give up if a session stalls this long (game seconds)
const MAX_SESSION_SECS: f32 = 3600.0;

fn main() {
    env_logger::init();
    log::info!("Jar Shuffle (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("Failed to load {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let rounds: u32 = args.next().and_then(|r| r.parse().ok()).unwrap_or(10);

    let mut game = ShellGame::new(settings);
    let mut player = Pcg32::seed_from_u64(game.seed() ^ 0x5eed);

    if let Err(err) = game.start_round(true) {
        eprintln!("Cannot start: {}", err);
        std::process::exit(1);
    }

    let mut settled = 0;
    let mut elapsed = 0.0;
    let mut input = TickInput::default();
    while elapsed < MAX_SESSION_SECS {
        // The player clicks a random jar as soon as the gate opens
        if game.is_input_open() {
            let ids: Vec<_> = game
                .containers()
                .iter()
                .filter(|c| c.active)
                .map(|c| c.id)
                .collect();
            let pick = ids[player.random_range(0..ids.len())];
            if let Some(point) = game.screen_point_of(pick) {
                input.clicks.push(PlayerInput::Pointer(point));
            }
        }

        tick(&mut game, &input, SIM_DT);
        input = TickInput::default();
        elapsed += SIM_DT;

        for event in game.drain_events() {
            match event {
                GameEvent::RoundSettled { won, streak, reward } => {
                    settled += 1;
                    println!(
                        "Round {:>3}: {} (streak {}, reward {})",
                        settled,
                        if won { "correct" } else { "wrong  " },
                        streak,
                        reward
                    );
                    if settled >= rounds {
                        input.stop = true;
                    }
                }
                other => log::debug!("{:?}", other),
            }
        }

        if !game.auto_restart() && game.phase() == GamePhase::Idle {
            break;
        }
    }

    let stats = game.stats();
    println!(
        "\n{} rounds, {} wins, best streak {} ({:.1}s of game time)",
        stats.rounds,
        stats.wins,
        stats.best_streak,
        game.now()
    );
}
