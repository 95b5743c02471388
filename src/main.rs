//! Space Monkey headless runner
//!
//! Plays the game in idle mode at a fixed 60 Hz and prints the final frame.
//!
//! Usage: `space-monkey [TUNING.json|-] [SECONDS] [SEED]`

#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use space_monkey::{
    Tuning,
    consts::SIM_DT,
    sim::{GameEvent, GameState, TickInput, tick},
};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SECONDS: f32 = 60.0;
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SEED: u64 = 42;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let tuning = match args.first().map(String::as_str) {
        None | Some("-") => Tuning::default(),
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
    };

    let seconds = match args.get(1).map(|s| s.parse::<f32>()) {
        None => DEFAULT_SECONDS,
        Some(Ok(s)) if s > 0.0 => s,
        Some(_) => {
            log::error!("SECONDS must be a positive number");
            return ExitCode::FAILURE;
        }
    };

    let seed = match args.get(2).map(|s| s.parse::<u64>()) {
        None => DEFAULT_SEED,
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("SEED must be an unsigned integer: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut state = match GameState::with_tuning(seed, tuning) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("Space Monkey (headless) running {:.0}s with seed {}", seconds, seed);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let frames = (seconds / SIM_DT).ceil() as u64;
    let mut dashes = 0u32;
    let mut hits = 0u32;

    for _ in 0..frames {
        tick(&mut state, &input, SIM_DT);

        for event in &state.events {
            match event {
                GameEvent::DashStarted => dashes += 1,
                GameEvent::ShipDamaged { health } => {
                    hits += 1;
                    log::info!("Hit! {} health left", health);
                }
                _ => {}
            }
        }

        if state.session.exit_requested
            || state.session.is_game_over()
            || state.session.is_victory()
        {
            break;
        }
    }

    log::info!(
        "Finished in {:?} after {:.1}s: {} fruit, {} dashes, {} hits",
        state.session.phase,
        state.session.elapsed,
        state.session.collected_fruit,
        dashes,
        hits
    );

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser front end drives the simulation itself
}
