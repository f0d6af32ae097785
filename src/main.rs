//! Stick Soccer entry point
//!
//! Native builds run a headless demo match: both sides on autopilot, driven
//! through the fixed-timestep accumulator, with the final snapshot printed as
//! JSON. Front ends embed the library and feed their own input and sink.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::Parser;

    fn parse_seconds(arg: &str) -> Result<f32, String> {
        let secs: f32 = arg.parse().map_err(|e| format!("{e}"))?;
        if secs.is_finite() && secs > 0.0 {
            Ok(secs)
        } else {
            Err(format!("duration must be a positive number of seconds, got {arg}"))
        }
    }

    #[derive(Parser, Debug)]
    #[command(name = "stick-soccer")]
    #[command(
        about = "Run a headless autopilot match and print the final snapshot",
        long_about = None
    )]
    pub struct Args {
        /// Settings JSON file (defaults when omitted)
        #[arg(long)]
        pub settings: Option<PathBuf>,

        /// Match seed
        #[arg(long, default_value_t = 0x5EED_BA11)]
        pub seed: u64,

        /// Seconds of simulated play before stopping
        #[arg(long, default_value_t = 90.0, value_parser = parse_seconds)]
        pub seconds: f32,
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    use stick_soccer::Settings;
    use stick_soccer::audio::LogSink;
    use stick_soccer::sim::{FixedStepper, GameState, MatchPhase, TickInput, tick};

    /// Simulated frame time (a 144 Hz display does not divide the 60 Hz tick)
    const FRAME_DT: f32 = 1.0 / 144.0;

    env_logger::init();
    let args = cli::Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let seconds = args.seconds;
    log::info!("Stick Soccer (headless) seed {}, {seconds:.0}s of demo play", args.seed);

    let mut state = GameState::new(args.seed, settings);
    let mut stepper = FixedStepper::new();
    let mut sink = LogSink::new();
    let input = TickInput::idle();

    let frames = (seconds / FRAME_DT).ceil() as u64;
    let mut last_scores = state.scores;
    for _ in 0..frames {
        stepper.advance(FRAME_DT, |dt| tick(&mut state, &input, &mut sink, dt));

        if state.scores != last_scores {
            log::info!(
                "[{:.1}s] score {}-{}",
                state.time_ticks as f32 * stepper.step(),
                state.scores[0],
                state.scores[1]
            );
            last_scores = state.scores;
        }
        if state.phase == MatchPhase::MatchOver {
            break;
        }
    }

    log::info!("Finished after {} ticks, {} sounds", state.time_ticks, sink.sounds_played());
    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web front ends drive `sim::tick` themselves
}
