//! CPU Overload headless runner
//!
//! Plays one autopiloted session at a simulated 60 Hz and reports the result.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Result, ensure};
    use clap::Parser;
    use cpu_overload::audio::{AudioManager, LogBackend};
    use cpu_overload::sim::{Autopilot, GameEvent, GamePhase};
    use cpu_overload::{Difficulty, GameConfig, GameMode, Session, platform};

    /// Simulated frame length
    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Parser, Debug)]
    #[command(name = "cpu-overload")]
    #[command(about = "Headless CPU Overload run driven by the autopilot")]
    struct Cli {
        /// Game mode: arithmetic or numbers (defaults to the saved choice)
        #[arg(long)]
        mode: Option<GameMode>,
        /// Difficulty: easy, medium or hard (defaults to the saved choice)
        #[arg(long)]
        difficulty: Option<Difficulty>,
        /// Simulated seconds to play
        #[arg(long, default_value_t = 120.0)]
        seconds: f64,
        /// Run seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Autopilot keystroke pace in ms
        #[arg(long, default_value_t = 180.0)]
        typing_interval_ms: f64,
        /// Keep scores and settings in memory only
        #[arg(long)]
        no_save: bool,
    }

    pub fn run() -> Result<()> {
        platform::init_logging();
        let cli = Cli::parse();
        ensure!(cli.seconds > 0.0, "--seconds must be positive, got {}", cli.seconds);

        let store = if cli.no_save {
            platform::ephemeral_store()
        } else {
            platform::default_store()
        };
        let seed = cli.seed.unwrap_or_else(platform::random_seed);
        let mut session = Session::new(store, seed);
        let saved = session.config();
        let config = GameConfig::new(
            cli.mode.unwrap_or(saved.mode),
            cli.difficulty.unwrap_or(saved.difficulty),
        );
        session.configure(config)?;

        let mut audio = AudioManager::new(Box::new(LogBackend));
        audio.apply_settings(session.settings());
        let mut pilot = Autopilot::new(cli.typing_interval_ms);

        log::info!(
            "CPU Overload (headless) starting: {} {} for {}s, seed {}",
            config.mode.as_str(),
            config.difficulty.as_str(),
            cli.seconds,
            seed
        );
        let started = platform::now_ms();
        session.start();

        let frames = (cli.seconds * 1000.0 / FRAME_MS).ceil() as u64;
        let mut solved = 0u32;
        let mut missed = 0u32;
        let mut now = 0.0;
        for frame in 0..frames {
            now = frame as f64 * FRAME_MS;
            if let Some(value) = pilot.next_input(session.state(), now) {
                session.on_input_change(&value, now);
            }
            session.tick(now);

            let events = session.drain_events();
            for event in &events {
                match event {
                    GameEvent::TaskSolved { .. } => solved += 1,
                    GameEvent::TaskMissed { damage, .. } if *damage > 0 => missed += 1,
                    _ => {}
                }
            }
            audio.handle_events(&events);

            if session.phase() == GamePhase::GameOver {
                break;
            }
        }

        let snap = session.snapshot(now);
        log::info!(
            "Finished in phase {:?} after {:.1}s simulated ({:.0}ms wall)",
            snap.phase,
            now / 1000.0,
            platform::now_ms() - started
        );
        println!(
            "score {} | level {} | health {} | solved {} | missed {} | best {}",
            snap.score, snap.level, snap.health, solved, missed, snap.high_score
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser shell links the library directly
}
