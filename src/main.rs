//! Lane Runner headless entry point
//!
//! Plays one run at a fixed frame rate with an autopilot picking lanes.
//! Usage: `lane-runner [seed] [config.json]`

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use lane_runner::cues::CuePlayer;
use lane_runner::sim::SegmentPhase;
use lane_runner::{GameConfig, GameEvent, GameSession, format_pence};

/// Simulated frame length (60 FPS)
const FRAME_DT: f32 = 1.0 / 60.0;
/// Safety cap on simulated frames
const MAX_FRAMES: u32 = 60 * 60 * 10;

fn load_config(args: &[String]) -> lane_runner::Result<GameConfig> {
    let mut config = match args.get(2) {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| {
                lane_runner::GameError::InvalidConfig(format!("cannot read {path}: {e}"))
            })?;
            GameConfig::from_json(&json)?
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = args.get(1) {
        let seed = seed
            .parse::<u64>()
            .map_err(|e| lane_runner::GameError::InvalidConfig(format!("bad seed {seed}: {e}")))?;
        config.seed = Some(seed);
    }
    Ok(config)
}

fn run(config: GameConfig) -> lane_runner::Result<()> {
    let lanes = config.lanes;
    let mut session = GameSession::new(config)?;
    // Separate stream so the pilot never mirrors the obstacle draws
    let mut pilot = Pcg32::seed_from_u64(!session.controller().engine().seed());

    session.subscribe(CuePlayer::new(|cue| log::debug!("cue: {:?}", cue)));
    session.subscribe(|event: &GameEvent| match event {
        GameEvent::CheckpointResolved(result) => {
            println!(
                "CP {:>2}: chose {} obstacle @ {:?} => {} | Total {}",
                result.index + 1,
                result.chosen_lane + 1,
                result.obstacle_lanes.iter().map(|l| l + 1).collect::<Vec<_>>(),
                if result.safe { "SAFE" } else { "HIT" },
                format_pence(result.total_prize)
            );
        }
        GameEvent::CoinCollected { total, .. } => {
            log::info!("Coin! total {}", format_pence(*total));
        }
        _ => {}
    });

    session.start()?;
    let mut frames = 0;
    while !matches!(session.phase(), SegmentPhase::Ended) && frames < MAX_FRAMES {
        if session.phase() == SegmentPhase::AwaitingChoice {
            let lane = pilot.random_range(0..lanes) as i32;
            session.submit_lane_choice(lane)?;
        }
        session.advance_time(FRAME_DT);
        frames += 1;
    }

    let summary = session.summary();
    println!("\n=== Game Over ===");
    println!(
        "Checkpoints traversed: {}/{}",
        summary.checkpoints, summary.max_checkpoints
    );
    println!(
        "Final prize: {} (coins {})",
        format_pence(summary.prize),
        format_pence(summary.coin_bonus)
    );
    println!("Safe: {}, Hits: {}", summary.safe_count, summary.hit_count);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lane Runner (headless) starting...");

    let args: Vec<String> = std::env::args().collect();
    let outcome = load_config(&args).and_then(run);
    if let Err(err) = outcome {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser build drives a GameSession from its own frame loop
}
