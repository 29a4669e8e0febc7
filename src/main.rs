//! Gravity Ball entry point
//!
//! The web build is driven from JavaScript through `platform::web`. Natively
//! this runs a headless playthrough with a fixed obstacle layout and logs
//! what happens.
//!
//! Usage: `gravity-ball [settings.json] [seed] [low|medium|high]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use gravity_ball::Settings;
    use gravity_ball::consts::FRAME_MS;
    use gravity_ball::platform::FrameClock;
    use gravity_ball::sim::{Command, GameEvent, GamePhase, GameState, ObstacleKind, apply};
    use std::path::PathBuf;

    env_logger::init();
    log::info!("Gravity Ball (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(2024);

    let mut settings = Settings::load(settings_path.as_deref());
    if let Some(quality) = args.next() {
        settings.set_quality(&quality);
    }
    let mut state = GameState::new(settings, seed);
    let canvas = state.canvas();
    let mut clock = FrameClock::new();

    if let Err(e) = apply(&mut state, Command::SelectLevel(1)) {
        log::error!("{}", e);
        return;
    }

    // Funnel toward the middle collector and bounce strays back up
    let layout = [
        (Vec2::new(canvas.x * 0.25, canvas.y * 0.45), ObstacleKind::Ramp),
        (Vec2::new(canvas.x * 0.75, canvas.y * 0.45), ObstacleKind::Platform),
        (Vec2::new(canvas.x * 0.5, canvas.y * 0.65), ObstacleKind::Spring),
    ];
    let mut level = state.level();
    let place_layout = |state: &mut GameState| {
        let placements = layout
            .iter()
            .map(|&(pos, kind)| Command::PlaceObstacle { pos, kind });
        // Tilt the right-hand platform toward the center
        let rotate = Command::RotateObstacleAt { pos: layout[1].0 };
        for command in placements.chain(std::iter::once(rotate)) {
            if let Err(e) = apply(state, command) {
                log::error!("Layout command failed: {}", e);
            }
        }
    };
    place_layout(&mut state);

    let mut frame: u64 = 0;
    let frame_limit = 60 * 60 * 5;
    while frame < frame_limit {
        clock.frame(&mut state, frame as f64 * f64::from(FRAME_MS));
        frame += 1;

        for event in state.drain_events() {
            match event {
                GameEvent::BallCollected { color, matched, delta, .. } => log::info!(
                    "{} ball {} ({:+})",
                    color.as_str(),
                    if matched { "sorted" } else { "missorted" },
                    delta
                ),
                GameEvent::LevelComplete { level } => log::info!("Level {} complete", level),
                GameEvent::GameOver { win, score } => {
                    log::info!("Game over: {} with {} points", if win { "won" } else { "lost" }, score)
                }
                _ => {}
            }
        }

        if state.phase == GamePhase::Playing && state.level() != level {
            level = state.level();
            place_layout(&mut state);
        }
        if matches!(state.phase, GamePhase::GameOver { .. }) {
            break;
        }
    }

    println!(
        "\nFinished at level {} after {:.1}s: score {}, phase {:?}",
        state.level(),
        frame as f32 * FRAME_MS / 1000.0,
        state.score,
        state.phase
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
