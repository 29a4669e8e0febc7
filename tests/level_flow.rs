use glam::Vec2;
use gravity_ball::Settings;
use gravity_ball::platform::FrameClock;
use gravity_ball::sim::input::{place_obstacle, rotate_obstacle_at};
use gravity_ball::sim::*;
use proptest::prelude::*;

fn frame_time(frame: u32) -> f64 {
    f64::from(frame) * 1000.0 / 60.0
}

fn start(settings: Settings, level: usize) -> GameState {
    let mut state = GameState::new(settings, 777);
    select_level(&mut state, level).unwrap();
    state
}

#[test]
fn test_level_one_after_fifteen_seconds() {
    // Tall canvas keeps the last ball in flight past the 15 s mark
    let mut state = start(Settings::with_canvas(800.0, 2000.0), 1);
    let mut clock = FrameClock::new();

    for frame in 0..=900 {
        clock.frame(&mut state, frame_time(frame));
    }

    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.spawned_balls, 10);
    assert_eq!(state.time_left, 45);

    // Quota holds for the rest of level 1; level 2 brings its own
    for frame in 901..=1800 {
        clock.frame(&mut state, frame_time(frame));
        if state.level() != 1 {
            break;
        }
        assert!(state.spawned_balls <= 10);
    }
}

#[test]
fn test_collector_scoring() {
    let mut state = start(Settings::default(), 1);
    let red = state.collectors.iter().find(|c| c.color == BallColor::Red).unwrap().pos;
    let blue = state.collectors.iter().find(|c| c.color == BallColor::Blue).unwrap().pos;

    let id = state.next_entity_id();
    state.balls.push(Ball::new(id, red, BallColor::Red));
    step(&mut state, 0.0);
    assert_eq!(state.score, 10);

    // Collected once, never again
    step(&mut state, 0.0);
    assert_eq!(state.score, 10);
    assert!(state.balls.iter().all(|b| b.id != id));

    let id = state.next_entity_id();
    state.balls.push(Ball::new(id, blue, BallColor::Red));
    step(&mut state, 0.0);
    assert_eq!(state.score, 5);

    let events = state.drain_events();
    let collected: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::BallCollected { matched, delta, .. } => Some((*matched, *delta)),
            _ => None,
        })
        .collect();
    assert_eq!(collected, vec![(true, 10), (false, -5)]);
}

#[test]
fn test_rotate_placed_obstacle() {
    let mut state = start(Settings::default(), 1);
    let id = place_obstacle(&mut state, Vec2::new(100.0, 100.0), ObstacleKind::Ramp).unwrap();
    rotate_obstacle_at(&mut state, Vec2::new(100.0, 100.0));
    assert_eq!(
        state.obstacle(id).unwrap().rotation,
        std::f32::consts::FRAC_PI_4
    );
}

#[test]
fn test_level_one_completes_and_advances() {
    let mut state = start(Settings::default(), 1);
    let mut clock = FrameClock::new();
    let mut completed_at = None;

    for frame in 0..(60 * 60) {
        clock.frame(&mut state, frame_time(frame));
        assert!(state.spawned_balls <= 10);

        if state.phase == GamePhase::LevelComplete && completed_at.is_none() {
            assert_eq!(state.spawned_balls, 10);
            assert!(state.balls.is_empty());
            completed_at = Some(frame);
        }
        if state.level() == 2 {
            break;
        }
    }

    let completed_at = completed_at.expect("level 1 should clear before its time limit");
    assert!(completed_at >= 810, "completed at frame {completed_at}");
    assert_eq!(state.level(), 2);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.time_left, 50);
    assert_eq!(state.physics().gravity, 12.0);
    assert!(state.obstacles.is_empty());
}

#[test]
fn test_running_out_of_time() {
    let mut state = start(Settings::default(), 1);
    for _ in 0..60 {
        tick_timer(&mut state);
    }
    assert_eq!(state.phase, GamePhase::GameOver { win: false });
    assert!(!state.is_running());

    // Frozen after game over
    step(&mut state, 100.0);
    assert!(state.balls.is_empty());
    assert_eq!(state.spawned_balls, 0);

    new_game(&mut state);
    assert_eq!(state.phase, GamePhase::Selecting);
    assert_eq!(state.score, 0);
}

#[test]
fn test_command_flow() {
    let mut state = GameState::new(Settings::default(), 3);
    assert!(apply(&mut state, Command::SelectLevel(0)).is_err());
    apply(&mut state, Command::SelectLevel(3)).unwrap();
    assert_eq!(state.level(), 3);

    apply(&mut state, Command::SelectObstacleKind(Some(ObstacleKind::Platform))).unwrap();
    apply(&mut state, Command::PointerDown { pos: Vec2::new(300.0, 300.0) }).unwrap();
    assert_eq!(state.obstacles.len(), 1);
    let id = state.obstacles[0].id;

    apply(&mut state, Command::PointerDown { pos: Vec2::new(310.0, 300.0) }).unwrap();
    apply(&mut state, Command::UpdateDrag { pointer: Vec2::new(410.0, 250.0) }).unwrap();
    apply(&mut state, Command::EndDrag).unwrap();
    assert_eq!(state.obstacle(id).unwrap().pos, Vec2::new(400.0, 250.0));

    apply(&mut state, Command::TogglePause).unwrap();
    assert!(state.is_paused());
    apply(&mut state, Command::TogglePause).unwrap();

    apply(&mut state, Command::ResetLevel).unwrap();
    assert!(state.obstacles.is_empty());
    assert_eq!(state.level(), 3);
}

#[test]
fn test_snapshot_serializes() {
    let mut state = start(Settings::default(), 1);
    place_obstacle(&mut state, Vec2::new(200.0, 200.0), ObstacleKind::Spring);
    step(&mut state, 16.0);

    let json = serde_json::to_value(state.snapshot()).unwrap();
    assert_eq!(json["level"], 1);
    assert_eq!(json["phase"], "Playing");
    assert_eq!(json["collectors"].as_array().unwrap().len(), 3);
    assert_eq!(json["obstacles"][0]["kind"], "spring");
    assert_eq!(json["balls"].as_array().unwrap().len(), 1);
}

proptest! {
    #[test]
    fn spawn_quota_never_exceeded(seed in any::<u64>(), frames in prop::collection::vec(1.0f32..100.0, 1..400)) {
        let mut state = GameState::new(Settings::default(), seed);
        select_level(&mut state, 1).unwrap();
        let quota = state.level_config().ball_count;

        for dt in frames {
            step(&mut state, dt);
            if state.level() != 1 {
                break;
            }
            prop_assert!(state.spawned_balls <= quota);
            if state.phase == GamePhase::LevelComplete {
                prop_assert_eq!(state.spawned_balls, quota);
                prop_assert_eq!(state.active_balls(), 0);
            }
        }
    }
}
