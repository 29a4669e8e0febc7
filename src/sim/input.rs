//! Player commands
//!
//! The input layer translates pointer, touch and keyboard events into
//! [`Command`]s in canvas coordinates. Pointer commands only act while a level
//! is being played.

use glam::Vec2;

use super::state::{ActiveDrag, GamePhase, GameState, Obstacle, ObstacleKind};
use super::tick;
use crate::consts::{DRAG_BOTTOM_MARGIN, ROTATE_STEP};
use crate::error::GameError;

/// A command from the input layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Place a new obstacle centered on `pos`
    PlaceObstacle { pos: Vec2, kind: ObstacleKind },
    /// Press on the canvas: grab the obstacle under the pointer, else place the selected kind
    PointerDown { pos: Vec2 },
    StartDrag { obstacle_id: u32, pointer: Vec2 },
    UpdateDrag { pointer: Vec2 },
    EndDrag,
    /// Double-click / double-tap
    RotateObstacleAt { pos: Vec2 },
    SelectObstacleKind(Option<ObstacleKind>),
    TogglePause,
    ResetLevel,
    /// 1-based level number
    SelectLevel(usize),
    NewGame,
}

/// What a [`Command::PointerDown`] ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Dragging(u32),
    Placed(u32),
    Ignored,
}

/// Apply a command to the session
///
/// Only level selection can fail; everything else is ignored when it does not
/// apply to the current phase.
pub fn apply(state: &mut GameState, command: Command) -> Result<(), GameError> {
    match command {
        Command::PlaceObstacle { pos, kind } => {
            place_obstacle(state, pos, kind);
        }
        Command::PointerDown { pos } => {
            pointer_down(state, pos);
        }
        Command::StartDrag {
            obstacle_id,
            pointer,
        } => {
            start_drag(state, obstacle_id, pointer);
        }
        Command::UpdateDrag { pointer } => {
            update_drag(state, pointer);
        }
        Command::EndDrag => end_drag(state),
        Command::RotateObstacleAt { pos } => {
            rotate_obstacle_at(state, pos);
        }
        Command::SelectObstacleKind(kind) => state.selected_obstacle = kind,
        Command::TogglePause => tick::toggle_pause(state),
        Command::ResetLevel => tick::reset_level(state),
        Command::SelectLevel(level) => tick::select_level(state, level)?,
        Command::NewGame => tick::new_game(state),
    }
    Ok(())
}

#[inline]
fn accepts_pointer(state: &GameState) -> bool {
    state.phase == GamePhase::Playing
}

/// Place an obstacle; returns its id
pub fn place_obstacle(state: &mut GameState, pos: Vec2, kind: ObstacleKind) -> Option<u32> {
    if !accepts_pointer(state) {
        return None;
    }
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle::new(id, kind, pos));
    log::debug!("Placed {} {} at ({}, {})", kind.as_str(), id, pos.x, pos.y);
    Some(id)
}

/// Place an obstacle by kind name; unknown names are ignored
pub fn place_obstacle_named(state: &mut GameState, pos: Vec2, kind: &str) -> Option<u32> {
    match ObstacleKind::parse(kind) {
        Some(kind) => place_obstacle(state, pos, kind),
        None => {
            log::warn!("Unknown obstacle type '{}'", kind);
            None
        }
    }
}

/// Grab the topmost obstacle under the pointer, or place the selected kind
pub fn pointer_down(state: &mut GameState, pos: Vec2) -> PointerAction {
    if !accepts_pointer(state) {
        return PointerAction::Ignored;
    }

    if let Some(id) = state.obstacle_at(pos).map(|o| o.id) {
        start_drag(state, id, pos);
        return PointerAction::Dragging(id);
    }

    match state.selected_obstacle {
        Some(kind) => place_obstacle(state, pos, kind)
            .map(PointerAction::Placed)
            .unwrap_or(PointerAction::Ignored),
        None => PointerAction::Ignored,
    }
}

/// Begin dragging an obstacle; the pointer keeps its offset from the center
pub fn start_drag(state: &mut GameState, obstacle_id: u32, pointer: Vec2) -> bool {
    if !accepts_pointer(state) {
        return false;
    }
    let Some(center) = state.obstacle(obstacle_id).map(|o| o.pos) else {
        log::warn!("Drag requested for missing obstacle {}", obstacle_id);
        return false;
    };
    state.drag = Some(ActiveDrag {
        obstacle_id,
        offset: pointer - center,
    });
    true
}

/// Move the dragged obstacle, keeping it on the canvas and clear of the collectors
pub fn update_drag(state: &mut GameState, pointer: Vec2) -> bool {
    if !accepts_pointer(state) {
        return false;
    }
    let Some(drag) = state.drag else {
        return false;
    };

    let canvas = state.canvas();
    let Some(obstacle) = state.obstacles.iter_mut().find(|o| o.id == drag.obstacle_id) else {
        state.drag = None;
        return false;
    };

    let half = obstacle.half_extents();
    let target = pointer - drag.offset;
    // max-then-min so an obstacle wider than the canvas still gets a position
    obstacle.pos = Vec2::new(
        target.x.max(half.x).min(canvas.x - half.x),
        target.y.max(half.y).min(canvas.y - DRAG_BOTTOM_MARGIN),
    );
    true
}

pub fn end_drag(state: &mut GameState) {
    state.drag = None;
}

/// Rotate the topmost obstacle under `pos` by 45 degrees; returns its id
pub fn rotate_obstacle_at(state: &mut GameState, pos: Vec2) -> Option<u32> {
    if !accepts_pointer(state) {
        return None;
    }
    let obstacle = state
        .obstacles
        .iter_mut()
        .rev()
        .find(|o| o.contains_point(pos))?;
    obstacle.rotation += ROTATE_STEP;
    Some(obstacle.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::f32::consts::FRAC_PI_4;

    fn playing() -> GameState {
        let mut state = GameState::new(Settings::default(), 5);
        apply(&mut state, Command::SelectLevel(1)).unwrap();
        state
    }

    #[test]
    fn test_place_then_rotate() {
        let mut state = playing();
        let id = place_obstacle(&mut state, Vec2::new(100.0, 100.0), ObstacleKind::Platform).unwrap();
        assert_eq!(rotate_obstacle_at(&mut state, Vec2::new(100.0, 100.0)), Some(id));
        assert_eq!(state.obstacle(id).unwrap().rotation, FRAC_PI_4);
    }

    #[test]
    fn test_rotate_misses_empty_space() {
        let mut state = playing();
        place_obstacle(&mut state, Vec2::new(100.0, 100.0), ObstacleKind::Spring);
        assert_eq!(rotate_obstacle_at(&mut state, Vec2::new(300.0, 300.0)), None);
    }

    #[test]
    fn test_unknown_kind_is_ignored() {
        let mut state = playing();
        assert_eq!(place_obstacle_named(&mut state, Vec2::new(10.0, 10.0), "cannon"), None);
        assert!(state.obstacles.is_empty());
        assert!(place_obstacle_named(&mut state, Vec2::new(10.0, 10.0), "ramp").is_some());
    }

    #[test]
    fn test_commands_ignored_when_not_playing() {
        let mut state = GameState::new(Settings::default(), 5);
        assert_eq!(place_obstacle(&mut state, Vec2::ZERO, ObstacleKind::Ramp), None);

        let mut state = playing();
        apply(&mut state, Command::TogglePause).unwrap();
        assert_eq!(
            pointer_down(&mut state, Vec2::new(100.0, 100.0)),
            PointerAction::Ignored
        );
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_drag_keeps_offset_and_clamps() {
        let mut state = playing();
        let id = place_obstacle(&mut state, Vec2::new(200.0, 200.0), ObstacleKind::Platform).unwrap();

        assert!(start_drag(&mut state, id, Vec2::new(210.0, 205.0)));
        assert!(update_drag(&mut state, Vec2::new(310.0, 305.0)));
        assert_eq!(state.obstacle(id).unwrap().pos, Vec2::new(300.0, 300.0));

        // Far off the bottom-right: held inside the canvas, above the collectors
        update_drag(&mut state, Vec2::new(5000.0, 5000.0));
        assert_eq!(state.obstacle(id).unwrap().pos, Vec2::new(750.0, 500.0));

        // Off the top-left
        update_drag(&mut state, Vec2::new(-100.0, -100.0));
        assert_eq!(state.obstacle(id).unwrap().pos, Vec2::new(50.0, 10.0));

        end_drag(&mut state);
        assert!(!update_drag(&mut state, Vec2::new(300.0, 300.0)));
        assert_eq!(state.drag, None);
    }

    #[test]
    fn test_start_drag_missing_obstacle() {
        let mut state = playing();
        assert!(!start_drag(&mut state, 999, Vec2::ZERO));
        assert_eq!(state.drag, None);
    }

    #[test]
    fn test_pointer_down_grabs_or_places() {
        let mut state = playing();
        assert_eq!(
            pointer_down(&mut state, Vec2::new(100.0, 100.0)),
            PointerAction::Ignored
        );

        apply(&mut state, Command::SelectObstacleKind(Some(ObstacleKind::Ramp))).unwrap();
        let placed = pointer_down(&mut state, Vec2::new(100.0, 100.0));
        let PointerAction::Placed(id) = placed else {
            panic!("expected placement, got {:?}", placed);
        };

        assert_eq!(
            pointer_down(&mut state, Vec2::new(110.0, 110.0)),
            PointerAction::Dragging(id)
        );
        assert_eq!(state.drag.map(|d| d.obstacle_id), Some(id));
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_select_level_command_rejects_bad_level() {
        let mut state = GameState::new(Settings::default(), 5);
        let err = apply(&mut state, Command::SelectLevel(9)).unwrap_err();
        assert!(matches!(err, GameError::LevelOutOfRange { requested: 9, .. }));
    }
}
