//! The player entity and the controller that steers it.

use cgmath::{Deg, Point3};
use instant::Duration;
use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::{config::ControlsConfig, scene::SceneManager};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    position: Point3<f32>,
    rotation: Deg<f32>,
}

impl Player {
    pub fn new(position: Point3<f32>, rotation: Deg<f32>) -> Self {
        Self { position, rotation }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    /// Heading in degrees; 0° faces -Z.
    pub fn rotation(&self) -> Deg<f32> {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Deg<f32>) {
        self.rotation = rotation;
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 1.0, -5.0), Deg(0.0))
    }
}

/// Turns keyboard and mouse input into player motion.
///
/// | key            | action            |
/// |----------------|-------------------|
/// | W / S          | forward / back    |
/// | A / D          | strafe            |
/// | R / F          | up / down         |
/// | Q / E, ← / →   | turn              |
/// | right drag     | turn              |
#[derive(Debug)]
pub struct PlayerController {
    amount_forward: f32,
    amount_backward: f32,
    amount_left: f32,
    amount_right: f32,
    amount_up: f32,
    amount_down: f32,
    amount_turn_left: f32,
    amount_turn_right: f32,
    // Degrees accumulated from the mouse since the last update
    mouse_turn: f32,
    turning_with_mouse: bool,
    move_speed: f32,
    turn_speed: f32,
    mouse_sensitivity: f32,
}

impl PlayerController {
    pub fn new(controls: &ControlsConfig) -> Self {
        Self {
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_left: 0.0,
            amount_right: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            amount_turn_left: 0.0,
            amount_turn_right: 0.0,
            mouse_turn: 0.0,
            turning_with_mouse: false,
            move_speed: controls.move_speed,
            turn_speed: controls.turn_speed,
            mouse_sensitivity: controls.mouse_sensitivity,
        }
    }

    /// Returns `true` if the key is bound.
    pub fn process_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let amount = if pressed { 1.0 } else { 0.0 };
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => self.amount_forward = amount,
            KeyCode::KeyS | KeyCode::ArrowDown => self.amount_backward = amount,
            KeyCode::KeyA => self.amount_left = amount,
            KeyCode::KeyD => self.amount_right = amount,
            KeyCode::KeyR => self.amount_up = amount,
            KeyCode::KeyF => self.amount_down = amount,
            KeyCode::KeyQ | KeyCode::ArrowLeft => self.amount_turn_left = amount,
            KeyCode::KeyE | KeyCode::ArrowRight => self.amount_turn_right = amount,
            _ => return false,
        }
        true
    }

    /// Returns `true` if the event was consumed.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => self.process_key(*key, *state == ElementState::Pressed),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Right,
                ..
            } => {
                self.turning_with_mouse = state.is_pressed();
                true
            }
            WindowEvent::Focused(false) => {
                self.release_all();
                false
            }
            _ => false,
        }
    }

    /// Horizontal mouse motion in pixels; only counts while the right button
    /// is held.
    pub fn handle_mouse(&mut self, dx: f64) {
        if self.turning_with_mouse {
            self.mouse_turn += dx as f32 * self.mouse_sensitivity;
        }
    }

    pub fn release_all(&mut self) {
        *self = Self {
            move_speed: self.move_speed,
            turn_speed: self.turn_speed,
            mouse_sensitivity: self.mouse_sensitivity,
            ..Self::new(&ControlsConfig::default())
        };
    }

    /// Apply the held keys for `dt` and any pending mouse turn.
    pub fn update(&mut self, scene: &mut SceneManager, dt: Duration) {
        let dt = dt.as_secs_f32();

        let turn = (self.amount_turn_left - self.amount_turn_right) * self.turn_speed * dt;
        // moving the mouse right turns right
        let turn = turn - self.mouse_turn;
        self.mouse_turn = 0.0;
        if turn != 0.0 {
            scene.update_player_r(turn);
        }

        let forward = (self.amount_forward - self.amount_backward) * self.move_speed * dt;
        let right = (self.amount_right - self.amount_left) * self.move_speed * dt;
        let up = (self.amount_up - self.amount_down) * self.move_speed * dt;
        if forward != 0.0 {
            scene.move_player_forward(forward);
        }
        if right != 0.0 {
            scene.move_player_right(right);
        }
        if up != 0.0 {
            scene.move_player_up(up);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::Config;

    fn setup() -> (PlayerController, SceneManager) {
        let config = Config::default();
        (
            PlayerController::new(&config.controls),
            SceneManager::new(&config).unwrap(),
        )
    }

    #[test]
    fn unbound_keys_are_not_consumed() {
        let (mut controller, _) = setup();
        assert!(!controller.process_key(KeyCode::KeyZ, true));
        assert!(controller.process_key(KeyCode::KeyW, true));
    }

    #[test]
    fn holding_forward_moves_at_move_speed() {
        let (mut controller, mut scene) = setup();
        let start = scene.player().position();
        controller.process_key(KeyCode::KeyW, true);
        controller.update(&mut scene, Duration::from_millis(500));
        let end = scene.player().position();
        assert_relative_eq!(start.z - end.z, 3.0, epsilon = 1e-4);
        assert_relative_eq!(end.x, start.x, epsilon = 1e-6);
    }

    #[test]
    fn releasing_a_key_stops_motion() {
        let (mut controller, mut scene) = setup();
        controller.process_key(KeyCode::KeyD, true);
        controller.process_key(KeyCode::KeyD, false);
        let start = scene.player().position();
        controller.update(&mut scene, Duration::from_secs(1));
        assert_eq!(scene.player().position(), start);
    }

    #[test]
    fn opposite_keys_cancel() {
        let (mut controller, mut scene) = setup();
        controller.process_key(KeyCode::KeyR, true);
        controller.process_key(KeyCode::KeyF, true);
        let start = scene.player().position();
        controller.update(&mut scene, Duration::from_secs(1));
        assert_eq!(scene.player().position(), start);
    }

    #[test]
    fn turning_left_decreases_heading() {
        let (mut controller, mut scene) = setup();
        controller.process_key(KeyCode::KeyQ, true);
        controller.update(&mut scene, Duration::from_secs(1));
        assert_relative_eq!(scene.player().rotation().0, -90.0, epsilon = 1e-3);
    }

    #[test]
    fn mouse_only_turns_while_dragging() {
        let (mut controller, mut scene) = setup();
        controller.handle_mouse(100.0);
        controller.update(&mut scene, Duration::from_millis(16));
        assert_eq!(scene.player().rotation(), Deg(0.0));

        controller.turning_with_mouse = true;
        controller.handle_mouse(50.0);
        controller.update(&mut scene, Duration::from_millis(16));
        assert_relative_eq!(scene.player().rotation().0, 10.0, epsilon = 1e-4);

        // the accumulated turn is consumed
        controller.update(&mut scene, Duration::from_millis(16));
        assert_relative_eq!(scene.player().rotation().0, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn release_all_keeps_speeds() {
        let controls = ControlsConfig {
            move_speed: 1.0,
            turn_speed: 2.0,
            mouse_sensitivity: 3.0,
        };
        let mut controller = PlayerController::new(&controls);
        controller.process_key(KeyCode::KeyW, true);
        controller.release_all();
        assert_eq!(controller.amount_forward, 0.0);
        assert_eq!(controller.move_speed, 1.0);
        assert_eq!(controller.mouse_sensitivity, 3.0);
    }
}
