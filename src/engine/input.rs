// Input state tracking for the keyboard.
// Abstracts winit events into held-key state plus press-only events, and
// maps both onto what the aquarium cares about: where the player fish
// swims, where it faces, and the discrete toggles.

use std::collections::HashSet;

use glam::{Vec2, Vec3};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::animation::{try_normalize2, try_normalize3};

/// Discrete actions fired once per key press (never on repeat or release).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    CloseRequested,
    ToggleMouth,
    ToggleOverlay,
}

/// Per-frame intent derived from held keys.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementIntent {
    /// Unit-length swim direction, or `None` when no movement key is held.
    pub movement: Option<Vec3>,
    /// Unit-length facing on the XZ plane (x, z), independent of `movement`.
    pub facing: Option<Vec2>,
}

pub struct InputState {
    keys_held: HashSet<KeyCode>,
    events: Vec<InputEvent>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_held: HashSet::new(),
            events: Vec::new(),
        }
    }

    /// Feed a winit WindowEvent into the input state.
    /// Call this once per event before the game's own event handling.
    ///
    /// Returns true when the window itself asked to close. That request is
    /// not queued: the caller must exit straight away, since a minimised
    /// window may never see another redraw.
    pub fn process_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed if event.repeat => {}
                        ElementState::Pressed => self.press(key),
                        ElementState::Released => self.release(key),
                    }
                }
            }
            WindowEvent::CloseRequested => return true,
            WindowEvent::Focused(false) => self.keys_held.clear(),
            _ => {}
        }
        false
    }

    pub fn press(&mut self, key: KeyCode) {
        self.keys_held.insert(key);
        match key {
            KeyCode::Escape => self.events.push(InputEvent::CloseRequested),
            KeyCode::KeyM => self.events.push(InputEvent::ToggleMouth),
            KeyCode::F3 => self.events.push(InputEvent::ToggleOverlay),
            _ => {}
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Take all events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Movement and facing for this frame.
    ///
    /// W/S swim along -Z/+Z while facing +Z/-Z: the fish model's nose points
    /// down +X and a positive yaw turns it towards -Z, so the two axes are
    /// mirrored on Z. Space and Left Shift rise and sink without turning.
    pub fn intent(&self) -> MovementIntent {
        let mut movement = Vec3::ZERO;
        let mut facing = Vec2::ZERO;

        if self.is_key_held(KeyCode::KeyW) { movement.z -= 1.0; facing.y += 1.0; }
        if self.is_key_held(KeyCode::KeyS) { movement.z += 1.0; facing.y -= 1.0; }
        if self.is_key_held(KeyCode::KeyA) { movement.x -= 1.0; facing.x -= 1.0; }
        if self.is_key_held(KeyCode::KeyD) { movement.x += 1.0; facing.x += 1.0; }
        if self.is_key_held(KeyCode::Space) { movement.y += 1.0; }
        if self.is_key_held(KeyCode::ShiftLeft) { movement.y -= 1.0; }

        MovementIntent {
            movement: try_normalize3(movement),
            facing: try_normalize2(facing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keys_no_intent() {
        let input = InputState::new();
        assert_eq!(input.intent(), MovementIntent::default());
    }

    #[test]
    fn test_diagonal_intent_is_unit_length() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);
        input.press(KeyCode::KeyD);
        input.press(KeyCode::Space);
        let intent = input.intent();
        assert!((intent.movement.unwrap().length() - 1.0).abs() < 1e-6);
        assert!((intent.facing.unwrap().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyA);
        input.press(KeyCode::KeyD);
        assert_eq!(input.intent().movement, None);
        assert_eq!(input.intent().facing, None);
    }

    #[test]
    fn test_vertical_only_movement_keeps_facing() {
        let mut input = InputState::new();
        input.press(KeyCode::ShiftLeft);
        let intent = input.intent();
        assert_eq!(intent.movement, Some(Vec3::NEG_Y));
        assert_eq!(intent.facing, None);
    }

    #[test]
    fn test_forward_swims_negative_z_faces_positive_z() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);
        let intent = input.intent();
        assert_eq!(intent.movement, Some(Vec3::NEG_Z));
        assert_eq!(intent.facing, Some(Vec2::Y));
    }

    #[test]
    fn test_events_fire_on_press_only() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyM);
        input.release(KeyCode::KeyM);
        input.press(KeyCode::Escape);
        assert_eq!(input.drain_events(), vec![InputEvent::ToggleMouth, InputEvent::CloseRequested]);
        assert!(input.drain_events().is_empty());
        assert!(!input.is_key_held(KeyCode::KeyM));
    }

    #[test]
    fn test_window_close_exits_without_waiting_for_a_frame() {
        let mut input = InputState::new();
        assert!(input.process_event(&WindowEvent::CloseRequested));
        assert!(input.drain_events().is_empty());
    }

    #[test]
    fn test_focus_loss_releases_keys() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);
        assert!(!input.process_event(&WindowEvent::Focused(false)));
        assert!(!input.is_key_held(KeyCode::KeyW));
        assert_eq!(input.intent(), MovementIntent::default());
    }
}
