//! Input state tracking
//!
//! Raw window and device events are mapped onto logical [`Action`]s through
//! [`KeyBindings`]. The controller only ever reads this state; the host
//! writes it as events arrive and calls [`InputState::end_frame`] after each
//! tick.

use std::collections::HashMap;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::core::types::Vec2;

/// Logical controller inputs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Back,
    Left,
    Right,
    Jump,
    LookLeft,
    LookRight,
    LookUp,
    LookDown,
    Fire,
}

impl Action {
    /// Number of actions
    pub const COUNT: usize = 10;

    /// Every action, in declaration order
    pub const ALL: [Action; Self::COUNT] = [
        Action::Forward,
        Action::Back,
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::LookLeft,
        Action::LookRight,
        Action::LookUp,
        Action::LookDown,
        Action::Fire,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Maps physical keys and mouse buttons to actions
#[derive(Clone, Debug)]
pub struct KeyBindings {
    keys: HashMap<KeyCode, Action>,
    buttons: HashMap<MouseButton, Action>,
}

impl KeyBindings {
    /// Create an empty binding table
    pub fn empty() -> Self {
        Self {
            keys: HashMap::new(),
            buttons: HashMap::new(),
        }
    }

    /// Bind a key, replacing any previous binding for it
    pub fn bind_key(&mut self, key: KeyCode, action: Action) -> &mut Self {
        self.keys.insert(key, action);
        self
    }

    /// Bind a mouse button, replacing any previous binding for it
    pub fn bind_button(&mut self, button: MouseButton, action: Action) -> &mut Self {
        self.buttons.insert(button, action);
        self
    }

    /// Action bound to a key, if any
    pub fn key_action(&self, key: KeyCode) -> Option<Action> {
        self.keys.get(&key).copied()
    }

    /// Action bound to a mouse button, if any
    pub fn button_action(&self, button: MouseButton) -> Option<Action> {
        self.buttons.get(&button).copied()
    }
}

impl Default for KeyBindings {
    /// WASD to move, Space to jump, arrows to look, Enter or left click to fire
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings
            .bind_key(KeyCode::KeyW, Action::Forward)
            .bind_key(KeyCode::KeyS, Action::Back)
            .bind_key(KeyCode::KeyA, Action::Left)
            .bind_key(KeyCode::KeyD, Action::Right)
            .bind_key(KeyCode::Space, Action::Jump)
            .bind_key(KeyCode::ArrowLeft, Action::LookLeft)
            .bind_key(KeyCode::ArrowRight, Action::LookRight)
            .bind_key(KeyCode::ArrowUp, Action::LookUp)
            .bind_key(KeyCode::ArrowDown, Action::LookDown)
            .bind_key(KeyCode::Enter, Action::Fire)
            .bind_key(KeyCode::NumpadEnter, Action::Fire)
            .bind_button(MouseButton::Left, Action::Fire);
        bindings
    }
}

/// Current state of every logical action plus accumulated pointer motion
pub struct InputState {
    bindings: KeyBindings,
    /// Actions currently held
    pressed: [bool; Action::COUNT],
    /// Actions that went down since the last `end_frame`
    just_pressed: [bool; Action::COUNT],
    /// Raw pointer motion accumulated since the last `end_frame`
    pointer_delta: Vec2,
    /// Whether pointer motion and mouse buttons are routed to the controller
    pointer_captured: bool,
}

impl InputState {
    /// Create new input state with the default bindings
    pub fn new() -> Self {
        Self::with_bindings(KeyBindings::default())
    }

    /// Create new input state with custom bindings
    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            pressed: [false; Action::COUNT],
            just_pressed: [false; Action::COUNT],
            pointer_delta: Vec2::ZERO,
            pointer_captured: false,
        }
    }

    /// Process a window event
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(key_code),
                    state,
                    ..
                },
                ..
            } => {
                if let Some(action) = self.bindings.key_action(*key_code) {
                    self.set_action(action, *state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if !self.pointer_captured {
                    return;
                }
                if let Some(action) = self.bindings.button_action(*button) {
                    self.set_action(action, *state == ElementState::Pressed);
                }
            }
            WindowEvent::Focused(false) => self.release_all(),
            _ => {}
        }
    }

    /// Process device event for raw mouse motion (when cursor is grabbed)
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        if self.pointer_captured {
            self.push_pointer_delta(delta.0 as f32, delta.1 as f32);
        }
    }

    /// Set an action's held state directly.
    ///
    /// Key repeat (pressed while already held) does not re-trigger.
    pub fn set_action(&mut self, action: Action, down: bool) {
        let i = action.index();
        if down && !self.pressed[i] {
            self.just_pressed[i] = true;
        }
        self.pressed[i] = down;
    }

    /// Accumulate pointer motion in pixels. Non-finite motion is dropped.
    pub fn push_pointer_delta(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.pointer_delta += Vec2::new(dx, dy);
        }
    }

    /// Release every held action (e.g. when the window loses focus)
    pub fn release_all(&mut self) {
        for action in Action::ALL {
            self.set_action(action, false);
        }
    }

    /// Call at end of frame to reset per-frame state
    pub fn end_frame(&mut self) {
        self.just_pressed = [false; Action::COUNT];
        self.pointer_delta = Vec2::ZERO;
    }

    /// Check if action is currently held
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed[action.index()]
    }

    /// Check if action went down this frame
    pub fn is_just_pressed(&self, action: Action) -> bool {
        self.just_pressed[action.index()]
    }

    /// Pointer motion accumulated this frame
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_delta
    }

    /// Set pointer captured state
    pub fn set_pointer_captured(&mut self, captured: bool) {
        self.pointer_captured = captured;
        self.pointer_delta = Vec2::ZERO;
    }

    /// Check if pointer is captured
    pub fn is_pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    /// Active bindings
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
