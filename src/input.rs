//! Keyboard and mouse state for the viewer.
//!
//! Window events are folded into an [`Input`] as they arrive; the viewer
//! queries it once per frame and then calls [`Input::begin_frame`] to clear
//! edge-triggered state (presses, cursor motion, scroll).

use std::collections::HashSet;
use std::hash::Hash;

use glam::Vec2;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Pixels of trackpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn from_winit(button: WinitMouseButton) -> Option<Self> {
        match button {
            WinitMouseButton::Left => Some(MouseButton::Left),
            WinitMouseButton::Right => Some(MouseButton::Right),
            WinitMouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    R,
    F,
    Escape,
    Up,
    Down,
}

impl KeyCode {
    fn from_winit(key: WinitKeyCode) -> Option<Self> {
        Some(match key {
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::KeyR => KeyCode::R,
            WinitKeyCode::KeyF => KeyCode::F,
            WinitKeyCode::Escape => KeyCode::Escape,
            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            _ => return None,
        })
    }
}

/// Held and just-pressed state for a set of buttons.
#[derive(Debug)]
struct Buttons<T> {
    held: HashSet<T>,
    pressed: HashSet<T>,
}

impl<T> Default for Buttons<T> {
    fn default() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> Buttons<T> {
    fn set(&mut self, button: T, state: ElementState) {
        match state {
            // OS key repeat arrives as more presses; only the first counts
            ElementState::Pressed => {
                if self.held.insert(button) {
                    self.pressed.insert(button);
                }
            }
            ElementState::Released => {
                self.held.remove(&button);
            }
        }
    }

    fn release_all(&mut self) {
        self.held.clear();
    }
}

#[derive(Debug, Default)]
pub struct Input {
    keys: Buttons<KeyCode>,
    mouse: Buttons<MouseButton>,
    cursor: Option<Vec2>,
    cursor_delta: Vec2,
    scroll: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` went down since the last [`begin_frame`](Self::begin_frame).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys.pressed.contains(&key)
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys.held.contains(&key)
    }

    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse.held.contains(&button)
    }

    /// Cursor motion this frame, in physical pixels.
    pub fn mouse_delta(&self) -> Vec2 {
        self.cursor_delta
    }

    /// Wheel motion this frame, in lines. Positive is away from the user.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll
    }

    /// Clear per-frame state. Call after the frame has read its input.
    pub fn begin_frame(&mut self) {
        self.keys.pressed.clear();
        self.mouse.pressed.clear();
        self.cursor_delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(key) = KeyCode::from_winit(code) {
                        self.keys.set(key, event.state);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = MouseButton::from_winit(*button) {
                    self.mouse.set(button, *state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
            }
            WindowEvent::Focused(false) => {
                self.keys.release_all();
                self.mouse.release_all();
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, position: Vec2) {
        if let Some(last) = self.cursor {
            self.cursor_delta += position - last;
        }
        self.cursor = Some(position);
    }
}
