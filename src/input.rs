//! Key-state snapshots
//!
//! Current and previous-frame key maps over the handful of buttons the game
//! uses. `pressed` reports the rising edge only, which is what keeps the
//! particle explosion from re-firing while the key is held.

use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Jump,
    Reset,
    Explode,
}

const BUTTON_COUNT: usize = 5;

#[derive(Default)]
pub struct Input {
    now: [bool; BUTTON_COUNT],
    prev: [bool; BUTTON_COUNT],
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(code: KeyCode) -> Option<Button> {
        match code {
            KeyCode::ArrowLeft | KeyCode::KeyA => Some(Button::Left),
            KeyCode::ArrowRight | KeyCode::KeyD => Some(Button::Right),
            KeyCode::Space => Some(Button::Jump),
            KeyCode::KeyR => Some(Button::Reset),
            KeyCode::KeyE => Some(Button::Explode),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, pressed: bool) {
        if let Some(button) = Self::map(code) {
            self.now[button as usize] = pressed;
        }
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.now[button as usize]
    }

    /// Down this frame but not the previous one.
    pub fn pressed(&self, button: Button) -> bool {
        self.now[button as usize] && !self.prev[button as usize]
    }

    /// Roll the current snapshot into the previous one. Call once per frame,
    /// after input has been consumed.
    pub fn next_frame(&mut self) {
        self.prev = self.now;
    }
}
