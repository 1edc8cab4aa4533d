// On-screen output for the harness, plus the keyboard and mouse state that
// drives the simulated hand.
// Visual expectation: a 1280x720 window showing exactly what a remote client
// would receive.

use gesture_deck::error::Error;
use gesture_deck::types::Canvas;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

/// Digit keys in pose order (see the table at the top of main.rs).
const POSE_KEYS: [Key; 6] = [Key::Key0, Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5];

pub struct Display {
    window: Window, // the on-screen window you see
}

impl Display {
    /// Create the window at display resolution.
    /// Visual: an empty window appears; it fills in on the first `present`.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push one composed frame to the screen. Also pumps window events, so
    /// key and mouse state below refresh once per call.
    pub fn present(&mut self, frame: &Canvas) -> Result<(), Error> {
        self.window
            .update_with_buffer(&frame.pixels, frame.width, frame.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// False once the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held; the frame loop exits on it.
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Mouse position in window pixels, clamped to the window.
    /// This is where the simulated index fingertip sits.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x.max(0.0), y.max(0.0)))
    }

    /// Digit key 0..=5 pressed this frame, if any.
    pub fn pose_pressed(&self) -> Option<usize> {
        POSE_KEYS
            .iter()
            .position(|k| self.window.is_key_pressed(*k, KeyRepeat::No))
    }
}
