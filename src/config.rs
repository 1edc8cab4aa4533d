// Fixed constants for the presenter. Nothing here is read from the environment;
// every session sees the same layout and timings.

use crate::types::Rgb;

/// Size of every slide, drawing surface and outbound frame.
pub const DISPLAY_WIDTH: usize = 1280;
pub const DISPLAY_HEIGHT: usize = 720;

/// Inbound frames are resized to this before landmark extraction.
pub const PROCESS_WIDTH: u32 = 640;
pub const PROCESS_HEIGHT: u32 = 480;

/// Height of the control-panel band at the top of the display.
pub const CONTROL_HEIGHT: i32 = 40;

/// Ticks a new gesture must be held before it takes effect.
pub const GESTURE_COOLDOWN: u32 = 5;
/// Minimum ticks between two slide navigations.
pub const NAVIGATION_DWELL: u32 = 15;
/// Ticks a hover-toggled control ignores re-entry after flipping.
pub const HOVER_COOLDOWN: u32 = 30;

/// Slides (and their drawings) kept per deck; older pages are evicted.
pub const DECK_CAPACITY: usize = 100;

pub const BRUSH_SIZES: [u32; 3] = [2, 4, 6];
pub const DEFAULT_THICKNESS: u32 = 3;

pub const PALETTE: [(&str, Rgb); 6] = [
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 255, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("purple", Rgb::new(255, 0, 255)),
    ("orange", Rgb::new(255, 165, 0)),
];

pub const POINTER_COLOR: Rgb = Rgb::new(255, 255, 0);
pub const POINTER_RADIUS: i32 = 5;

/// Dots stamped per spray invocation.
pub const SPRAY_DOTS: usize = 20;

pub const JPEG_QUALITY: u8 = 85;

/// Cached frame results before the cache is wiped.
pub const FRAME_CACHE_SIZE: usize = 30;

/// Instantaneous rates averaged into the status-line FPS.
pub const FPS_WINDOW: usize = 30;
