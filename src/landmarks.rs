//! Hand keypoints as produced by the landmark oracle, plus the seam the
//! orchestrator uses to ask for them.
//!
//! Coordinates are normalized to [0,1] of the processed frame, origin top-left,
//! so a raised finger has a smaller `y` at its tip than at its knuckle.

use crate::types::{Canvas, Point};

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// One detected hand in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct KeypointSet {
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

/// Which of the five fingers are raised, thumb first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    pub const fn new(thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        Self { thumb, index, middle, ring, pinky }
    }

    /// Unpack bits 4..0 as thumb, index, middle, ring, pinky.
    pub const fn from_bits(bits: u8) -> Self {
        Self::new(
            bits & 0b10000 != 0,
            bits & 0b01000 != 0,
            bits & 0b00100 != 0,
            bits & 0b00010 != 0,
            bits & 0b00001 != 0,
        )
    }
}

impl KeypointSet {
    #[inline]
    pub fn get(&self, id: usize) -> Landmark {
        self.landmarks[id]
    }

    /// Tip farther from the palm than the knuckle below it.
    pub fn finger_states(&self) -> FingerStates {
        let raised = |tip: usize, pip: usize| self.get(tip).y < self.get(pip).y;
        FingerStates {
            thumb: self.get(THUMB_TIP).x < self.get(THUMB_IP).x,
            index: raised(INDEX_TIP, INDEX_PIP),
            middle: raised(MIDDLE_TIP, MIDDLE_PIP),
            ring: raised(RING_TIP, RING_PIP),
            pinky: raised(PINKY_TIP, PINKY_PIP),
        }
    }

    /// Index fingertip scaled to a display of `width` x `height` pixels.
    pub fn pointer(&self, width: usize, height: usize) -> Point {
        let tip = self.get(INDEX_TIP);
        Point::new(
            (tip.x * width as f32) as i32,
            (tip.y * height as f32) as i32,
        )
    }

    /// Build a plausible hand whose index tip sits at (`x`,`y`) with the given
    /// fingers raised. Used by the harness's mouse hand and by tests.
    pub fn synthetic(x: f32, y: f32, fingers: FingerStates) -> Self {
        let mut lm = [Landmark::default(); LANDMARK_COUNT];
        lm[WRIST] = Landmark::new(x + 0.05, y + 0.30);

        // Thumb lies to the left; raised means its tip is left of the IP joint.
        let thumb_ip_x = x - 0.10;
        lm[THUMB_CMC] = Landmark::new(x - 0.02, y + 0.26);
        lm[THUMB_MCP] = Landmark::new(x - 0.06, y + 0.22);
        lm[THUMB_IP] = Landmark::new(thumb_ip_x, y + 0.18);
        let thumb_tip_x = if fingers.thumb { thumb_ip_x - 0.04 } else { thumb_ip_x + 0.03 };
        lm[THUMB_TIP] = Landmark::new(thumb_tip_x, y + 0.16);

        let columns = [
            (INDEX_MCP, 0.00, fingers.index),
            (MIDDLE_MCP, 0.03, fingers.middle),
            (RING_MCP, 0.06, fingers.ring),
            (PINKY_MCP, 0.09, fingers.pinky),
        ];
        for (mcp, dx, raised) in columns {
            let fx = x + dx;
            // The index tip is pinned to (x, y); other tips sit just below it.
            let tip_y = if mcp == INDEX_MCP {
                y
            } else if raised {
                y + 0.02
            } else {
                y + 0.08
            };
            let pip_y = if raised { tip_y + 0.10 } else { tip_y - 0.03 };
            lm[mcp] = Landmark::new(fx, pip_y + 0.05);
            lm[mcp + 1] = Landmark::new(fx, pip_y);
            lm[mcp + 2] = Landmark::new(fx, (pip_y + tip_y) / 2.0);
            lm[mcp + 3] = Landmark::new(fx, tip_y);
        }

        Self { landmarks: lm }
    }
}

/// The landmark oracle: zero or one hand per processed frame.
pub trait HandDetector {
    fn detect(&mut self, frame: &Canvas) -> Option<KeypointSet>;
}

/// Replays a fixed script of detections, one per frame, then reports no hand.
#[derive(Default)]
pub struct ScriptedDetector {
    script: std::collections::VecDeque<Option<KeypointSet>>,
}

impl ScriptedDetector {
    pub fn new(script: impl IntoIterator<Item = Option<KeypointSet>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn push(&mut self, hand: Option<KeypointSet>) {
        self.script.push_back(hand);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl HandDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &Canvas) -> Option<KeypointSet> {
        self.script.pop_front().flatten()
    }
}
