//! Static finger-pose classifier. Pure: one keypoint set in, one gesture out.

use std::fmt;

use crate::landmarks::{FingerStates, KeypointSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    None,
    Draw,
    Pointer,
    Next,
    Previous,
    Clear,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::None => "NONE",
            Gesture::Draw => "DRAW",
            Gesture::Pointer => "POINTER",
            Gesture::Next => "NEXT",
            Gesture::Previous => "PREVIOUS",
            Gesture::Clear => "CLEAR",
        }
    }

    /// Gestures that fire once per hold rather than every frame.
    pub fn is_command(&self) -> bool {
        matches!(self, Gesture::Next | Gesture::Previous | Gesture::Clear)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(hand: &KeypointSet) -> Gesture {
    classify_fingers(hand.finger_states())
}

pub fn classify_fingers(f: FingerStates) -> Gesture {
    let FingerStates { thumb, index, middle, ring, pinky } = f;
    match (thumb, index, middle, ring, pinky) {
        (true, true, true, false, false) => Gesture::Next,
        (true, true, false, false, false) => Gesture::Previous,
        (false, true, true, false, false) => Gesture::Draw,
        (false, true, false, false, false) => Gesture::Pointer,
        (true, true, true, true, true) => Gesture::Clear,
        _ => Gesture::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_table_is_exhaustive() {
        for bits in 0..32u8 {
            let expected = match bits {
                0b11100 => Gesture::Next,
                0b11000 => Gesture::Previous,
                0b01100 => Gesture::Draw,
                0b01000 => Gesture::Pointer,
                0b11111 => Gesture::Clear,
                _ => Gesture::None,
            };
            let fingers = FingerStates::from_bits(bits);
            assert_eq!(classify_fingers(fingers), expected, "bits {bits:05b}");

            let hand = KeypointSet::synthetic(0.4, 0.6, fingers);
            assert_eq!(classify(&hand), expected, "hand {bits:05b}");
        }
    }

    #[test]
    fn three_raised_fingers_is_next() {
        let hand = KeypointSet::synthetic(0.5, 0.5, FingerStates::new(true, true, true, false, false));
        assert_eq!(classify(&hand), Gesture::Next);
    }

    #[test]
    fn command_gestures() {
        assert!(Gesture::Next.is_command());
        assert!(Gesture::Clear.is_command());
        assert!(!Gesture::Draw.is_command());
        assert!(!Gesture::Pointer.is_command());
        assert_eq!(Gesture::Previous.to_string(), "PREVIOUS");
    }
}
