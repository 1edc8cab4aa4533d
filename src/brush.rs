// Brush configuration: style, colour and thickness for one session.

use crate::config::{DEFAULT_THICKNESS, PALETTE};
use crate::types::Rgb;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BrushStyle {
    #[default]
    Normal,
    Spray,
    Calligraphy,
    Neon,
}

impl BrushStyle {
    pub const ALL: [BrushStyle; 4] = [
        BrushStyle::Normal,
        BrushStyle::Spray,
        BrushStyle::Calligraphy,
        BrushStyle::Neon,
    ];

    /// Round-robin through `ALL`.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Output differs between two runs over identical input.
    pub fn is_stochastic(self) -> bool {
        self == BrushStyle::Spray
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BrushStyle::Normal => "NORMAL",
            BrushStyle::Spray => "SPRAY",
            BrushStyle::Calligraphy => "CALLIGRAPHY",
            BrushStyle::Neon => "NEON",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Brush {
    pub style: BrushStyle,
    pub color: Rgb,
    pub thickness: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            style: BrushStyle::Normal,
            color: PALETTE[0].1,
            thickness: DEFAULT_THICKNESS,
        }
    }
}
