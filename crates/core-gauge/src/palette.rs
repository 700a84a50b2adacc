//! Colors of the gauge and of the overflow highlight.

use crate::GaugeState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Track circle drawn under the progress arc.
    pub track: Rgba,
    pub ok_circle: Rgba,
    pub warning_circle: Rgba,
    pub overflowing_circle: Rgba,
    pub warning_number: Rgba,
    pub overflowing_number: Rgba,
    /// Background behind the part of the text past the limit.
    pub overflow_background: Rgba,
    pub background: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            track: Rgba::rgb(0xCC, 0xD6, 0xDD),
            ok_circle: Rgba::rgb(0x1D, 0xA1, 0xF2),
            warning_circle: Rgba::rgb(0xFF, 0xAD, 0x1F),
            overflowing_circle: Rgba::rgb(0xE0, 0x24, 0x5E),
            warning_number: Rgba::rgb(0x65, 0x77, 0x86),
            overflowing_number: Rgba::rgb(0xE0, 0x24, 0x5E),
            overflow_background: Rgba::rgb(0xFF, 0xB8, 0xC2),
            background: Rgba::rgb(0xFF, 0xFF, 0xFF).with_alpha(0),
        }
    }
}

impl Palette {
    /// Stroke color of the progress arc.
    pub fn circle(&self, state: GaugeState) -> Rgba {
        match state {
            GaugeState::Ok => self.ok_circle,
            GaugeState::Warning => self.warning_circle,
            GaugeState::Overflowing => self.overflowing_circle,
        }
    }

    /// Color of the remaining-count number; `None` while the count stays hidden.
    pub fn number(&self, state: GaugeState) -> Option<Rgba> {
        match state {
            GaugeState::Ok => None,
            GaugeState::Warning => Some(self.warning_number),
            GaugeState::Overflowing => Some(self.overflowing_number),
        }
    }
}
