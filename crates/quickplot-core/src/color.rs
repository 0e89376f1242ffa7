// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! 24-bit RGB colors as supplied by callers (`0xRRGGBB`).

use serde::{Deserialize, Serialize};

/// An sRGB color with 8 bits per channel.
///
/// Serialized as the packed `0xRRGGBB` integer so config files stay terse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::from_hex(0x000000);
    /// Pure white.
    pub const WHITE: Self = Self::from_hex(0xffffff);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack `0xRRGGBB`; bits above the low 24 are ignored.
    pub const fn from_hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// Pack into `0xRRGGBB`.
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Channels normalised to `[0, 1]`, still sRGB-encoded.
    pub fn to_unit(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }

    /// Channels decoded to linear light, for sRGB render targets.
    pub fn to_linear(self) -> [f32; 3] {
        self.to_unit().map(srgb_to_linear)
    }
}

impl From<u32> for Rgb {
    fn from(rgb: u32) -> Self {
        Self::from_hex(rgb)
    }
}

impl From<Rgb> for u32 {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
