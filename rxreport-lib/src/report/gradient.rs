//! Diverging red/blue colour map for ratio tables.

use crate::{Error, Result};

/// ColorBrewer RdBu anchors, red end first.
const RDBU: [[u8; 3]; 11] = [
    [0x67, 0x00, 0x1f],
    [0xb2, 0x18, 0x2b],
    [0xd6, 0x60, 0x4d],
    [0xf4, 0xa5, 0x82],
    [0xfd, 0xdb, 0xc7],
    [0xf7, 0xf7, 0xf7],
    [0xd1, 0xe5, 0xf0],
    [0x92, 0xc5, 0xde],
    [0x43, 0x93, 0xc3],
    [0x21, 0x66, 0xac],
    [0x05, 0x30, 0x61],
];

/// Number of discrete colours in the lookup table.
const LUT_SIZE: usize = 256;

/// Luminance below which text switches to a light colour.
const TEXT_COLOR_THRESHOLD: f64 = 0.408;

const DARK_TEXT: &str = "#000000";
const LIGHT_TEXT: &str = "#f1f1f1";

/// Colour given to NaN cells.
const BAD_COLOR: [u8; 3] = [0x00, 0x00, 0x00];

/// Maps values in `[vmin, vmax]` onto reversed RdBu: low values blue,
/// `(vmin + vmax) / 2` white, high values red. Out-of-range values clamp.
/// A degenerate range (`vmin == vmax`) maps everything to the low end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    vmin: f64,
    vmax: f64,
}

impl Default for Gradient {
    fn default() -> Self {
        Gradient {
            vmin: 0.5,
            vmax: 1.5,
        }
    }
}

impl Gradient {
    /// Fails unless both bounds are finite and `vmin <= vmax`.
    pub fn new(vmin: f64, vmax: f64) -> Result<Self> {
        if !vmin.is_finite() || !vmax.is_finite() || vmin > vmax {
            return Err(Error::InvalidRange { vmin, vmax });
        }
        Ok(Gradient { vmin, vmax })
    }

    /// Background colour as an RGB triple. NaN gets black.
    pub fn color(&self, value: f64) -> [u8; 3] {
        if value.is_nan() {
            return BAD_COLOR;
        }
        let span = self.vmax - self.vmin;
        let t = if span > 0.0 {
            ((value - self.vmin) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let level = ((t * LUT_SIZE as f64) as usize).min(LUT_SIZE - 1);
        reversed_rdbu(level as f64 / (LUT_SIZE - 1) as f64)
    }

    /// `background-color` and `color` declarations for a cell.
    pub fn declarations(&self, value: f64) -> Vec<(String, String)> {
        let rgb = self.color(value);
        let text = if relative_luminance(rgb) < TEXT_COLOR_THRESHOLD {
            LIGHT_TEXT
        } else {
            DARK_TEXT
        };
        vec![
            ("background-color".to_string(), to_hex(rgb)),
            ("color".to_string(), text.to_string()),
        ]
    }
}

fn reversed_rdbu(t: f64) -> [u8; 3] {
    let position = (1.0 - t) * (RDBU.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(RDBU.len() - 1);
    let frac = position - lower as f64;

    let mut rgb = [0u8; 3];
    for (channel, out) in rgb.iter_mut().enumerate() {
        let a = RDBU[lower][channel] as f64;
        let b = RDBU[upper][channel] as f64;
        *out = (a + (b - a) * frac).round() as u8;
    }
    rgb
}

/// WCAG relative luminance of an sRGB colour.
pub fn relative_luminance(rgb: [u8; 3]) -> f64 {
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(rgb[0]) + 0.7152 * linear(rgb[1]) + 0.0722 * linear(rgb[2])
}

pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}
