use palette::Srgb;

use crate::error::{Result, TerrainError};
use crate::heightfield::HeightField;
use crate::water::DEFAULT_WATER_LEVEL;

// Elevation at which the beach band starts; shares its value with the
// default water level so the shoreline color sits on the water edge
pub const BEACH_THRESHOLD: f64 = DEFAULT_WATER_LEVEL;

// (name, threshold, sRGB bytes) of the default elevation bands
const DEFAULT_BANDS: [(&str, f64, [u8; 3]); 9] = [
    ("deep water", 0.00, [0x1a, 0x5f, 0x7a]),
    ("shallow water", 0.25, [0x2d, 0x8c, 0xa8]),
    ("beach", BEACH_THRESHOLD, [0xe8, 0xd6, 0xb0]),
    ("grass lowlands", 0.35, [0x5a, 0x8f, 0x3d]),
    ("grass", 0.50, [0x4a, 0x7c, 0x2e]),
    ("forest", 0.65, [0x3d, 0x66, 0x26]),
    ("rocky", 0.75, [0x8b, 0x73, 0x55]),
    ("mountain", 0.85, [0xa9, 0xa9, 0xa9]),
    ("snow", 1.00, [0xff, 0xff, 0xff]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ColorBand {
    pub name: String,
    pub threshold: f64,
    pub color: Srgb<f32>,
}

impl ColorBand {
    pub fn new(name: impl Into<String>, threshold: f64, color: Srgb<f32>) -> Self {
        Self {
            name: name.into(),
            threshold,
            color,
        }
    }

    // Build a band from a `#rrggbb` hex string
    pub fn from_hex(name: impl Into<String>, threshold: f64, hex: &str) -> Result<Self> {
        Ok(Self::new(name, threshold, parse_hex(hex)?))
    }
}

pub fn parse_hex(hex: &str) -> Result<Srgb<f32>> {
    let rgb: Srgb<u8> = hex.parse().map_err(|e| TerrainError::InvalidColor {
        value: hex.to_string(),
        reason: format!("{}", e),
    })?;
    Ok(rgb.into_format())
}

pub fn to_hex(color: Srgb<f32>) -> String {
    let c: Srgb<u8> = color.into_format();
    format!("#{:x}", c)
}

// Maps elevations in [0, 1] to colors by piecewise-linear interpolation
// between consecutive bands
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationColorizer {
    bands: Vec<ColorBand>,
}

impl ElevationColorizer {
    // Thresholds must start at 0.0, end at 1.0 and strictly increase
    pub fn new(bands: Vec<ColorBand>) -> Result<Self> {
        if bands.len() < 2 {
            return Err(TerrainError::InvalidColorBands(format!(
                "need at least 2 bands, got {}",
                bands.len()
            )));
        }
        if bands.iter().any(|b| !b.threshold.is_finite()) {
            return Err(TerrainError::InvalidColorBands(
                "thresholds must be finite".into(),
            ));
        }
        if bands[0].threshold != 0.0 {
            return Err(TerrainError::InvalidColorBands(format!(
                "first threshold must be 0.0, got {}",
                bands[0].threshold
            )));
        }
        let last = bands[bands.len() - 1].threshold;
        if last != 1.0 {
            return Err(TerrainError::InvalidColorBands(format!(
                "last threshold must be 1.0, got {}",
                last
            )));
        }
        if let Some(w) = bands.windows(2).find(|w| w[0].threshold >= w[1].threshold) {
            return Err(TerrainError::InvalidColorBands(format!(
                "thresholds must strictly increase: `{}` at {} is followed by `{}` at {}",
                w[0].name, w[0].threshold, w[1].name, w[1].threshold
            )));
        }
        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[ColorBand] {
        &self.bands
    }

    // Color of a single elevation.
    // Out-of-range input is clamped; NaN maps to the lowest band.
    // A value exactly on a shared threshold resolves to the lower interval,
    // which yields that threshold's own color either way.
    pub fn color_at(&self, elevation: f64) -> Srgb<f32> {
        let e = if elevation.is_nan() {
            0.0
        } else {
            elevation.clamp(0.0, 1.0)
        };

        // Scan consecutive pairs, first match wins
        for pair in self.bands.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if lo.threshold <= e && e <= hi.threshold {
                let t = ((e - lo.threshold) / (hi.threshold - lo.threshold)) as f32;
                return mix(lo.color, hi.color, t);
            }
        }
        // Unreachable for a validated table covering [0, 1]
        self.bands[self.bands.len() - 1].color
    }

    // One color per cell of the field
    pub fn colorize(&self, field: &HeightField) -> ColorGrid {
        ColorGrid {
            size: field.size(),
            colors: field.as_slice().iter().map(|&h| self.color_at(h)).collect(),
        }
    }
}

impl Default for ElevationColorizer {
    fn default() -> Self {
        let bands = DEFAULT_BANDS
            .iter()
            .map(|&(name, threshold, [r, g, b])| {
                ColorBand::new(name, threshold, Srgb::new(r, g, b).into_format())
            })
            .collect();
        Self { bands }
    }
}

// Component-wise a·(1−t) + b·t, exact at t = 0 and t = 1
fn mix(a: Srgb<f32>, b: Srgb<f32>, t: f32) -> Srgb<f32> {
    Srgb::new(
        a.red * (1.0 - t) + b.red * t,
        a.green * (1.0 - t) + b.green * t,
        a.blue * (1.0 - t) + b.blue * t,
    )
}

// Per-cell colors of a height field, same row-major layout
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGrid {
    size: usize,
    colors: Vec<Srgb<f32>>,
}

impl ColorGrid {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> Srgb<f32> {
        self.colors[i * self.size + j]
    }

    pub fn as_slice(&self) -> &[Srgb<f32>] {
        &self.colors
    }

    // Packed RGB bytes, 3 per cell
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.colors.len() * 3);
        for &c in &self.colors {
            let c: Srgb<u8> = c.into_format();
            buf.extend_from_slice(&[c.red, c.green, c.blue]);
        }
        buf
    }
}
