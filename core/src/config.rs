// Construction-time configuration of a terrain run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::colorize::{ColorBand, ElevationColorizer, parse_hex, to_hex};
use crate::error::Result;
use crate::heightfield::SynthesisParams;
use crate::water::{DEFAULT_WATER_LEVEL, validate_water_level};

// One elevation band as written in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBandConfig {
    pub name: String,
    // Elevation in [0, 1] where this band's color is reached exactly.
    pub threshold: f64,
    // `#rrggbb` hex color.
    pub color: String,
}

// Every parameter of a generation run. Missing fields take their defaults,
// so an empty TOML document is a valid configuration, e.g.
//   size = 128
//   seed = 2025
//   [[bands]]
//   name = "deep water"
//   threshold = 0.0
//   color = "#1a5f7a"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub size: usize,
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    // `None` draws the permutation from OS entropy.
    pub seed: Option<u64>,
    pub water_level: f64,
    pub bands: Vec<ColorBandConfig>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        let params = SynthesisParams::default();
        let bands = ElevationColorizer::default()
            .bands()
            .iter()
            .map(|b| ColorBandConfig {
                name: b.name.clone(),
                threshold: b.threshold,
                color: to_hex(b.color),
            })
            .collect();
        Self {
            size: params.size,
            scale: params.scale,
            octaves: params.octaves,
            persistence: params.persistence,
            lacunarity: params.lacunarity,
            seed: None,
            water_level: DEFAULT_WATER_LEVEL,
            bands,
        }
    }
}

impl TerrainConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn synthesis_params(&self) -> SynthesisParams {
        SynthesisParams {
            size: self.size,
            scale: self.scale,
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
        }
    }

    // Parses and validates the band table.
    pub fn colorizer(&self) -> Result<ElevationColorizer> {
        let bands = self
            .bands
            .iter()
            .map(|b| -> Result<ColorBand> {
                Ok(ColorBand::new(b.name.clone(), b.threshold, parse_hex(&b.color)?))
            })
            .collect::<Result<Vec<_>>>()?;
        ElevationColorizer::new(bands)
    }

    // Checks every parameter before any computation happens.
    pub fn validate(&self) -> Result<()> {
        self.synthesis_params().validate()?;
        validate_water_level(self.water_level)?;
        self.colorizer()?;
        Ok(())
    }
}
