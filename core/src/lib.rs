// core holds the noise, height-field, coloring and water algorithms
pub mod colorize;
pub mod config;
pub mod error;
pub mod generator;
pub mod heightfield;
pub mod perlin2;
pub mod water;

pub use colorize::{ColorBand, ColorGrid, ElevationColorizer};
pub use config::{ColorBandConfig, TerrainConfig};
pub use error::{Result, TerrainError};
pub use generator::TerrainGenerator;
pub use heightfield::{HeightField, SynthesisParams, synthesize_with};
pub use perlin2::GradientNoise;
pub use water::{DEFAULT_WATER_LEVEL, WaterMask};

// Noise field that can be sampled at any 2D point.
// The synthesizer layers octaves of any implementor.
pub trait NoiseGenerator {
    fn get2(&self, x: f64, y: f64) -> f64;
}

// Build a height field from a single seeded gradient noise instance
pub fn synthesize(seed: Option<u64>, params: &SynthesisParams) -> Result<HeightField> {
    synthesize_with(&GradientNoise::new(seed), params)
}
