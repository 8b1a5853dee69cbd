use std::time::Instant;

use log::{debug, info};

use crate::colorize::{ColorGrid, ElevationColorizer};
use crate::config::TerrainConfig;
use crate::error::{Result, TerrainError};
use crate::heightfield::{HeightField, SynthesisParams, synthesize_with};
use crate::perlin2::GradientNoise;
use crate::water::WaterMask;

// Owns one validated configuration, its noise instance and the last
// generated height field. Consumers fail with NotGenerated until
// generate() has run.
#[derive(Debug)]
pub struct TerrainGenerator {
    config: TerrainConfig,
    params: SynthesisParams,
    noise: GradientNoise,
    colorizer: ElevationColorizer,
    terrain: Option<HeightField>,
}

impl TerrainGenerator {
    pub fn new(config: TerrainConfig) -> Result<Self> {
        config.validate()?;
        let params = config.synthesis_params();
        let colorizer = config.colorizer()?;
        let noise = GradientNoise::new(config.seed);
        debug!("terrain generator ready: {:?}, seed {:?}", params, config.seed);

        Ok(Self {
            config,
            params,
            noise,
            colorizer,
            terrain: None,
        })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn noise(&self) -> &GradientNoise {
        &self.noise
    }

    pub fn colorizer(&self) -> &ElevationColorizer {
        &self.colorizer
    }

    // Recomputes the whole field; the previous one is replaced only on success
    pub fn generate(&mut self) -> Result<&HeightField> {
        let start = Instant::now();
        let field = synthesize_with(&self.noise, &self.params)?;
        info!(
            "generated {}x{} terrain in {:.2} ms",
            field.size(),
            field.size(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(self.terrain.insert(field))
    }

    pub fn terrain(&self) -> Result<&HeightField> {
        self.terrain.as_ref().ok_or(TerrainError::NotGenerated)
    }

    pub fn color_grid(&self) -> Result<ColorGrid> {
        Ok(self.colorizer.colorize(self.terrain()?))
    }

    pub fn water_mask(&self) -> Result<WaterMask> {
        WaterMask::new(self.terrain()?, self.config.water_level)
    }
}
