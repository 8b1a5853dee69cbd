use crate::error::{Result, TerrainError};
use crate::heightfield::HeightField;

// Default sea level, equal to the start of the beach color band
pub const DEFAULT_WATER_LEVEL: f64 = 0.30;

pub fn validate_water_level(level: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&level) {
        return Err(TerrainError::invalid(
            "water_level",
            format!("must lie in [0, 1], got {}", level),
        ));
    }
    Ok(())
}

// Cells at or below the water level, covered by a flat plane at that level
#[derive(Debug, Clone, PartialEq)]
pub struct WaterMask {
    size: usize,
    level: f64,
    submerged: Vec<bool>,
}

impl WaterMask {
    pub fn new(field: &HeightField, level: f64) -> Result<Self> {
        validate_water_level(level)?;
        Ok(Self {
            size: field.size(),
            level,
            submerged: field.as_slice().iter().map(|&h| h <= level).collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn is_submerged(&self, i: usize, j: usize) -> bool {
        self.submerged[i * self.size + j]
    }

    // Water surface height over a cell; None where the terrain is dry
    pub fn surface_elevation(&self, i: usize, j: usize) -> Option<f64> {
        self.is_submerged(i, j).then_some(self.level)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.submerged
    }

    pub fn submerged_count(&self) -> usize {
        self.submerged.iter().filter(|&&s| s).count()
    }

    // Fraction of cells under water, in [0, 1]
    pub fn coverage(&self) -> f64 {
        self.submerged_count() as f64 / self.submerged.len() as f64
    }
}
