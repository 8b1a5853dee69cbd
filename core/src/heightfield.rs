use log::{debug, warn};

use crate::NoiseGenerator;
use crate::error::{Result, TerrainError};

// Exponent of the shaping curve applied after normalization.
// Values above 1 push the distribution toward lowlands.
pub const ELEVATION_CURVE: f64 = 1.5;

// Value every cell takes when the raw field has zero variance
pub const DEGENERATE_FILL: f64 = 0.5;

// Parameters of one synthesis run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisParams {
    pub size: usize,      // grid is size × size
    pub scale: f64,       // cells per noise unit at the first octave
    pub octaves: u32,     // number of layers to sum
    pub persistence: f64, // amplitude multiplier per octave
    pub lacunarity: f64,  // frequency multiplier per octave
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            size: 100,
            scale: 20.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl SynthesisParams {
    // Rejects size, scale and octaves that cannot produce a grid.
    // Persistence and lacunarity are accepted as-is; unusual values only warn.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(TerrainError::invalid("size", "must be at least 1"));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(TerrainError::invalid(
                "scale",
                format!("must be a positive finite number, got {}", self.scale),
            ));
        }
        if self.octaves == 0 {
            return Err(TerrainError::invalid("octaves", "must be at least 1"));
        }
        if !(self.persistence > 0.0 && self.persistence < 1.0) {
            warn!(
                "persistence {} is outside (0, 1); octave amplitudes will not decay",
                self.persistence
            );
        }
        if !(self.lacunarity > 1.0) {
            warn!(
                "lacunarity {} is not above 1; octaves will not add finer detail",
                self.lacunarity
            );
        }
        Ok(())
    }
}

// Normalized, curve-shaped elevation grid with values in [0, 1].
// Row-major: `get(i, j)` is cell (i, j), where i drives the x sample coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    size: usize,
    cells: Vec<f64>,
    degenerate: bool,
}

impl HeightField {
    #[cfg(test)]
    pub(crate) fn from_cells(size: usize, cells: Vec<f64>) -> Self {
        assert_eq!(cells.len(), size * size);
        Self {
            size,
            cells,
            degenerate: false,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.size + j]
    }

    // Flat row-major view, length size × size
    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.size)
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(|row| row.to_vec()).collect()
    }

    // NaN if any cell is NaN
    pub fn min(&self) -> f64 {
        self.cells
            .iter()
            .copied()
            .fold(f64::INFINITY, |acc, v| if v.is_nan() { v } else { acc.min(v) })
    }

    // NaN if any cell is NaN
    pub fn max(&self) -> f64 {
        self.cells
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, |acc, v| if v.is_nan() { v } else { acc.max(v) })
    }

    // True when the raw noise had no variance and the grid holds DEGENERATE_FILL
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}

// Sum `octaves` layers of `noise` into a size × size grid, then normalize and shape it
pub fn synthesize_with<N: NoiseGenerator + ?Sized>(
    noise: &N,
    params: &SynthesisParams,
) -> Result<HeightField> {
    params.validate()?;
    let size = params.size;

    let mut raw = Vec::with_capacity(size * size);
    for i in 0..size {
        for j in 0..size {
            let mut amplitude = 1.0; // Weight of the current octave
            let mut frequency = 1.0; // How zoomed in we are on the noise pattern
            let mut height = 0.0;

            for _ in 0..params.octaves {
                let sx = i as f64 / params.scale * frequency;
                let sy = j as f64 / params.scale * frequency;
                height += noise.get2(sx, sy) * amplitude;

                amplitude *= params.persistence;
                frequency *= params.lacunarity;
            }
            raw.push(height);
        }
    }

    let field = normalize_and_shape(size, raw);
    debug!(
        "synthesized {}x{} height field ({} octaves, degenerate: {})",
        size, size, params.octaves, field.degenerate
    );
    Ok(field)
}

// Rescale the raw sums to [0, 1] using the global min/max, then apply the curve
fn normalize_and_shape(size: usize, mut cells: Vec<f64>) -> HeightField {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in &cells {
        min = min.min(v);
        max = max.max(v);
    }

    let range = max - min;
    // Flat noise, or a divergent sum that overflowed in some cells.
    // min/max skip NaN, so non-finite cells are checked separately.
    let all_finite = cells.iter().all(|v| v.is_finite());
    if !(all_finite && range.is_finite() && range > 0.0) {
        warn!(
            "raw height field has no usable range (min {}, max {}, all finite: {}); filling with {}",
            min, max, all_finite, DEGENERATE_FILL
        );
        cells.fill(DEGENERATE_FILL);
        return HeightField {
            size,
            cells,
            degenerate: true,
        };
    }

    for v in cells.iter_mut() {
        let normalized = (*v - min) / range;
        *v = normalized.powf(ELEVATION_CURVE);
    }

    HeightField {
        size,
        cells,
        degenerate: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GradientNoise;

    struct Constant(f64);

    impl NoiseGenerator for Constant {
        fn get2(&self, _x: f64, _y: f64) -> f64 {
            self.0
        }
    }

    // Returns x, so the raw field is a ramp along i
    struct Ramp;

    impl NoiseGenerator for Ramp {
        fn get2(&self, x: f64, _y: f64) -> f64 {
            x
        }
    }

    fn params(size: usize) -> SynthesisParams {
        SynthesisParams {
            size,
            scale: 10.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    #[test]
    fn heightfield_dimensions() {
        let noise = GradientNoise::new(Some(3));
        let f = synthesize_with(&noise, &params(17)).unwrap();
        assert_eq!(f.size(), 17);
        assert_eq!(f.as_slice().len(), 17 * 17);
        assert_eq!(f.rows().count(), 17);
        assert!(f.rows().all(|r| r.len() == 17));
    }

    #[test]
    fn heightfield_normalized_bounds() {
        let noise = GradientNoise::new(Some(2025));
        let f = synthesize_with(&noise, &params(32)).unwrap();
        assert!(!f.is_degenerate());
        assert_eq!(f.min(), 0.0);
        assert_eq!(f.max(), 1.0);
        for &v in f.as_slice() {
            assert!(v.is_finite());
            assert!((0.0..=1.0).contains(&v), "value {} out of range", v);
        }
    }

    #[test]
    fn heightfield_curve_applied() {
        // Ramp noise with one octave: raw value of row i is i / scale
        let p = SynthesisParams {
            size: 5,
            scale: 1.0,
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
        };
        let f = synthesize_with(&Ramp, &p).unwrap();
        for i in 0..5 {
            let expected = (i as f64 / 4.0).powf(ELEVATION_CURVE);
            assert!((f.get(i, 0) - expected).abs() < 1e-12);
            assert_eq!(f.get(i, 0), f.get(i, 4));
        }
    }

    #[test]
    fn heightfield_constant_noise_is_degenerate() {
        let f = synthesize_with(&Constant(0.7), &params(8)).unwrap();
        assert!(f.is_degenerate());
        assert!(f.as_slice().iter().all(|&v| v == DEGENERATE_FILL));
    }

    #[test]
    fn heightfield_single_cell_is_degenerate() {
        let noise = GradientNoise::new(Some(1));
        let f = synthesize_with(&noise, &params(1)).unwrap();
        assert!(f.is_degenerate());
        assert_eq!(f.get(0, 0), DEGENERATE_FILL);
    }

    #[test]
    // With scale 1 every sample lands on a lattice point where the noise is zero
    fn heightfield_lattice_samples_are_degenerate() {
        let noise = GradientNoise::new(Some(11));
        let p = SynthesisParams {
            scale: 1.0,
            ..params(6)
        };
        let f = synthesize_with(&noise, &p).unwrap();
        assert!(f.is_degenerate());
        assert!(f.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn heightfield_rejects_bad_params() {
        let noise = GradientNoise::new(Some(1));
        let bad = [
            SynthesisParams { size: 0, ..params(4) },
            SynthesisParams { scale: 0.0, ..params(4) },
            SynthesisParams { scale: -2.0, ..params(4) },
            SynthesisParams { scale: f64::NAN, ..params(4) },
            SynthesisParams { octaves: 0, ..params(4) },
        ];
        for p in &bad {
            let err = synthesize_with(&noise, p).unwrap_err();
            assert!(matches!(err, TerrainError::InvalidParameter { .. }), "{:?}", p);
        }
    }

    #[test]
    // Non-decaying persistence is allowed, only reported
    fn heightfield_accepts_unusual_persistence() {
        let noise = GradientNoise::new(Some(4));
        let p = SynthesisParams {
            persistence: 1.5,
            lacunarity: 0.5,
            ..params(8)
        };
        let f = synthesize_with(&noise, &p).unwrap();
        assert!(f.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    // The second octave samples past f64::MAX for most cells, producing NaN there
    fn heightfield_overflowing_lacunarity_has_no_nan() {
        let noise = GradientNoise::new(Some(7));
        let p = SynthesisParams {
            size: 200,
            scale: 10.0,
            octaves: 2,
            persistence: 0.5,
            lacunarity: 1e307,
        };
        let f = synthesize_with(&noise, &p).unwrap();
        assert!(f.as_slice().iter().all(|v| v.is_finite()));
        assert!(f.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(f.is_degenerate());
    }

    #[test]
    fn heightfield_overflowing_persistence_has_no_nan() {
        let noise = GradientNoise::new(Some(7));
        let p = SynthesisParams {
            persistence: 1e300,
            octaves: 4,
            ..params(16)
        };
        let f = synthesize_with(&noise, &p).unwrap();
        assert!(f.as_slice().iter().all(|v| v.is_finite()));
        assert!(!f.min().is_nan() && !f.max().is_nan());
    }

    #[test]
    fn heightfield_min_max_see_nan() {
        let f = HeightField::from_cells(2, vec![0.0, f64::NAN, 1.0, 0.5]);
        assert!(f.min().is_nan());
        assert!(f.max().is_nan());
        let g = HeightField::from_cells(2, vec![0.0, 0.25, 1.0, 0.5]);
        assert_eq!(g.min(), 0.0);
        assert_eq!(g.max(), 1.0);
    }

    #[test]
    fn heightfield_to_rows_matches_get() {
        let noise = GradientNoise::new(Some(8));
        let f = synthesize_with(&noise, &params(6)).unwrap();
        let rows = f.to_rows();
        for i in 0..6 {
            for j in 0..6 {
                assert_eq!(rows[i][j], f.get(i, j));
            }
        }
    }
}
