use terrain_core::colorize::BEACH_THRESHOLD;
use terrain_core::{
    DEFAULT_WATER_LEVEL, ElevationColorizer, SynthesisParams, TerrainConfig, TerrainError,
    TerrainGenerator, synthesize,
};

const SEED: u64 = 2025;

#[test]
fn test_small_grid_reproducible() {
    let params = SynthesisParams {
        size: 4,
        scale: 10.0,
        octaves: 1,
        persistence: 0.5,
        lacunarity: 2.0,
    };
    let first = synthesize(Some(SEED), &params).expect("first run failed");
    let second = synthesize(Some(SEED), &params).expect("second run failed");
    assert_eq!(first.size(), 4);
    assert_eq!(first.as_slice().len(), 16);
    assert_eq!(first, second);
}

#[test]
fn test_full_pipeline() {
    let config = TerrainConfig {
        size: 64,
        scale: 25.0,
        seed: Some(SEED),
        ..Default::default()
    };
    let mut generator = TerrainGenerator::new(config).expect("valid config");
    let field = generator.generate().expect("generation failed").clone();

    assert!(!field.is_degenerate());
    assert_eq!(field.min(), 0.0);
    assert_eq!(field.max(), 1.0);
    assert!(field.as_slice().iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));

    let colors = generator.color_grid().expect("colors");
    let mask = generator.water_mask().expect("mask");
    let colorizer = ElevationColorizer::default();
    for i in (0..64).step_by(7) {
        for j in (0..64).step_by(5) {
            let h = field.get(i, j);
            assert_eq!(colors.get(i, j), colorizer.color_at(h));
            assert_eq!(mask.is_submerged(i, j), h <= DEFAULT_WATER_LEVEL);
        }
    }
    // The lowest cell is always under water, the highest never
    assert!(mask.coverage() > 0.0 && mask.coverage() < 1.0);
}

#[test]
fn test_different_seeds_differ() {
    let params = SynthesisParams {
        size: 32,
        ..Default::default()
    };
    let a = synthesize(Some(1), &params).unwrap();
    let b = synthesize(Some(2), &params).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_shoreline_matches_beach_band() {
    assert_eq!(BEACH_THRESHOLD, DEFAULT_WATER_LEVEL);
    let colorizer = ElevationColorizer::default();
    let beach = colorizer
        .bands()
        .iter()
        .find(|b| b.name == "beach")
        .expect("default table has a beach band");
    assert_eq!(beach.threshold, TerrainConfig::default().water_level);
}

#[test]
fn test_ungenerated_state() {
    let generator = TerrainGenerator::new(TerrainConfig {
        size: 8,
        seed: Some(SEED),
        ..Default::default()
    })
    .unwrap();
    let err = generator.color_grid().unwrap_err();
    assert!(matches!(err, TerrainError::NotGenerated));
    assert!(err.to_string().contains("not been generated"));
}

#[test]
fn test_invalid_parameters_never_compute() {
    for params in [
        SynthesisParams { size: 0, ..Default::default() },
        SynthesisParams { scale: 0.0, ..Default::default() },
        SynthesisParams { octaves: 0, ..Default::default() },
    ] {
        assert!(matches!(
            synthesize(Some(SEED), &params),
            Err(TerrainError::InvalidParameter { .. })
        ));
    }
}

#[test]
fn test_divergent_octaves_stay_finite() {
    let params = SynthesisParams {
        size: 200,
        scale: 10.0,
        octaves: 2,
        persistence: 0.5,
        lacunarity: 1e307,
    };
    let field = synthesize(Some(7), &params).expect("unvalidated lacunarity is accepted");
    let nans = field.as_slice().iter().filter(|v| v.is_nan()).count();
    assert_eq!(nans, 0);
    assert!(!field.min().is_nan() && !field.max().is_nan());
}
