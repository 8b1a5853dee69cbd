use terrain_core::{TerrainConfig, TerrainGenerator};

fn main() -> terrain_core::Result<()> {
    // 64×64 terrain with seed 2025, otherwise default parameters
    let config = TerrainConfig {
        size: 64,
        scale: 25.0,
        seed: Some(2025),
        ..Default::default()
    };
    let mut generator = TerrainGenerator::new(config)?;
    let field = generator.generate()?;

    // Print the top-left 16×16 corner of the map
    for row in field.rows().take(16) {
        for v in &row[..16] {
            print!("{:>6.3} ", v);
        }
        println!();
    }

    let mask = generator.water_mask()?;
    println!("Water coverage: {:.1}%", mask.coverage() * 100.0);
    Ok(())
}
