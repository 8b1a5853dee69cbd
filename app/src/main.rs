mod render;

use std::path::Path;

use eframe::{App, Frame, NativeOptions, egui, run_native};
use egui::{ColorImage, TextureHandle};
use log::{error, info};
use terrain_core::{TerrainConfig, TerrainGenerator};

use crate::render::{RenderOptions, render_rgb8, to_image};

struct TerrainApp {
    // parameters, seeded from the optional config file
    base: TerrainConfig,
    size: usize,
    scale: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
    seed: u64,
    water_level: f64,

    // display toggles
    show_water: bool,
    lighting: bool,

    // generated texture
    terrain_texture: Option<TextureHandle>,

    status_message: String,

    // Last rendered RGB buffer and its side length
    last_rgb: Option<Vec<u8>>,
    last_size: usize,
}

impl TerrainApp {
    fn new(base: TerrainConfig) -> Self {
        Self {
            size: base.size,
            scale: base.scale,
            octaves: base.octaves,
            persistence: base.persistence,
            lacunarity: base.lacunarity,
            // Unseeded configs get a concrete seed so the run can be reproduced
            seed: base.seed.unwrap_or_else(rand::random),
            water_level: base.water_level,
            show_water: true,
            lighting: true,
            terrain_texture: None,
            status_message: String::new(),
            last_rgb: None,
            last_size: base.size,
            base,
        }
    }

    fn current_config(&self) -> TerrainConfig {
        TerrainConfig {
            size: self.size,
            scale: self.scale,
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
            seed: Some(self.seed),
            water_level: self.water_level,
            ..self.base.clone()
        }
    }

    // Generate, color, mask and render; returns the RGB buffer and water coverage
    fn run_pipeline(&self) -> terrain_core::Result<(Vec<u8>, f64)> {
        let mut generator = TerrainGenerator::new(self.current_config())?;
        generator.generate()?;
        let colors = generator.color_grid()?;
        let mask = generator.water_mask()?;
        let opts = RenderOptions {
            lighting: self.lighting,
            water: self.show_water,
        };
        let rgb = render_rgb8(generator.terrain()?, &colors, &mask, opts);
        Ok((rgb, mask.coverage()))
    }

    fn generate(&mut self, ctx: &egui::Context) {
        let start = std::time::Instant::now();
        match self.run_pipeline() {
            Ok((rgb, coverage)) => {
                let color_image = ColorImage::from_rgb([self.size, self.size], &rgb);
                self.terrain_texture =
                    Some(ctx.load_texture("terrain", color_image, egui::TextureOptions::NEAREST));
                self.last_rgb = Some(rgb);
                // Keep size in sync with the buffer
                self.last_size = self.size;
                let ms = start.elapsed().as_secs_f64() * 1000.0;
                self.status_message = format!(
                    "Generated in {:.2} ms (seed {}), water coverage {:.1}%",
                    ms,
                    self.seed,
                    coverage * 100.0
                );
                info!("{}", self.status_message);
            }
            Err(e) => {
                error!("generation failed: {}", e);
                self.status_message = format!("Error: {}", e);
            }
        }
        ctx.request_repaint();
    }

    fn save_png(&mut self) {
        let Some(rgb) = &self.last_rgb else {
            self.status_message = "Nothing to save, generate first".into();
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name(format!("terrain_{}.png", self.seed))
            .save_file()
        else {
            return;
        };
        self.status_message = match save_image(rgb, self.last_size, &path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => {
                error!("saving {} failed: {}", path.display(), e);
                format!("Save error: {}", e)
            }
        };
    }
}

fn save_image(rgb: &[u8], size: usize, path: &Path) -> anyhow::Result<()> {
    let img = to_image(rgb, size)
        .ok_or_else(|| anyhow::anyhow!("buffer does not match a {size}x{size} image"))?;
    img.save(path)?;
    Ok(())
}

impl App for TerrainApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Terrain Generator");
            ui.separator();

            let prev_size = self.size;
            ui.label("Grid Size");
            let size_label = format!("{}×{}", self.size, self.size);
            ui.add(egui::Slider::new(&mut self.size, 16..=256).text(size_label));
            if prev_size != self.size {
                self.terrain_texture = None; // reset texture on size change
                self.last_rgb = None;
                self.status_message = "Texture reset due to size change".into();
            }

            ui.label("Seed");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut self.seed).speed(1.0));
                if ui.button("Randomize").clicked() {
                    self.seed = rand::random();
                }
            });

            ui.label("Scale");
            ui.add(egui::Slider::new(&mut self.scale, 1.0..=100.0));
            ui.label("Octaves");
            ui.add(egui::Slider::new(&mut self.octaves, 1..=8));
            ui.label("Persistence");
            ui.add(egui::Slider::new(&mut self.persistence, 0.05..=1.0));
            ui.label("Lacunarity");
            ui.add(egui::Slider::new(&mut self.lacunarity, 1.0..=4.0));

            ui.separator();
            ui.label("Water Level");
            ui.add(egui::Slider::new(&mut self.water_level, 0.0..=1.0));
            ui.checkbox(&mut self.show_water, "Show Water");
            ui.checkbox(&mut self.lighting, "Directional Lighting");

            ui.separator();
            if ui.button("Generate Terrain").clicked() {
                self.generate(ctx);
            }
            if ui.button("Save PNG…").clicked() {
                self.save_png();
            }

            ui.separator();
            ui.label(&self.status_message);
        });

        // central display
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(tex) = &self.terrain_texture {
                let available = ui.available_size();
                let side = available.x.min(available.y);
                ui.image((tex.id(), egui::vec2(side, side)));
            } else {
                ui.centered_and_justified(|ui| {
                    ui.label("Click “Generate Terrain” to start");
                });
            }
        });
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional TOML config as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("loading config from {}", path);
            let config = TerrainConfig::load(&path)?;
            config.validate()?;
            config
        }
        None => TerrainConfig::default(),
    };

    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    run_native(
        "Terrain Generator",
        opts,
        Box::new(|_cc| Ok(Box::new(TerrainApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
