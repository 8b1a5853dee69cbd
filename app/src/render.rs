// Turns finished terrain grids into a lit, top-down RGB image.
// Nothing here mutates the grids it is handed.

use image::RgbImage;
use terrain_core::{ColorGrid, HeightField, WaterMask};

pub const LIGHT_AZIMUTH_DEG: f64 = 315.0;
pub const LIGHT_ALTITUDE_DEG: f64 = 45.0;
pub const VERTICAL_EXAGGERATION: f64 = 0.1;
// Deep-water band color, #1a5f7a
pub const WATER_RGB: [u8; 3] = [0x1a, 0x5f, 0x7a];
pub const WATER_OPACITY: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub lighting: bool,
    pub water: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            lighting: true,
            water: true,
        }
    }
}

// Unit vector pointing at the light, azimuth measured clockwise from north
fn light_direction(azimuth_deg: f64, altitude_deg: f64) -> [f64; 3] {
    let az = (90.0 - azimuth_deg).to_radians();
    let alt = altitude_deg.to_radians();
    [az.cos() * alt.cos(), az.sin() * alt.cos(), alt.sin()]
}

// Finite difference along one axis: central inside, one-sided at the borders
fn derivative(field: &HeightField, i: usize, j: usize, along_rows: bool) -> f64 {
    let n = field.size();
    if n < 2 {
        return 0.0;
    }
    let at = |k: usize| {
        if along_rows {
            field.get(k, j)
        } else {
            field.get(i, k)
        }
    };
    let k = if along_rows { i } else { j };
    if k == 0 {
        at(1) - at(0)
    } else if k == n - 1 {
        at(n - 1) - at(n - 2)
    } else {
        (at(k + 1) - at(k - 1)) / 2.0
    }
}

// Lambertian hillshade intensity per cell, rescaled to [0, 1] over the grid
pub fn hillshade(field: &HeightField, vert_exag: f64) -> Vec<f64> {
    let n = field.size();
    let [lx, ly, lz] = light_direction(LIGHT_AZIMUTH_DEG, LIGHT_ALTITUDE_DEG);

    let mut intensity = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let dzdy = derivative(field, i, j, true) * vert_exag;
            let dzdx = derivative(field, i, j, false) * vert_exag;
            // Surface normal (-dz/dx, -dz/dy, 1), normalized
            let (nx, ny, nz) = (-dzdx, -dzdy, 1.0);
            let len = (nx * nx + ny * ny + nz * nz).sqrt();
            intensity.push((nx * lx + ny * ly + nz * lz) / len);
        }
    }

    let min = intensity.iter().copied().fold(f64::INFINITY, f64::min);
    let max = intensity.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // A flat field keeps its absolute intensity
    if max - min > 1e-6 {
        for v in intensity.iter_mut() {
            *v = ((*v - min) / (max - min)).clamp(0.0, 1.0);
        }
    }
    intensity
}

// Soft-light blend of one channel with a shade intensity; 0.5 leaves it unchanged
pub fn soft_light(channel: f64, intensity: f64) -> f64 {
    2.0 * intensity * channel + (1.0 - 2.0 * intensity) * channel * channel
}

// Packed RGB bytes, row-major, 3 per cell
pub fn render_rgb8(
    field: &HeightField,
    colors: &ColorGrid,
    mask: &WaterMask,
    opts: RenderOptions,
) -> Vec<u8> {
    let n = field.size();
    let shade = opts
        .lighting
        .then(|| hillshade(field, VERTICAL_EXAGGERATION));
    let water = WATER_RGB.map(|c| c as f64 / 255.0);

    let mut buf = Vec::with_capacity(n * n * 3);
    for i in 0..n {
        for j in 0..n {
            let c = colors.get(i, j);
            let mut rgb = [c.red as f64, c.green as f64, c.blue as f64];

            if let Some(shade) = &shade {
                let s = shade[i * n + j];
                for ch in rgb.iter_mut() {
                    *ch = soft_light(*ch, s);
                }
            }
            if opts.water && mask.is_submerged(i, j) {
                for (ch, w) in rgb.iter_mut().zip(water) {
                    *ch = *ch * (1.0 - WATER_OPACITY) + w * WATER_OPACITY;
                }
            }

            for ch in rgb {
                buf.push((ch.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
    }
    buf
}

pub fn to_image(rgb: &[u8], size: usize) -> Option<RgbImage> {
    RgbImage::from_raw(size as u32, size as u32, rgb.to_vec())
}
