use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::NoiseGenerator;

// Seeded 2D gradient (Perlin) noise.
// The lattice wraps every 256 units, so the field tiles with period 256
// along both axes. Sample coordinates stay well inside one tile for the
// grid sizes and scales this crate is used with.
#[derive(Clone)]
pub struct GradientNoise {
    seed: Option<u64>,
    perm: [u8; 512], // permutation table (256 duplicated)
}

impl GradientNoise {
    // `None` seeds the shuffle from OS entropy; `Some(seed)` is reproducible
    pub fn new(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        // Bijection over 0..=255
        let mut p: Vec<u8> = (0..=255).collect();
        p.shuffle(&mut rng);

        // Duplicate into an array of length 512
        // so that perm[x + 1] never needs a modulo
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }

        Self { seed, perm }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn permutation(&self) -> &[u8; 512] {
        &self.perm
    }

    // Fade function as defined by Ken Perlin: 6t^5 − 15t^4 + 10t^3
    // First and second derivatives are zero at t=0 and t=1,
    // which keeps the field C2-continuous across cell borders
    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn lerp(t: f64, a: f64, b: f64) -> f64 {
        a + t * (b - a)
    }

    // Low 2 bits pick one of four gradients:
    // bit 1 swaps the axes, bits 0 and 1 flip the signs
    #[inline]
    fn grad(hash: u8, x: f64, y: f64) -> f64 {
        let h = hash & 3;
        let (u, v) = if h < 2 { (x, y) } else { (y, x) };
        let u = if (h & 1) == 0 { u } else { -u };
        let v = if (h & 2) == 0 { v } else { -v };
        u + v
    }

    #[inline]
    fn p(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    // Single-octave noise at (x, y), roughly in [-1, 1], not clamped
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        // Unit square that contains the point
        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;
        // Position inside that square
        let xf = x - x.floor();
        let yf = y - y.floor();

        let u = Self::fade(xf);
        let v = Self::fade(yf);

        // Hash the four corners; indices stay below 512 by construction
        let a = self.p(xi) + yi;
        let aa = self.p(a);
        let ab = self.p(a + 1);
        let b = self.p(xi + 1) + yi;
        let ba = self.p(b);
        let bb = self.p(b + 1);

        let x1 = Self::lerp(
            u,
            Self::grad(self.perm[aa], xf, yf),
            Self::grad(self.perm[ba], xf - 1.0, yf),
        );
        let x2 = Self::lerp(
            u,
            Self::grad(self.perm[ab], xf, yf - 1.0),
            Self::grad(self.perm[bb], xf - 1.0, yf - 1.0),
        );
        Self::lerp(v, x1, x2)
    }
}

impl NoiseGenerator for GradientNoise {
    fn get2(&self, x: f64, y: f64) -> f64 {
        self.sample(x, y)
    }
}

impl std::fmt::Debug for GradientNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradientNoise")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
