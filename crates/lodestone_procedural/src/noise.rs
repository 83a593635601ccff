//! # Simplex Noise
//!
//! Deterministic 2D simplex noise driving the climate of the
//! [`ProceduralOracle`](crate::ProceduralOracle).
//!
//! ## Determinism Guarantee
//!
//! The permutation table is shuffled by a `ChaCha8Rng` seeded from the
//! derived 64-bit stream, so the same seed gives bit-identical values on
//! every platform.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Skew factor for the 2D simplex grid, `(sqrt(3) - 1) / 2`.
const SKEW: f64 = 0.366_025_403_784_438_6;
/// Unskew factor, `(3 - sqrt(3)) / 6`.
const UNSKEW: f64 = 0.211_324_865_405_187_1;

/// Twelve gradient directions (edges of a cube projected to 2D).
const GRADIENTS: [(f64, f64); 12] = [
    (1.0, 0.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (-1.0, 1.0),
    (-1.0, 0.0),
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
    (1.0, 0.0),
    (0.0, 1.0),
    (-1.0, 0.0),
    (0.0, -1.0),
];

/// 2D simplex noise field.
///
/// Values lie in `[-1, 1]`. Sampling is allocation-free.
#[derive(Clone)]
pub struct SimplexField {
    /// 256-entry permutation, doubled so lookups never wrap.
    perm: Box<[u8; 512]>,
}

impl SimplexField {
    /// Builds a field from a 64-bit stream seed.
    #[must_use]
    pub fn new(stream: u64) -> Self {
        let mut base: Vec<u8> = (0..=255).collect();
        base.shuffle(&mut ChaCha8Rng::seed_from_u64(stream));

        let mut perm = Box::new([0u8; 512]);
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = base[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn hash(&self, i: i32, j: i32) -> usize {
        let jj = self.perm[(j & 255) as usize] as usize;
        self.perm[(i & 255) as usize + jj] as usize % GRADIENTS.len()
    }

    /// Samples the field at `(x, y)`.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * SKEW;
        let i = (x + s).floor() as i32;
        let j = (y + s).floor() as i32;

        let t = f64::from(i.wrapping_add(j)) * UNSKEW;
        let x0 = x - (f64::from(i) - t);
        let y0 = y - (f64::from(j) - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let corners = [
            (x0, y0, self.hash(i, j)),
            (
                x0 - f64::from(i1) + UNSKEW,
                y0 - f64::from(j1) + UNSKEW,
                self.hash(i.wrapping_add(i1), j.wrapping_add(j1)),
            ),
            (
                x0 - 1.0 + 2.0 * UNSKEW,
                y0 - 1.0 + 2.0 * UNSKEW,
                self.hash(i.wrapping_add(1), j.wrapping_add(1)),
            ),
        ];

        let total: f64 = corners
            .iter()
            .map(|&(dx, dy, g)| {
                let falloff = 0.5 - dx * dx - dy * dy;
                if falloff <= 0.0 {
                    0.0
                } else {
                    let (gx, gy) = GRADIENTS[g];
                    let f2 = falloff * falloff;
                    f2 * f2 * (gx * dx + gy * dy)
                }
            })
            .sum();

        (70.0 * total).clamp(-1.0, 1.0)
    }

    /// Fractal sum of `octaves` layers, normalised back to `[-1, 1]`.
    #[must_use]
    pub fn fractal(&self, x: f64, y: f64, octaves: u32) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut norm = 0.0;

        for _ in 0..octaves {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            norm += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        if norm > 0.0 {
            total / norm
        } else {
            0.0
        }
    }
}
