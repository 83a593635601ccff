//! # Biome Confirmation Sampler
//!
//! Decides whether a target biome dominates the disc of `radius` blocks
//! around a candidate, with as few biome lookups as possible.
//!
//! ## Algorithm
//!
//! ```text
//!            (0,-r)
//!              ●            1. cardinal fast-reject: any of the four
//!      q3      │     q0        cardinal points off-target rejects at once
//!   ───●───────┼───────●─── 2. quadrant lattice on a fixed stride, points
//!   (-r,0)     │     (r,0)     inside the disc only
//!      q2      │     q1     3. early accept: enough samples, ratio met
//!              ●            4. early reject: even a perfect remainder
//!            (0,r)             cannot lift the ratio back
//!                           5. final ratio check
//! ```
//!
//! Quadrant `q` visits the half-open lattice `{(i*s, j*s) : i >= 0, j >= 1}`
//! rotated by `q * 90°`, so the four quadrants tile the disc without
//! overlap and never revisit the center.

use serde::{Deserialize, Serialize};

use lodestone_procedural::{BiomeRule, OracleContext, OracleResult};
use lodestone_shared::{
    BiomeCell, BiomeId, Dimension, Position, Seed, StructureKind, DEFAULT_CONFIRM_MIN_SAMPLES,
    DEFAULT_CONFIRM_RATIO, DEFAULT_CONFIRM_STRIDE,
};

/// Smallest confirmation radius of any gated structure.
fn smallest_confirm_radius() -> Option<u32> {
    StructureKind::ALL
        .into_iter()
        .filter_map(BiomeRule::for_structure)
        .map(|rule| rule.confirm_radius)
        .min()
}

/// Tunables of the confirmation sampler.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationParams {
    /// Lattice stride in blocks.
    pub stride: u32,
    /// Ratio that allows an early accept, and below which an early reject
    /// triggers.
    pub success_ratio: f64,
    /// Ratio required when sampling runs to completion.
    pub final_ratio: f64,
    /// Samples required before an early accept.
    pub min_samples: u32,
}

impl Default for ConfirmationParams {
    fn default() -> Self {
        Self {
            stride: DEFAULT_CONFIRM_STRIDE,
            success_ratio: DEFAULT_CONFIRM_RATIO,
            final_ratio: DEFAULT_CONFIRM_RATIO,
            min_samples: DEFAULT_CONFIRM_MIN_SAMPLES,
        }
    }
}

impl ConfirmationParams {
    /// Returns a description of the first invalid field, if any.
    ///
    /// The stride may not exceed the smallest confirmation radius: a wider
    /// lattice samples nothing inside that disc and rejects every candidate.
    #[must_use]
    pub fn problem(&self) -> Option<String> {
        if self.stride == 0 {
            return Some("confirmation stride must be at least 1".into());
        }
        if let Some(radius) = smallest_confirm_radius() {
            if self.stride > radius {
                return Some(format!(
                    "confirmation stride {} exceeds the smallest confirmation radius {radius}",
                    self.stride
                ));
            }
        }
        for (name, ratio) in [
            ("success_ratio", self.success_ratio),
            ("final_ratio", self.final_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Some(format!("{name} must lie in [0, 1], got {ratio}"));
            }
        }
        None
    }
}

/// Outcome of one confirmation, with the samples it took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// A cardinal point was off-target.
    CardinalReject,
    /// Accepted before the lattice was exhausted.
    EarlyAccept,
    /// Rejected before the lattice was exhausted.
    EarlyReject,
    /// Lattice exhausted, final ratio met.
    Accept,
    /// Lattice exhausted, final ratio missed (or nothing sampled).
    Reject,
}

impl Verdict {
    /// Returns true for both accepting verdicts.
    #[inline]
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::EarlyAccept | Self::Accept)
    }
}

/// Running tally of lattice samples.
#[derive(Clone, Copy, Debug, Default)]
struct Tally {
    count: u32,
    total: u32,
}

impl Tally {
    fn ratio_met(self, ratio: f64) -> bool {
        f64::from(self.count) >= ratio * f64::from(self.total)
    }

    fn unrecoverable(self, remaining: f64, ratio: f64) -> bool {
        let best = (f64::from(self.count) + remaining) / (f64::from(self.total) + remaining);
        best < ratio
    }
}

/// Rotates a lattice offset into quadrant `q`.
#[inline]
const fn rotate(quadrant: u8, a: i32, b: i32) -> (i32, i32) {
    match quadrant {
        0 => (a, b),
        1 => (-b, a),
        2 => (-a, -b),
        _ => (b, -a),
    }
}

/// Confirms that `target` dominates the disc around `center`.
///
/// # Errors
///
/// Propagates the first oracle failure.
pub fn confirm_biome<C: OracleContext>(
    ctx: &mut C,
    seed: Seed,
    dimension: Dimension,
    center: Position,
    radius: u32,
    target: BiomeId,
    params: &ConfirmationParams,
) -> OracleResult<Verdict> {
    let mut lookup = |pos: Position| -> OracleResult<bool> {
        ctx.biome_at(seed, dimension, BiomeCell::at_structure_layer(pos))
            .map(|biome| biome == target)
    };

    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    for (dx, dz) in [(r, 0), (-r, 0), (0, r), (0, -r)] {
        if !lookup(center.offset(dx, dz))? {
            return Ok(Verdict::CardinalReject);
        }
    }

    let stride = i64::from(params.stride.max(1));
    let r2 = i64::from(radius) * i64::from(radius);
    let remaining = (r2 as f64 / (stride * stride) as f64) / 4.0;
    let steps = i64::from(radius) / stride;
    let mut tally = Tally::default();

    for quadrant in 0..4u8 {
        for i in 0..=steps {
            for j in 1..=steps {
                let (a, b) = (i * stride, j * stride);
                if a * a + b * b > r2 {
                    break;
                }
                let (dx, dz) = rotate(quadrant, a as i32, b as i32);

                tally.total += 1;
                if lookup(center.offset(dx, dz))? {
                    tally.count += 1;
                }

                if tally.total >= params.min_samples && tally.ratio_met(params.success_ratio) {
                    return Ok(Verdict::EarlyAccept);
                }
                if tally.unrecoverable(remaining, params.success_ratio) {
                    return Ok(Verdict::EarlyReject);
                }
            }
        }
    }

    if tally.total > 0 && tally.ratio_met(params.final_ratio) {
        Ok(Verdict::Accept)
    } else {
        Ok(Verdict::Reject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_procedural::{ScriptedOracle, WorldOracle};
    use std::collections::HashSet;

    fn run(oracle: &ScriptedOracle, radius: u32, params: &ConfirmationParams) -> Verdict {
        let mut ctx = oracle.create_context().unwrap();
        confirm_biome(
            &mut ctx,
            Seed::new(1),
            Dimension::Overworld,
            Position::new(1000, 1000),
            radius,
            BiomeId::DESERT,
            params,
        )
        .unwrap()
    }

    #[test]
    fn test_uniform_disc_accepts() {
        let oracle = ScriptedOracle::uniform(BiomeId::DESERT);
        for radius in [16, 32, 48, 64] {
            assert!(run(&oracle, radius, &ConfirmationParams::default()).is_accepted());
        }
    }

    #[test]
    fn test_off_target_cardinal_rejects_after_at_most_four_lookups() {
        let oracle = ScriptedOracle::builder()
            .biomes(|_, cell| {
                // Everything desert except far east.
                Ok(if cell.x >= (1000 + 30) >> 2 {
                    BiomeId::PLAINS
                } else {
                    BiomeId::DESERT
                })
            })
            .build();

        assert_eq!(
            run(&oracle, 32, &ConfirmationParams::default()),
            Verdict::CardinalReject
        );
        assert_eq!(oracle.stats().biome_queries, 1);
    }

    #[test]
    fn test_quadrants_do_not_overlap() {
        let oracle = ScriptedOracle::builder()
            .biomes(|_, _| Ok(BiomeId::DESERT))
            .record_biomes()
            .build();
        let params = ConfirmationParams {
            stride: 4,
            min_samples: u32::MAX,
            ..ConfirmationParams::default()
        };
        let mut ctx = oracle.create_context().unwrap();
        let verdict = confirm_biome(
            &mut ctx,
            Seed::new(0),
            Dimension::Overworld,
            Position::ORIGIN,
            16,
            BiomeId::DESERT,
            &params,
        )
        .unwrap();
        assert_eq!(verdict, Verdict::Accept);

        let lattice = &oracle.biome_log()[4..];
        let unique: HashSet<_> = lattice.iter().collect();
        assert_eq!(unique.len(), lattice.len());
        // Lattice points of stride 4 inside a radius-16 disc, minus the center.
        let expected = (-4i32..=4)
            .flat_map(|i| (-4i32..=4).map(move |j| (i, j)))
            .filter(|&(i, j)| i * i + j * j <= 16 && (i, j) != (0, 0))
            .count();
        assert_eq!(lattice.len(), expected);
    }

    #[test]
    fn test_scattered_mismatch_rejects_early() {
        // Cardinals match, but the interior is mostly foreign.
        let oracle = ScriptedOracle::builder()
            .biomes(|_, cell| {
                let on_axis = cell.x == 1000 >> 2 || cell.z == 1000 >> 2;
                Ok(if on_axis { BiomeId::DESERT } else { BiomeId::PLAINS })
            })
            .build();
        assert_eq!(
            run(&oracle, 64, &ConfirmationParams::default()),
            Verdict::EarlyReject
        );
    }

    #[test]
    fn test_invalid_params() {
        let zero_stride = ConfirmationParams {
            stride: 0,
            ..ConfirmationParams::default()
        };
        assert!(zero_stride.problem().is_some());

        let bad_ratio = ConfirmationParams {
            final_ratio: 1.5,
            ..ConfirmationParams::default()
        };
        assert!(bad_ratio.problem().is_some());
        assert!(ConfirmationParams::default().problem().is_none());
    }

    #[test]
    fn test_stride_wider_than_village_disc_is_invalid() {
        let too_wide = ConfirmationParams {
            stride: 32,
            ..ConfirmationParams::default()
        };
        assert!(too_wide.problem().is_some());

        let widest = ConfirmationParams {
            stride: 16,
            ..ConfirmationParams::default()
        };
        assert!(widest.problem().is_none());
        // The widest valid stride still samples the village disc.
        let oracle = ScriptedOracle::uniform(BiomeId::DESERT);
        assert!(run(&oracle, 16, &widest).is_accepted());
    }
}
