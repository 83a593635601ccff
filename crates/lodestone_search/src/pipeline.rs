//! # Structure Search Pipeline
//!
//! Per-seed evaluation: single-structure search and the multi-structure
//! solver built on top of it.
//!
//! ## Candidate Stages
//!
//! ```text
//! locator ─► viable placement ─► viable terrain ─► biome valid
//!                                 (unless exempt)        │
//!                          confirmation ◄─ category ◄────┘
//!                          (gated kinds only)
//! ```
//!
//! ## Selection
//!
//! The closest surviving candidate wins, ties broken by region order.
//! Candidates are evaluated nearest first, so the first survivor is the
//! answer and farther candidates never cost an oracle call.
//!
//! ## Errors
//!
//! Recoverable oracle errors skip the candidate and are counted. Anything
//! else aborts the seed and is returned to the worker.

use tracing::debug;

use lodestone_procedural::{BiomeRule, OracleContext, OracleError, OracleResult};
use lodestone_shared::{BiomeCell, DistanceWindow, Position, Seed, StructureKind};

use crate::config::AttachedStructureSpec;
use crate::confirm::{confirm_biome, ConfirmationParams};
use crate::locator::CandidateLocator;
use crate::metrics::Attachment;

/// Base position plus every required attachment of a multi-structure find.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiMatch {
    /// Base structure position.
    pub base: Position,
    /// One entry per required attachment, in spec order.
    pub attachments: Vec<Attachment>,
}

/// Evaluates seeds against one worker's oracle context.
///
/// Candidate, claim and attachment buffers are kept between calls, so a
/// seed that finds nothing allocates nothing.
pub struct StructureFinder<'a, C> {
    ctx: &'a mut C,
    params: ConfirmationParams,
    skipped: u64,
    candidates: Vec<Position>,
    claimed: Vec<Position>,
    attachments: Vec<Attachment>,
}

fn note_skipped(seed: Seed, kind: StructureKind, err: &OracleError) {
    debug!(seed = seed.value(), structure = %kind, error = %err, "skipping candidate");
}

impl<'a, C: OracleContext> StructureFinder<'a, C> {
    /// Finder over `ctx` with the given confirmation tunables.
    pub fn new(ctx: &'a mut C, params: ConfirmationParams) -> Self {
        Self {
            ctx,
            params,
            skipped: 0,
            candidates: Vec::new(),
            claimed: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Recoverable errors skipped since the last call; resets the count.
    pub fn take_skipped(&mut self) -> u64 {
        std::mem::take(&mut self.skipped)
    }

    /// Closest position within `window` of `origin` where `kind` generates.
    ///
    /// # Errors
    ///
    /// The first non-recoverable oracle error.
    pub fn find(
        &mut self,
        seed: Seed,
        kind: StructureKind,
        origin: Position,
        window: DistanceWindow,
    ) -> OracleResult<Option<Position>> {
        self.claimed.clear();
        self.closest(seed, kind, origin, window)
    }

    /// Base structure plus every required attachment, or nothing.
    ///
    /// Attachments are searched around the base in spec order; each takes
    /// the closest candidate not already claimed by the base or an earlier
    /// attachment. Optional attachments are skipped.
    ///
    /// # Errors
    ///
    /// The first non-recoverable oracle error.
    pub fn find_multiple(
        &mut self,
        seed: Seed,
        kind: StructureKind,
        origin: Position,
        window: DistanceWindow,
        attached: &[AttachedStructureSpec],
    ) -> OracleResult<Option<MultiMatch>> {
        let Some(base) = self.find(seed, kind, origin, window)? else {
            return Ok(None);
        };

        self.claimed.clear();
        self.claimed.push(base);
        self.attachments.clear();
        for spec in attached.iter().filter(|spec| spec.required) {
            let Some(position) = self.closest(seed, spec.kind, base, spec.window())? else {
                return Ok(None);
            };
            self.claimed.push(position);
            self.attachments.push(Attachment {
                spec: *spec,
                position,
            });
        }

        Ok(Some(MultiMatch {
            base,
            attachments: self.attachments.clone(),
        }))
    }

    /// Closest surviving candidate not in `self.claimed`.
    fn closest(
        &mut self,
        seed: Seed,
        kind: StructureKind,
        origin: Position,
        window: DistanceWindow,
    ) -> OracleResult<Option<Position>> {
        let mut candidates = std::mem::take(&mut self.candidates);
        let outcome = self.pick(&mut candidates, seed, kind, origin, window);
        self.candidates = candidates;
        outcome
    }

    fn pick(
        &mut self,
        candidates: &mut Vec<Position>,
        seed: Seed,
        kind: StructureKind,
        origin: Position,
        window: DistanceWindow,
    ) -> OracleResult<Option<Position>> {
        candidates.clear();
        for item in CandidateLocator::new(&mut *self.ctx, seed, kind, origin, window)? {
            match item {
                Ok(pos) if !self.claimed.contains(&pos) => candidates.push(pos),
                Ok(_) => {}
                Err(err) if err.is_recoverable() => {
                    note_skipped(seed, kind, &err);
                    self.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        candidates.sort_by_key(|pos| pos.distance_squared(origin));

        for &pos in candidates.iter() {
            match self.survives(seed, kind, pos) {
                Ok(true) => return Ok(Some(pos)),
                Ok(false) => {}
                Err(err) if err.is_recoverable() => {
                    note_skipped(seed, kind, &err);
                    self.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }

    fn survives(&mut self, seed: Seed, kind: StructureKind, pos: Position) -> OracleResult<bool> {
        if !self.ctx.is_viable_placement(seed, kind, pos)? {
            return Ok(false);
        }
        if !kind.skips_terrain_check() && !self.ctx.is_viable_terrain(seed, kind, pos)? {
            return Ok(false);
        }

        let dimension = kind.dimension();
        let biome = self
            .ctx
            .biome_at(seed, dimension, BiomeCell::at_structure_layer(pos))?;
        if !biome.is_valid() {
            return Ok(false);
        }

        let Some(rule) = BiomeRule::for_structure(kind) else {
            return Ok(true);
        };
        if !rule.category.contains(biome) {
            return Ok(false);
        }

        let verdict = confirm_biome(
            &mut *self.ctx,
            seed,
            dimension,
            pos,
            rule.confirm_radius,
            biome,
            &self.params,
        )?;
        Ok(verdict.is_accepted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_procedural::{ScriptedOracle, WorldOracle};
    use lodestone_shared::BiomeId;

    fn desert_world() -> ScriptedOracle {
        ScriptedOracle::builder()
            .region_size(512)
            .biomes(|_, _| Ok(BiomeId::DESERT))
            .build()
    }

    #[test]
    fn test_closest_candidate_wins() {
        let oracle = desert_world();
        let mut ctx = oracle.create_context().unwrap();
        let mut finder = StructureFinder::new(&mut ctx, ConfirmationParams::default());

        let found = finder
            .find(
                Seed::new(1),
                StructureKind::Village,
                Position::ORIGIN,
                DistanceWindow::up_to(600),
            )
            .unwrap();
        assert_eq!(found, Some(Position::ORIGIN));
        // Nearest first: only the winner is ever checked for viability.
        assert_eq!(oracle.stats().placement_queries, 1);
    }

    #[test]
    fn test_terrain_exempt_kinds() {
        let oracle = ScriptedOracle::builder()
            .terrain(|_, _, _| Ok(false))
            .build();
        let mut ctx = oracle.create_context().unwrap();
        let mut finder = StructureFinder::new(&mut ctx, ConfirmationParams::default());
        let window = DistanceWindow::up_to(100);

        assert!(finder
            .find(Seed::new(0), StructureKind::AncientCity, Position::ORIGIN, window)
            .unwrap()
            .is_some());
        assert!(finder
            .find(Seed::new(0), StructureKind::Igloo, Position::ORIGIN, window)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_invalid_biome_rejects_ungated_kind() {
        let oracle = ScriptedOracle::uniform(BiomeId::NONE);
        let mut ctx = oracle.create_context().unwrap();
        let mut finder = StructureFinder::new(&mut ctx, ConfirmationParams::default());
        let found = finder
            .find(
                Seed::new(0),
                StructureKind::Outpost,
                Position::ORIGIN,
                DistanceWindow::up_to(100),
            )
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_wrong_category_never_reaches_confirmation() {
        let oracle = ScriptedOracle::uniform(BiomeId::JUNGLE);
        let mut ctx = oracle.create_context().unwrap();
        let mut finder = StructureFinder::new(&mut ctx, ConfirmationParams::default());
        let found = finder
            .find(
                Seed::new(0),
                StructureKind::Village,
                Position::ORIGIN,
                DistanceWindow::up_to(100),
            )
            .unwrap();
        assert_eq!(found, None);
        assert_eq!(oracle.stats().biome_queries, 1);
    }

    #[test]
    fn test_recoverable_errors_are_skipped_and_counted() {
        let oracle = ScriptedOracle::builder()
            .region_size(512)
            .biomes(|_, _| Ok(BiomeId::DESERT))
            .placement(|_, _, pos| {
                if pos == Position::ORIGIN {
                    Err(OracleError::Query {
                        query: "placement",
                        position: pos,
                        reason: "flaky".into(),
                    })
                } else {
                    Ok(true)
                }
            })
            .build();
        let mut ctx = oracle.create_context().unwrap();
        let mut finder = StructureFinder::new(&mut ctx, ConfirmationParams::default());

        let found = finder
            .find(
                Seed::new(0),
                StructureKind::Village,
                Position::ORIGIN,
                DistanceWindow::up_to(600),
            )
            .unwrap();
        // Ties at 512 go to the first in region order.
        assert_eq!(found, Some(Position::new(-512, 0)));
        assert_eq!(finder.take_skipped(), 1);
        assert_eq!(finder.take_skipped(), 0);
    }

    #[test]
    fn test_fatal_errors_propagate() {
        let oracle = ScriptedOracle::builder()
            .biomes(|_, _| Err(OracleError::Context("generator lost".into())))
            .build();
        let mut ctx = oracle.create_context().unwrap();
        let mut finder = StructureFinder::new(&mut ctx, ConfirmationParams::default());
        let result = finder.find(
            Seed::new(0),
            StructureKind::Village,
            Position::ORIGIN,
            DistanceWindow::up_to(100),
        );
        assert_eq!(result, Err(OracleError::Context("generator lost".into())));
    }

    #[test]
    fn test_attachments_never_share_a_position() {
        let oracle = desert_world();
        let mut ctx = oracle.create_context().unwrap();
        let mut finder = StructureFinder::new(&mut ctx, ConfirmationParams::default());
        let attached = [
            AttachedStructureSpec::new(StructureKind::Outpost, DistanceWindow::up_to(600)),
            AttachedStructureSpec::new(StructureKind::Igloo, DistanceWindow::up_to(600)),
        ];

        let found = finder
            .find_multiple(
                Seed::new(0),
                StructureKind::Village,
                Position::ORIGIN,
                DistanceWindow::up_to(600),
                &attached,
            )
            .unwrap()
            .unwrap();
        assert_eq!(found.base, Position::ORIGIN);
        assert_eq!(found.attachments[0].position, Position::new(-512, 0));
        assert_eq!(found.attachments[1].position, Position::new(0, -512));
    }

    #[test]
    fn test_unsatisfied_required_attachment_fails_seed() {
        let oracle = desert_world();
        let mut ctx = oracle.create_context().unwrap();
        let mut finder = StructureFinder::new(&mut ctx, ConfirmationParams::default());
        let attached = [
            AttachedStructureSpec::new(StructureKind::Outpost, DistanceWindow::up_to(600)),
            // Nothing sits between 100 and 200 blocks of a region corner.
            AttachedStructureSpec::new(StructureKind::Igloo, DistanceWindow::new(100, 200)),
        ];
        let found = finder
            .find_multiple(
                Seed::new(0),
                StructureKind::Village,
                Position::ORIGIN,
                DistanceWindow::up_to(600),
                &attached,
            )
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_buffers_are_reused_across_seeds() {
        let oracle = desert_world();
        let mut ctx = oracle.create_context().unwrap();
        let mut finder = StructureFinder::new(&mut ctx, ConfirmationParams::default());
        let attached = [AttachedStructureSpec::new(
            StructureKind::Outpost,
            DistanceWindow::up_to(600),
        )];

        let first = finder
            .find_multiple(
                Seed::new(0),
                StructureKind::Village,
                Position::ORIGIN,
                DistanceWindow::up_to(600),
                &attached,
            )
            .unwrap()
            .unwrap();
        let capacities = (
            finder.candidates.capacity(),
            finder.claimed.capacity(),
            finder.attachments.capacity(),
        );
        assert!(capacities.0 > 0);

        for seed in 1..50 {
            let found = finder
                .find_multiple(
                    Seed::new(seed),
                    StructureKind::Village,
                    Position::ORIGIN,
                    DistanceWindow::up_to(600),
                    &attached,
                )
                .unwrap()
                .unwrap();
            assert_eq!(found, first);
        }
        assert_eq!(
            (
                finder.candidates.capacity(),
                finder.claimed.capacity(),
                finder.attachments.capacity(),
            ),
            capacities
        );
    }

    #[test]
    fn test_optional_attachments_are_ignored() {
        let oracle = desert_world();
        let mut ctx = oracle.create_context().unwrap();
        let mut finder = StructureFinder::new(&mut ctx, ConfirmationParams::default());
        let attached = [AttachedStructureSpec::new(
            StructureKind::Igloo,
            DistanceWindow::new(100, 200),
        )
        .optional()];
        let found = finder
            .find_multiple(
                Seed::new(0),
                StructureKind::Village,
                Position::ORIGIN,
                DistanceWindow::up_to(600),
                &attached,
            )
            .unwrap()
            .unwrap();
        assert!(found.attachments.is_empty());
    }
}
