//! # Structure Candidate Locator
//!
//! Walks the region grid around an origin and asks the oracle for the one
//! candidate each region places.
//!
//! ```text
//!   R = ceil(max_radius / region_size)
//!
//!   rx: cx-R ──────────────► cx+R      (outer)
//!   rz: cz-R ──► cz+R                  (inner)
//!
//!   at most (2R+1)^2 oracle calls, one per region
//! ```
//!
//! Candidates outside the distance window are dropped here. Everything else
//! (viability, biomes, deduplication) is the caller's job.

use lodestone_procedural::{OracleContext, OracleError, OracleResult};
use lodestone_shared::{DistanceWindow, Position, Seed, StructureKind};

/// Number of regions to walk on each side of the origin's region.
#[inline]
#[must_use]
pub fn region_reach(radius: u32, region_size: u32) -> i64 {
    if region_size == 0 {
        return 0;
    }
    i64::from(radius.div_ceil(region_size))
}

/// Lazy, finite sequence of in-window candidates for one seed and kind.
///
/// Yields `Err` for oracle failures so the caller decides which ones are
/// fatal; iteration continues after an error.
pub struct CandidateLocator<'a, C> {
    ctx: &'a mut C,
    seed: Seed,
    kind: StructureKind,
    origin: Position,
    window: DistanceWindow,
    center_x: i64,
    center_z: i64,
    reach: i64,
    dx: i64,
    dz: i64,
}

impl<'a, C: OracleContext> CandidateLocator<'a, C> {
    /// Prepares a walk around `origin`.
    ///
    /// # Errors
    ///
    /// Whatever the oracle reports for the region size; a zero size is
    /// reported as [`OracleError::Unsupported`].
    pub fn new(
        ctx: &'a mut C,
        seed: Seed,
        kind: StructureKind,
        origin: Position,
        window: DistanceWindow,
    ) -> OracleResult<Self> {
        let size = ctx.region_block_size(kind)?;
        if size == 0 {
            return Err(OracleError::Unsupported(kind));
        }
        let reach = region_reach(window.max, size);
        let size = i64::from(size);

        Ok(Self {
            ctx,
            seed,
            kind,
            origin,
            window,
            center_x: i64::from(origin.x).div_euclid(size),
            center_z: i64::from(origin.z).div_euclid(size),
            reach,
            dx: -reach,
            dz: -reach,
        })
    }

    /// Region cells the walk visits, in order.
    #[must_use]
    pub fn region_count(&self) -> u64 {
        let side = (2 * self.reach + 1) as u64;
        side * side
    }

    /// Next region cell, or `None` once the grid is exhausted.
    fn advance(&mut self) -> Option<(i64, i64)> {
        if self.dx > self.reach {
            return None;
        }
        let cell = (self.center_x + self.dx, self.center_z + self.dz);
        self.dz += 1;
        if self.dz > self.reach {
            self.dz = -self.reach;
            self.dx += 1;
        }
        Some(cell)
    }
}

impl<C: OracleContext> Iterator for CandidateLocator<'_, C> {
    type Item = OracleResult<Position>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((rx, rz)) = self.advance() {
            // Cells beyond the i32 grid cannot hold a block position.
            let (Ok(rx), Ok(rz)) = (i32::try_from(rx), i32::try_from(rz)) else {
                continue;
            };
            match self.ctx.candidate_position(self.seed, self.kind, rx, rz) {
                Ok(Some(pos)) if self.window.contains(self.origin, pos) => return Some(Ok(pos)),
                Ok(_) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_procedural::{ScriptedOracle, WorldOracle};

    #[test]
    fn test_region_reach_rounds_up() {
        assert_eq!(region_reach(600, 512), 2);
        assert_eq!(region_reach(512, 512), 1);
        assert_eq!(region_reach(0, 512), 0);
        assert_eq!(region_reach(1, 544), 1);
        assert_eq!(region_reach(100, 0), 0);
    }

    #[test]
    fn test_row_major_order_and_window() {
        let oracle = ScriptedOracle::builder().region_size(512).build();
        let mut ctx = oracle.create_context().unwrap();
        let locator = CandidateLocator::new(
            &mut ctx,
            Seed::new(0),
            StructureKind::Village,
            Position::ORIGIN,
            DistanceWindow::up_to(600),
        )
        .unwrap();
        assert_eq!(locator.region_count(), 25);

        let found: Vec<_> = locator.map(Result::unwrap).collect();
        assert_eq!(
            found,
            vec![
                Position::new(-512, 0),
                Position::new(0, -512),
                Position::new(0, 0),
                Position::new(0, 512),
                Position::new(512, 0),
            ]
        );
        assert_eq!(oracle.stats().candidate_queries, 25);
    }

    #[test]
    fn test_min_radius_excludes_center() {
        let oracle = ScriptedOracle::builder().region_size(512).build();
        let mut ctx = oracle.create_context().unwrap();
        let found: Vec<_> = CandidateLocator::new(
            &mut ctx,
            Seed::new(0),
            StructureKind::Village,
            Position::ORIGIN,
            DistanceWindow::new(100, 600),
        )
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
        assert_eq!(found.len(), 4);
        assert!(!found.contains(&Position::ORIGIN));
    }

    #[test]
    fn test_window_follows_origin_region() {
        let oracle = ScriptedOracle::builder().region_size(512).build();
        let mut ctx = oracle.create_context().unwrap();
        let origin = Position::new(5000, -5000);
        let found: Vec<_> = CandidateLocator::new(
            &mut ctx,
            Seed::new(0),
            StructureKind::Village,
            origin,
            DistanceWindow::up_to(300),
        )
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
        assert_eq!(found, vec![Position::new(5120, -5120)]);
    }

    #[test]
    fn test_errors_are_yielded_and_walk_continues() {
        let oracle = ScriptedOracle::builder()
            .region_size(512)
            .candidates(|_, _, rx, rz| {
                if rx == 0 && rz == 0 {
                    Err(OracleError::Query {
                        query: "candidate",
                        position: Position::ORIGIN,
                        reason: "flaky".into(),
                    })
                } else {
                    Ok(Some(Position::new(rx * 512, rz * 512)))
                }
            })
            .build();
        let mut ctx = oracle.create_context().unwrap();
        let items: Vec<_> = CandidateLocator::new(
            &mut ctx,
            Seed::new(0),
            StructureKind::Village,
            Position::ORIGIN,
            DistanceWindow::up_to(600),
        )
        .unwrap()
        .collect();
        assert_eq!(items.len(), 5);
        assert_eq!(items.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn test_unsupported_kind_fails_up_front() {
        let oracle = ScriptedOracle::builder()
            .unsupported(StructureKind::Igloo)
            .build();
        let mut ctx = oracle.create_context().unwrap();
        let result = CandidateLocator::new(
            &mut ctx,
            Seed::new(0),
            StructureKind::Igloo,
            Position::ORIGIN,
            DistanceWindow::up_to(100),
        );
        assert!(matches!(result, Err(OracleError::Unsupported(StructureKind::Igloo))));
    }
}
