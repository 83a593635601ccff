//! Seeds, block positions and distance windows.
//!
//! Every radius test in the engine goes through this module and is done on
//! exact `i64` squared distances, so two implementations can never disagree
//! on a boundary because of floating-point rounding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A world seed.
///
/// One seed fully determines one generated world. Seeds are drawn once and
/// never mutated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(i64);

impl Seed {
    /// Wraps a raw seed value.
    #[inline]
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Derives an independent 64-bit stream for a given purpose.
    ///
    /// Same mixing the noise layers use, so one seed can feed several
    /// uncorrelated generators.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> u64 {
        let mut hash = self.0 as u64;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        hash
    }
}

impl From<i64> for Seed {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A horizontal block coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Block X
    pub x: i32,
    /// Block Z
    pub z: i32,
}

impl Position {
    /// World origin.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Squared Euclidean distance to another position.
    ///
    /// Exact for every pair of `i32` coordinates: each delta fits 33 bits,
    /// so the sum of squares fits `u128` with room to spare.
    #[inline]
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> u128 {
        let dx = (self.x as i64 - other.x as i64).unsigned_abs() as u128;
        let dz = (self.z as i64 - other.z as i64).unsigned_abs() as u128;
        dx * dx + dz * dz
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    /// Returns true if `x² + z² <= radius²`.
    #[inline]
    #[must_use]
    pub const fn is_within_radius(self, radius: u32) -> bool {
        let r = radius as u128;
        self.distance_squared(Self::ORIGIN) <= r * r
    }

    /// Offsets this position by a block delta.
    ///
    /// Saturates at the `i32` boundary instead of wrapping around the world.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.z.saturating_add(dz))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

/// Closed distance window `[min, max]` measured in blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistanceWindow {
    /// Inner radius (inclusive)
    pub min: u32,
    /// Outer radius (inclusive)
    pub max: u32,
}

impl DistanceWindow {
    /// Creates a window. Callers validate `min <= max`.
    #[inline]
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Window that accepts everything up to `max`.
    #[inline]
    #[must_use]
    pub const fn up_to(max: u32) -> Self {
        Self::new(0, max)
    }

    /// Returns true if the window is well formed.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.min <= self.max
    }

    /// Returns true if `candidate` lies within the window around `center`.
    #[inline]
    #[must_use]
    pub const fn contains(self, center: Position, candidate: Position) -> bool {
        let d2 = center.distance_squared(candidate);
        let min = self.min as u128;
        let max = self.max as u128;
        d2 >= min * min && d2 <= max * max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_radius_matches_integer_definition() {
        for x in -40..=40 {
            for z in -40..=40 {
                let p = Position::new(x, z);
                for r in [0u32, 1, 7, 16, 25, 32, 39] {
                    let expected = i64::from(x * x + z * z) <= i64::from(r * r);
                    assert_eq!(p.is_within_radius(r), expected, "({x}, {z}) r={r}");
                }
            }
        }
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        assert!(Position::new(3, 4).is_within_radius(5));
        assert!(!Position::new(3, 5).is_within_radius(5));
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let a = Position::new(i32::MIN, i32::MIN);
        let b = Position::new(i32::MAX, i32::MAX);
        let span = u128::from(u32::MAX);
        assert_eq!(a.distance_squared(b), 2 * span * span);
        assert_eq!(b.distance_squared(a), a.distance_squared(b));
        assert!(!a.is_within_radius(u32::MAX));
        assert!(Position::new(1, 1).is_within_radius(u32::MAX));
        assert!(Position::new(i32::MAX, 0).is_within_radius(u32::MAX));
    }

    #[test]
    fn test_window_with_huge_radii() {
        let window = DistanceWindow::new(u32::MAX - 1, u32::MAX);
        let far = Position::new(i32::MIN, 0);
        assert!(!window.contains(Position::ORIGIN, far));
        assert!(window.contains(Position::new(i32::MAX, 0), Position::new(i32::MIN, 0)));
        assert!(DistanceWindow::up_to(u32::MAX).contains(Position::ORIGIN, Position::new(1, 1)));
    }

    #[test]
    fn test_window_contains() {
        let window = DistanceWindow::new(100, 200);
        let center = Position::new(1000, -1000);

        assert!(!window.contains(center, center));
        assert!(window.contains(center, center.offset(100, 0)));
        assert!(window.contains(center, center.offset(0, -200)));
        assert!(!window.contains(center, center.offset(150, 150)));
        assert!(!DistanceWindow::new(5, 4).is_valid());
    }

    #[test]
    fn test_seed_derivation_is_stable() {
        let seed = Seed::new(-42);
        assert_eq!(seed.derive(1), seed.derive(1));
        assert_ne!(seed.derive(1), seed.derive(2));
    }
}
