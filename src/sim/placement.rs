//! Spawn placement
//!
//! Rejection sampling along a horizontal line: try a handful of random x
//! positions, keep the first that clears every live bean, and if none does,
//! accept one more random position anyway so spawning never stalls.

use glam::Vec2;
use rand::Rng;

use crate::consts::PLACEMENT_MARGIN;
use crate::uniform;

/// A live body as seen by the placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occupant {
    pub center: Vec2,
    pub radius: f32,
}

/// Outcome of a placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    /// False when every trial overlapped and the fallback position was taken
    pub clear: bool,
}

/// Circle-circle overlap including the placement margin
#[inline]
pub fn overlaps(candidate: Vec2, radius: f32, other: &Occupant) -> bool {
    let reach = radius + other.radius + PLACEMENT_MARGIN;
    candidate.distance_squared(other.center) < reach * reach
}

/// Find an x in `[x_min, x_max)` at height `y` where a circle of `radius`
/// overlaps none of `occupants`, trying at most `attempts` times.
pub fn find_free_position<R: Rng + ?Sized>(
    rng: &mut R,
    x_min: f32,
    x_max: f32,
    y: f32,
    radius: f32,
    occupants: &[Occupant],
    attempts: usize,
) -> Placement {
    for _ in 0..attempts {
        let candidate = Vec2::new(uniform(rng, x_min, x_max), y);
        if !occupants.iter().any(|o| overlaps(candidate, radius, o)) {
            return Placement {
                position: candidate,
                clear: true,
            };
        }
    }

    Placement {
        position: Vec2::new(uniform(rng, x_min, x_max), y),
        clear: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_empty_world_is_always_clear() {
        let mut rng = Pcg32::seed_from_u64(1);
        let p = find_free_position(&mut rng, 10.0, 790.0, -160.0, 10.0, &[], 12);
        assert!(p.clear);
        assert_eq!(p.position.y, -160.0);
        assert!((10.0..790.0).contains(&p.position.x));
    }

    #[test]
    fn test_margin_counts_as_overlap() {
        let other = Occupant {
            center: Vec2::ZERO,
            radius: 10.0,
        };
        // Exactly touching still overlaps because of the 1.2 margin
        assert!(overlaps(Vec2::new(20.0, 0.0), 10.0, &other));
        assert!(overlaps(Vec2::new(21.1, 0.0), 10.0, &other));
        assert!(!overlaps(Vec2::new(21.3, 0.0), 10.0, &other));
    }

    #[test]
    fn test_crowded_line_falls_back() {
        let mut rng = Pcg32::seed_from_u64(3);
        // One huge occupant covers the whole span
        let wall = [Occupant {
            center: Vec2::new(100.0, 0.0),
            radius: 500.0,
        }];
        let p = find_free_position(&mut rng, 0.0, 200.0, 0.0, 5.0, &wall, 12);
        assert!(!p.clear);
        assert!((0.0..200.0).contains(&p.position.x));
    }

    #[test]
    fn test_zero_attempts_goes_straight_to_fallback() {
        let mut rng = Pcg32::seed_from_u64(3);
        let p = find_free_position(&mut rng, 0.0, 200.0, 0.0, 5.0, &[], 0);
        assert!(!p.clear);
    }

    #[test]
    fn test_finds_the_gap() {
        let mut rng = Pcg32::seed_from_u64(11);
        // Only the right half of the span is free
        let left = [Occupant {
            center: Vec2::new(0.0, 0.0),
            radius: 100.0,
        }];
        let mut clear_hits = 0;
        for _ in 0..50 {
            let p = find_free_position(&mut rng, 0.0, 400.0, 0.0, 5.0, &left, 12);
            if p.clear {
                clear_hits += 1;
                assert!(p.position.x >= 106.2);
            }
        }
        assert!(clear_hits > 45);
    }

    fn occupant() -> impl Strategy<Value = Occupant> {
        (0.0f32..800.0, -200.0f32..200.0, 4.0f32..30.0).prop_map(|(x, y, radius)| Occupant {
            center: Vec2::new(x, y),
            radius,
        })
    }

    proptest! {
        #[test]
        fn clear_placements_never_overlap(
            seed in any::<u64>(),
            occupants in prop::collection::vec(occupant(), 0..40),
            radius in 4.0f32..30.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let p = find_free_position(&mut rng, 10.0, 790.0, 0.0, radius, &occupants, 12);
            prop_assert!(p.position.x >= 10.0 && p.position.x <= 790.0);
            if p.clear {
                for o in &occupants {
                    let reach = radius + o.radius + PLACEMENT_MARGIN;
                    prop_assert!(p.position.distance_squared(o.center) >= reach * reach);
                }
            }
        }
    }
}
