//! Axis-aligned proximity test
//!
//! "Near" is an overlap of margin-inflated AABBs rather than an exact
//! contact query: the halo distance is tunable and the test is cheap enough
//! to recompute every frame without touching the physics engine's contact
//! lists.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box around `center` with the given half extents, inflated by `margin`
    /// on every side.
    pub fn around(center: Vec2, half_extents: Vec2, margin: f32) -> Self {
        let reach = half_extents + Vec2::splat(margin);
        Self {
            min: center - reach,
            max: center + reach,
        }
    }

    /// Inclusive overlap: boxes touching exactly at an edge count as
    /// overlapping, since this negates a strict-disjoint test.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }
}

/// Proximity predicate between two boxes with independent margins.
pub fn boxes_near(
    pos_a: Vec2,
    half_a: Vec2,
    margin_a: f32,
    pos_b: Vec2,
    half_b: Vec2,
    margin_b: f32,
) -> bool {
    Aabb::around(pos_a, half_a, margin_a).overlaps(&Aabb::around(pos_b, half_b, margin_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identical_centers_overlap() {
        let a = Aabb::around(Vec2::new(3.0, -1.0), Vec2::splat(1.0), 0.0);
        let b = Aabb::around(Vec2::new(3.0, -1.0), Vec2::splat(0.25), 0.0);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_separated_boxes_disjoint() {
        // Further apart than the sum of half extents on x.
        let a = Aabb::around(Vec2::ZERO, Vec2::splat(1.0), 0.0);
        let b = Aabb::around(Vec2::new(2.5, 0.0), Vec2::splat(1.0), 0.0);
        assert!(!a.overlaps(&b));

        // And on y.
        let c = Aabb::around(Vec2::new(0.0, 5.0), Vec2::splat(1.0), 0.0);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_edges_count_as_overlap() {
        let a = Aabb::around(Vec2::ZERO, Vec2::splat(1.0), 0.0);
        let b = Aabb::around(Vec2::new(2.0, 0.0), Vec2::splat(1.0), 0.0);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_margin_extends_reach() {
        // Half extents 1.0 and 0.5; with a 1.0 margin on the first box the
        // inflated reaches sum to 2.5.
        assert!(boxes_near(
            Vec2::ZERO,
            Vec2::splat(1.0),
            1.0,
            Vec2::new(1.5, 0.0),
            Vec2::splat(0.5),
            0.0,
        ));
        // Touching exactly at the inflated boundary still counts.
        assert!(boxes_near(
            Vec2::ZERO,
            Vec2::splat(1.0),
            1.0,
            Vec2::new(2.5, 0.0),
            Vec2::splat(0.5),
            0.0,
        ));
        // Just beyond it does not.
        assert!(!boxes_near(
            Vec2::ZERO,
            Vec2::splat(1.0),
            1.0,
            Vec2::new(2.51, 0.0),
            Vec2::splat(0.5),
            0.0,
        ));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            aw in 0.01f32..10.0, ah in 0.01f32..10.0,
            bw in 0.01f32..10.0, bh in 0.01f32..10.0,
            ma in 0.0f32..5.0, mb in 0.0f32..5.0,
        ) {
            let a = Aabb::around(Vec2::new(ax, ay), Vec2::new(aw, ah), ma);
            let b = Aabb::around(Vec2::new(bx, by), Vec2::new(bw, bh), mb);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_far_apart_never_overlaps(
            aw in 0.01f32..10.0, ah in 0.01f32..10.0,
            bw in 0.01f32..10.0, bh in 0.01f32..10.0,
        ) {
            // Separation strictly greater than the sum of half extents.
            let dx = aw + bw + 0.1;
            let a = Aabb::around(Vec2::ZERO, Vec2::new(aw, ah), 0.0);
            let b = Aabb::around(Vec2::new(dx, 0.0), Vec2::new(bw, bh), 0.0);
            prop_assert!(!a.overlaps(&b));
        }
    }
}
