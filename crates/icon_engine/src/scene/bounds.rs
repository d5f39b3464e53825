//! World-space bounding volumes of renderable object graphs
//!
//! The bounding volume drives camera framing: its center is the point the
//! camera looks at and its largest side sets both the camera distance and the
//! orthographic extent.

use crate::foundation::math::Vec3;
use crate::scene::object::SceneObject;

/// Axis-aligned bounding box stored as center and full size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    /// Center of the box in world space
    pub center: Vec3,
    /// Full extent along each axis (never negative)
    pub size: Vec3,
}

impl BoundingVolume {
    /// Create a bounding volume from center and size
    ///
    /// Negative size components are folded to their absolute value.
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            size: size.abs(),
        }
    }

    /// Create a bounding volume spanning two corners
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        let (lo, hi) = (min.inf(&max), min.sup(&max));
        Self {
            center: (lo + hi) * 0.5,
            size: hi - lo,
        }
    }

    /// Unit-size box centered on a point
    pub fn unit_at(center: Vec3) -> Self {
        Self::new(center, Vec3::new(1.0, 1.0, 1.0))
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.center - self.size * 0.5
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.center + self.size * 0.5
    }

    /// Largest side length
    pub fn max_extent(&self) -> f32 {
        self.size.x.max(self.size.y).max(self.size.z)
    }

    /// Grow this box so it also contains `other`
    #[must_use]
    pub fn encapsulate(&self, other: &Self) -> Self {
        Self::from_min_max(self.min().inf(&other.min()), self.max().sup(&other.max()))
    }

    /// Check whether `other` lies entirely inside this box
    ///
    /// A small tolerance absorbs the rounding introduced by the
    /// center/size representation.
    pub fn contains(&self, other: &Self) -> bool {
        const TOLERANCE: f32 = 1e-4;
        let (outer_min, outer_max) = (self.min(), self.max());
        let (inner_min, inner_max) = (other.min(), other.max());
        (0..3).all(|i| {
            inner_min[i] >= outer_min[i] - TOLERANCE && inner_max[i] <= outer_max[i] + TOLERANCE
        })
    }
}

/// Computes world-space bounds of object instances
pub struct BoundsCalculator;

impl BoundsCalculator {
    /// Union of the world bounds of every renderable part of `instance`
    ///
    /// An instance without renderable parts gets a unit box centered at its
    /// origin. This is a framing policy rather than an error, so it is only
    /// logged at info level.
    pub fn compute_bounds(instance: &SceneObject) -> BoundingVolume {
        let mut parts = instance.part_bounds().into_iter();
        match parts.next() {
            Some(first) => parts.fold(first, |acc, part| acc.encapsulate(&part)),
            None => {
                log::info!(
                    "'{}' has no renderable parts, framing a unit box at its origin",
                    instance.name()
                );
                BoundingVolume::unit_at(instance.origin())
            }
        }
    }
}
