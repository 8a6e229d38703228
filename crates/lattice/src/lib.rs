//! # Lattice
//!
//! Uniform-cell spatial hash index for broad-phase proximity queries.
//!
//! Lattice buckets entities into fixed-size cubic cells keyed by an integer
//! triple, trading the adaptivity of a tree for O(1) updates and a bounded
//! cell scan per query. This makes it a good fit for swarms of short-lived,
//! fast-moving entities (projectiles, units) where membership churns every
//! tick:
//!
//! - **O(1) insert/update/remove**: a position maps straight to its cell key
//! - **Cheap re-indexing**: moving within a cell touches nothing
//! - **Bounded queries**: a radius query scans `ceil(r / cell_size)` cells
//!   per axis, never the whole population
//! - **Deterministic results**: query output is sorted by id, independent of
//!   insertion or update history
//!
//! ## Quick Start
//!
//! ```
//! use glam::Vec3;
//! use lattice::SpatialHashGrid;
//!
//! let mut grid: SpatialHashGrid<u64> = SpatialHashGrid::new(32.0);
//! grid.insert(1, Vec3::new(10.0, 0.0, 0.0));
//! grid.insert(2, Vec3::new(200.0, 0.0, 0.0));
//!
//! // Exact radius query: cell scan first, then distance filter.
//! let near = grid.query_radius(Vec3::ZERO, 50.0);
//! assert_eq!(near, vec![1]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod grid;

// Re-exports for convenience
pub use grid::{CellKey, GridStats, SpatialHashGrid};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: glam::Vec3,
    /// Maximum corner
    pub max: glam::Vec3,
}

impl Bounds {
    /// Create bounds from dimensions (centered at origin).
    #[must_use]
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            min: glam::Vec3::new(-width / 2.0, -height / 2.0, -depth / 2.0),
            max: glam::Vec3::new(width / 2.0, height / 2.0, depth / 2.0),
        }
    }

    /// Create bounds from min/max corners.
    #[must_use]
    pub fn from_min_max(min: glam::Vec3, max: glam::Vec3) -> Self {
        Self { min, max }
    }

    /// Create bounds covering a sphere.
    #[must_use]
    pub fn around_sphere(center: glam::Vec3, radius: f32) -> Self {
        Self {
            min: center - glam::Vec3::splat(radius),
            max: center + glam::Vec3::splat(radius),
        }
    }

    /// Get the center of the bounds.
    #[must_use]
    pub fn center(&self) -> glam::Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the bounds.
    #[must_use]
    pub fn size(&self) -> glam::Vec3 {
        self.max - self.min
    }

    /// Check if a point is inside the bounds.
    #[must_use]
    pub fn contains(&self, point: glam::Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this bounds overlaps another.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Check if this bounds intersects a sphere.
    #[must_use]
    pub fn intersects_sphere(&self, center: glam::Vec3, radius: f32) -> bool {
        let closest = glam::Vec3::new(
            center.x.clamp(self.min.x, self.max.x),
            center.y.clamp(self.min.y, self.max.y),
            center.z.clamp(self.min.z, self.max.z),
        );
        center.distance_squared(closest) <= radius * radius
    }

    /// Grow the bounds by a margin on every axis.
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: self.min - glam::Vec3::splat(margin),
            max: self.max + glam::Vec3::splat(margin),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(100.0, 100.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new(10.0, 10.0, 10.0);
        assert!(bounds.contains(glam::Vec3::ZERO));
        assert!(bounds.contains(glam::Vec3::new(4.0, 4.0, 4.0)));
        assert!(!bounds.contains(glam::Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_bounds_intersects() {
        let a = Bounds::new(10.0, 10.0, 10.0);
        let b = Bounds::from_min_max(glam::Vec3::new(4.0, 4.0, 4.0), glam::Vec3::splat(20.0));
        let c = Bounds::from_min_max(glam::Vec3::splat(6.0), glam::Vec3::splat(20.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_bounds_sphere() {
        let bounds = Bounds::new(10.0, 10.0, 10.0);
        // Sphere centered outside, surface reaching the face.
        assert!(bounds.intersects_sphere(glam::Vec3::new(8.0, 0.0, 0.0), 3.1));
        assert!(!bounds.intersects_sphere(glam::Vec3::new(8.0, 0.0, 0.0), 2.9));
    }

    #[test]
    fn test_bounds_around_sphere() {
        let bounds = Bounds::around_sphere(glam::Vec3::new(100.0, 100.0, 50.0), 25.0);
        assert_eq!(bounds.min, glam::Vec3::new(75.0, 75.0, 25.0));
        assert_eq!(bounds.max, glam::Vec3::new(125.0, 125.0, 75.0));
    }

    #[test]
    fn test_bounds_expanded() {
        let bounds = Bounds::new(10.0, 10.0, 10.0).expanded(2.0);
        assert_eq!(bounds.min, glam::Vec3::splat(-7.0));
        assert_eq!(bounds.max, glam::Vec3::splat(7.0));
    }
}
