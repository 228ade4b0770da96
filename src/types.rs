//! Common types and traits for 3D geometry.
//!
//! This module defines the reusable vocabulary of the packing engine:
//! points, axis-aligned bounding boxes and the trait abstractions shared
//! by items and containers.

use std::ops::Add;

/// Merge tolerance for candidate anchor points, in container units.
///
/// Corner points closer than this on all three axes are treated as one
/// point. Deduplication is done by snapping to a grid of this pitch, so
/// the point set keeps true set semantics.
pub const POINT_MERGE_TOLERANCE: f64 = 1e-3;

/// Represents a 3D vector or point in space.
///
/// Used for positions, dimensions, and calculations in 3D space.
///
/// # Examples
/// ```
/// use packpoint::types::Vec3;
///
/// let position = Vec3::new(1.0, 2.0, 3.0);
/// let dimensions = Vec3::new(10.0, 20.0, 30.0);
/// let far_corner = position + dimensions;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Creates a new 3D vector.
    ///
    /// # Parameters
    /// * `x` - X component (length)
    /// * `y` - Y component (width)
    /// * `z` - Z component (height)
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a zero vector (origin).
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Converts to tuple format for API compatibility.
    #[inline]
    pub const fn as_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }

    /// Creates from tuple format.
    #[inline]
    pub const fn from_tuple(tuple: (f64, f64, f64)) -> Self {
        Self::new(tuple.0, tuple.1, tuple.2)
    }

    /// Calculates the volume (product of all components).
    ///
    /// Useful for dimension vectors.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }

    /// Checks if the vector fits within another vector (component-wise <=).
    ///
    /// # Parameters
    /// * `container` - The outer vector (e.g., container dimensions)
    #[inline]
    pub fn fits_within(&self, container: &Self) -> bool {
        self.x <= container.x && self.y <= container.y && self.z <= container.z
    }

    /// Snaps the point to the merge-tolerance grid.
    ///
    /// Two points that quantize to the same key are considered the same
    /// candidate anchor. Quantization keeps deduplication O(1) per point
    /// instead of pairwise tolerance comparisons.
    #[inline]
    pub fn grid_key(&self, tolerance: f64) -> (i64, i64, i64) {
        (
            (self.x / tolerance).round() as i64,
            (self.y / tolerance).round() as i64,
            (self.z / tolerance).round() as i64,
        )
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl From<(f64, f64, f64)> for Vec3 {
    #[inline]
    fn from(tuple: (f64, f64, f64)) -> Self {
        Self::from_tuple(tuple)
    }
}

impl From<Vec3> for (f64, f64, f64) {
    #[inline]
    fn from(vec: Vec3) -> Self {
        vec.as_tuple()
    }
}

/// Trait for objects with 3D dimensions.
///
/// Provides a common interface for all objects with spatial extent.
pub trait Dimensional {
    /// Returns the dimensions of the object.
    fn dimensions(&self) -> Vec3;

    /// Calculates the volume.
    fn volume(&self) -> f64 {
        self.dimensions().volume()
    }
}

/// Trait for objects with weight.
pub trait Weighted {
    /// Returns the weight in kg.
    fn weight(&self) -> f64;
}

/// Represents an Axis-Aligned Bounding Box (AABB).
///
/// Used for collision detection and corner-point enumeration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner (position)
    pub min: Vec3,
    /// Maximum corner (position + dimensions)
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates a bounding box from position and dimensions.
    #[inline]
    pub fn from_position_and_dims(position: Vec3, dims: Vec3) -> Self {
        Self {
            min: position,
            max: position + dims,
        }
    }

    /// Checks if two bounding boxes overlap.
    ///
    /// Overlap requires strict interval intersection on all three axes:
    /// boxes that merely touch (equality on one bound) do not overlap.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Returns the eight corners in canonical order.
    ///
    /// The order is fixed: min corner, then max on exactly one axis
    /// (x, y, z), then max on two axes (xy, xz, yz), then the max corner.
    /// Downstream tie-breaking relies on this order being stable.
    #[inline]
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_add() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
    }

    #[test]
    fn test_vec3_volume() {
        let dims = Vec3::new(10.0, 20.0, 30.0);
        assert!((dims.volume() - 6000.0).abs() < 1e-9);
    }

    #[test]
    fn test_vec3_fits_within_allows_equality() {
        let small = Vec3::new(5.0, 5.0, 5.0);
        let large = Vec3::new(10.0, 10.0, 10.0);

        assert!(small.fits_within(&large));
        assert!(!large.fits_within(&small));
        assert!(large.fits_within(&large));
    }

    #[test]
    fn test_vec3_grid_key_merges_near_points() {
        let a = Vec3::new(10.0, 0.0, 0.0);
        let b = Vec3::new(10.0 + 2e-4, 0.0, 0.0);
        let c = Vec3::new(10.01, 0.0, 0.0);

        assert_eq!(
            a.grid_key(POINT_MERGE_TOLERANCE),
            b.grid_key(POINT_MERGE_TOLERANCE)
        );
        assert_ne!(
            a.grid_key(POINT_MERGE_TOLERANCE),
            c.grid_key(POINT_MERGE_TOLERANCE)
        );
    }

    #[test]
    fn test_bounding_box_intersects() {
        let a = BoundingBox::from_position_and_dims(Vec3::zero(), Vec3::new(10.0, 10.0, 10.0));
        let b = BoundingBox::from_position_and_dims(
            Vec3::new(5.0, 5.0, 5.0),
            Vec3::new(10.0, 10.0, 10.0),
        );
        let c = BoundingBox::from_position_and_dims(
            Vec3::new(20.0, 20.0, 20.0),
            Vec3::new(10.0, 10.0, 10.0),
        );

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_bounding_box_touching_is_not_overlap() {
        let a = BoundingBox::from_position_and_dims(Vec3::zero(), Vec3::new(10.0, 10.0, 10.0));
        // Shares the full x=10 face with a.
        let face = BoundingBox::from_position_and_dims(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 10.0),
        );
        // Shares only the corner (10, 10, 10).
        let corner = BoundingBox::from_position_and_dims(
            Vec3::new(10.0, 10.0, 10.0),
            Vec3::new(5.0, 5.0, 5.0),
        );

        assert!(!a.intersects(&face));
        assert!(!a.intersects(&corner));
    }

    #[test]
    fn test_bounding_box_corner_order_is_canonical() {
        let bb = BoundingBox::from_position_and_dims(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(10.0, 20.0, 30.0),
        );
        let corners = bb.corners();

        assert_eq!(corners[0], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(corners[1], Vec3::new(11.0, 2.0, 3.0));
        assert_eq!(corners[2], Vec3::new(1.0, 22.0, 3.0));
        assert_eq!(corners[3], Vec3::new(1.0, 2.0, 33.0));
        assert_eq!(corners[7], Vec3::new(11.0, 22.0, 33.0));
    }
}
