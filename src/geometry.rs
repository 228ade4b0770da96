//! Geometric helpers for 3D collision detection and placement checks.
//!
//! This module provides the overlap test between placed items and the
//! wall-contact test used by the position scorer.

use crate::model::PlacedItem;
use crate::types::{BoundingBox, Vec3};

/// Checks whether a box overlaps any of the placed items.
///
/// Uses Axis-Aligned Bounding Box (AABB) collision detection. Overlap
/// requires strict intersection on all three axes; shared faces, edges or
/// corners are not a collision.
///
/// # Parameters
/// * `candidate` - Bounding box of the box to test
/// * `placed` - Already placed items, in placement order
///
/// # Returns
/// `true` if the box overlaps at least one placed item
pub fn collides_with_any(candidate: &BoundingBox, placed: &[PlacedItem]) -> bool {
    placed.iter().any(|p| candidate.intersects(&p.bounding_box()))
}

/// Checks whether a box at `position` with `dims` touches a container wall.
///
/// A box touches a wall when it sits exactly on one of the six container
/// faces. The comparisons are exact: candidate anchors come from corners
/// of placed boxes, so a wall contact produced by earlier arithmetic
/// reproduces the same coordinate bit for bit.
///
/// # Parameters
/// * `position` - Anchor position (minimum corner) of the box
/// * `dims` - Effective dimensions of the box
/// * `container_dims` - Container dimensions (length, width, height)
pub fn touches_wall(position: Vec3, dims: Vec3, container_dims: Vec3) -> bool {
    position.x == 0.0
        || position.x + dims.x == container_dims.x
        || position.y == 0.0
        || position.y + dims.y == container_dims.y
        || position.z == 0.0
        || position.z + dims.z == container_dims.z
}
