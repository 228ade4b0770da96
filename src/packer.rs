//! Position-based 3D packing engine.
//!
//! Implements a single-pass greedy heuristic that tracks exact (x, y, z)
//! positions:
//! - candidate anchors are the origin plus the corner points of every
//!   placed item
//! - up to 6 axis-aligned orientations are tried per item
//! - feasible (point, orientation) pairs are ranked by a bottom-back-left
//!   score with a small bonus for wall contact
//! - the driver packs items first-fit across a growing list of containers
//!
//! The search is deterministic: candidate traversal order is fixed and
//! ties keep the first-found pair.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::geometry::{collides_with_any, touches_wall};
use crate::model::{Container, ContainerSpec, Item, ORIENTATION_COUNT, PlacedItem};
use crate::types::{BoundingBox, POINT_MERGE_TOLERANCE, Vec3, Weighted};

/// Configuration for the packing engine.
#[derive(Copy, Clone, Debug)]
pub struct PackingConfig {
    /// Whether all 6 orientations are tried; with `false` only the base
    /// orientation is considered
    pub allow_rotation: bool,
    /// Merge tolerance for candidate anchor points
    pub point_merge_tolerance: f64,
    /// Fixed score bonus for placements touching a container wall
    pub wall_bonus: f64,
}

impl PackingConfig {
    pub const DEFAULT_ALLOW_ROTATION: bool = true;
    pub const DEFAULT_POINT_MERGE_TOLERANCE: f64 = POINT_MERGE_TOLERANCE;
    pub const DEFAULT_WALL_BONUS: f64 = 1.0;

    /// Creates a builder for custom configuration.
    pub fn builder() -> PackingConfigBuilder {
        PackingConfigBuilder::default()
    }
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            allow_rotation: Self::DEFAULT_ALLOW_ROTATION,
            point_merge_tolerance: Self::DEFAULT_POINT_MERGE_TOLERANCE,
            wall_bonus: Self::DEFAULT_WALL_BONUS,
        }
    }
}

/// Builder for `PackingConfig`.
#[derive(Clone, Debug, Default)]
pub struct PackingConfigBuilder {
    config: PackingConfig,
}

impl PackingConfigBuilder {
    /// Sets whether item rotation is allowed.
    pub fn allow_rotation(mut self, allow: bool) -> Self {
        self.config.allow_rotation = allow;
        self
    }

    /// Sets the candidate point merge tolerance.
    ///
    /// # Panics
    /// Panics when `tolerance` is not positive and finite; candidate
    /// deduplication snaps points to a grid of this pitch.
    pub fn point_merge_tolerance(mut self, tolerance: f64) -> Self {
        assert!(
            tolerance > 0.0 && tolerance.is_finite(),
            "Point merge tolerance must be positive and finite, got: {}",
            tolerance
        );
        self.config.point_merge_tolerance = tolerance;
        self
    }

    /// Sets the wall-contact score bonus.
    pub fn wall_bonus(mut self, bonus: f64) -> Self {
        self.config.wall_bonus = bonus;
        self
    }

    /// Builds the final configuration.
    pub fn build(self) -> PackingConfig {
        self.config
    }
}

/// Result of a packing run.
#[derive(Clone, Debug)]
pub struct PackingResult {
    pub containers: Vec<Container>,
    pub unpacked: Vec<UnpackedItem>,
}

impl PackingResult {
    /// Indicates whether every item was packed.
    pub fn is_complete(&self) -> bool {
        self.unpacked.is_empty()
    }

    /// Returns the number of containers used.
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Returns the number of items that could not be packed.
    pub fn unpacked_count(&self) -> usize {
        self.unpacked.len()
    }

    /// Calculates the average volume utilization over all containers.
    pub fn average_utilization(&self) -> f64 {
        if self.containers.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .containers
            .iter()
            .map(|c| c.utilization_percent())
            .sum();
        sum / self.containers.len() as f64
    }

}

/// An item that could not be placed anywhere.
#[derive(Clone, Debug)]
pub struct UnpackedItem {
    pub item: Item,
    pub reason: UnpackedReason,
}

/// Reasons why an item could not be placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnpackedReason {
    TooHeavyForContainer,
    TooLargeForContainer,
    NoFeasiblePosition,
}

impl UnpackedReason {
    pub fn code(&self) -> &'static str {
        match self {
            UnpackedReason::TooHeavyForContainer => "too_heavy_for_container",
            UnpackedReason::TooLargeForContainer => "too_large_for_container",
            UnpackedReason::NoFeasiblePosition => "no_feasible_position",
        }
    }
}

impl std::fmt::Display for UnpackedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnpackedReason::TooHeavyForContainer => {
                write!(f, "Item exceeds the container weight capacity")
            }
            UnpackedReason::TooLargeForContainer => {
                write!(
                    f,
                    "Item does not fit the container dimensions in any allowed orientation"
                )
            }
            UnpackedReason::NoFeasiblePosition => {
                write!(f, "No feasible position found in any container")
            }
        }
    }
}

/// Events emitted during packing, suitable for live visualization.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type")]
pub enum PackEvent {
    /// A new container has been opened.
    ContainerOpened {
        id: usize,
        dims: (f64, f64, f64),
        max_weight: Option<f64>,
    },
    /// An item has been placed.
    ItemPlaced {
        container_id: usize,
        id: usize,
        pos: (f64, f64, f64),
        dims: (f64, f64, f64),
        orientation: usize,
        weight: f64,
        total_weight: f64,
    },
    /// An item could not be placed.
    ItemRejected {
        id: usize,
        dims: (f64, f64, f64),
        weight: f64,
        reason_code: String,
        reason_text: String,
    },
    /// Packing finished.
    Finished { containers: usize, unpacked: usize },
}

/// A chosen placement: anchor position plus orientation.
#[derive(Clone, Copy, Debug)]
pub struct Placement {
    pub position: Vec3,
    pub dims: Vec3,
    pub orientation: usize,
}

/// Collects the candidate anchor points of a container.
///
/// The set is the origin plus the eight corner points of every placed
/// item, traversed in placement order with the canonical corner order.
/// Near-duplicate points (within `tolerance` on all axes) are merged;
/// the first-encountered point wins, which keeps downstream tie-breaking
/// stable. The set is recomputed from scratch for every search since it
/// is a pure function of the current ledger.
pub fn candidate_points(container: &Container, tolerance: f64) -> Vec<Vec3> {
    let mut seen: HashSet<(i64, i64, i64)> = HashSet::new();
    let mut points: Vec<Vec3> = Vec::with_capacity(1 + container.placed.len() * 8);

    seen.insert(Vec3::zero().grid_key(tolerance));
    points.push(Vec3::zero());

    for placed in &container.placed {
        for corner in placed.bounding_box().corners() {
            if seen.insert(corner.grid_key(tolerance)) {
                points.push(corner);
            }
        }
    }

    points
}

/// Checks whether a box with `dims` can sit at `position` in the container.
///
/// The box must stay within the container bounds (touching a wall is
/// allowed) and must not overlap any placed item. Weight is not checked
/// here; the driver checks it once per item, not per position.
pub fn can_place(container: &Container, position: Vec3, dims: Vec3) -> bool {
    let (cl, cw, ch) = container.dims;
    if position.x + dims.x > cl || position.y + dims.y > cw || position.z + dims.z > ch {
        return false;
    }

    let candidate = BoundingBox::from_position_and_dims(position, dims);
    !collides_with_any(&candidate, &container.placed)
}

/// Scores a feasible placement; lower is better.
///
/// The linear combination `z * (L * W) + y * L + x` orders candidates
/// lexicographically by (z, y, x): the z coefficient is the container
/// base area and the y coefficient the container length, so a lower
/// layer always beats any (y, x) combination within a layer. Wall
/// contact earns a fixed bonus, applied after the weighted sum.
fn placement_score(
    container: &Container,
    position: Vec3,
    dims: Vec3,
    config: &PackingConfig,
) -> f64 {
    let (cl, cw, _) = container.dims;
    let mut score = position.z * (cl * cw) + position.y * cl + position.x;

    if touches_wall(position, dims, Vec3::from_tuple(container.dims)) {
        score -= config.wall_bonus;
    }

    score
}

/// Finds the best feasible placement for an item in a container.
///
/// Rejects the container outright when the remaining weight capacity is
/// insufficient. Otherwise evaluates every (orientation, candidate point)
/// pair, orientation index ascending and candidate points in generation
/// order, and keeps the pair with the strictly lowest score. Ties keep
/// the first-found pair.
///
/// # Returns
/// `Some(Placement)` when a feasible position exists, otherwise `None`
pub fn find_best_placement(
    container: &Container,
    item: &Item,
    config: &PackingConfig,
) -> Option<Placement> {
    if item.weight() > container.remaining_weight() {
        return None;
    }

    let points = candidate_points(container, config.point_merge_tolerance);
    let orientations = if config.allow_rotation {
        ORIENTATION_COUNT
    } else {
        1
    };

    let mut best: Option<(Placement, f64)> = None;

    for orientation in 0..orientations {
        let dims = Vec3::from_tuple(item.orientation_dims(orientation));
        for &point in &points {
            if !can_place(container, point, dims) {
                continue;
            }

            let score = placement_score(container, point, dims, config);
            let better = match best {
                None => true,
                Some((_, best_score)) => score < best_score,
            };
            if better {
                best = Some((
                    Placement {
                        position: point,
                        dims,
                        orientation,
                    },
                    score,
                ));
            }
        }
    }

    best.map(|(placement, _)| placement)
}

/// Packs items into containers of the given type with default settings.
///
/// # Parameters
/// * `items` - Items to pack
/// * `spec` - Container type; new containers are opened on demand
///
/// # Returns
/// `PackingResult` with the used containers and any unpacked items
pub fn pack_items(items: Vec<Item>, spec: ContainerSpec) -> PackingResult {
    pack_items_with_config(items, spec, PackingConfig::default())
}

/// Packs items with a custom configuration.
pub fn pack_items_with_config(
    items: Vec<Item>,
    spec: ContainerSpec,
    config: PackingConfig,
) -> PackingResult {
    pack_items_with_progress(items, spec, config, |_| {})
}

/// Packs items and reports progress through a callback.
///
/// Calls the callback for every opened container, placement, rejection
/// and at completion (suitable for SSE streaming). Items are processed in
/// descending volume order (stable on ties), each placed into the first
/// existing container with a feasible position, else into a freshly
/// opened one. Containers only gain items; placements are never undone.
pub fn pack_items_with_progress(
    items: Vec<Item>,
    spec: ContainerSpec,
    config: PackingConfig,
    mut on_event: impl FnMut(&PackEvent),
) -> PackingResult {
    let mut items = items;
    items.sort_by(|a, b| {
        b.volume()
            .partial_cmp(&a.volume())
            .unwrap_or(Ordering::Equal)
    });

    let max_weight_out = spec.max_weight.is_finite().then_some(spec.max_weight);

    let mut containers: Vec<Container> = Vec::new();
    let mut unpacked: Vec<UnpackedItem> = Vec::new();

    for item in items {
        // Items that cannot fit an empty container are rejected up front,
        // before any position search.
        if !spec.admits(&item, config.allow_rotation) {
            let reason = if item.weight > spec.max_weight {
                UnpackedReason::TooHeavyForContainer
            } else {
                UnpackedReason::TooLargeForContainer
            };
            on_event(&PackEvent::ItemRejected {
                id: item.id,
                dims: item.dims,
                weight: item.weight,
                reason_code: reason.code().to_string(),
                reason_text: reason.to_string(),
            });
            unpacked.push(UnpackedItem { item, reason });
            continue;
        }

        let mut target: Option<(usize, Placement)> = None;
        for (idx, container) in containers.iter().enumerate() {
            if let Some(placement) = find_best_placement(container, &item, &config) {
                target = Some((idx, placement));
                break;
            }
        }

        if target.is_none() {
            let container = spec.open();
            match find_best_placement(&container, &item, &config) {
                Some(placement) => {
                    containers.push(container);
                    let id = containers.len();
                    on_event(&PackEvent::ContainerOpened {
                        id,
                        dims: spec.dims,
                        max_weight: max_weight_out,
                    });
                    target = Some((id - 1, placement));
                }
                None => {
                    // Unreachable given the pre-filter, kept as the data-only
                    // failure path rather than a panic.
                    let reason = UnpackedReason::NoFeasiblePosition;
                    on_event(&PackEvent::ItemRejected {
                        id: item.id,
                        dims: item.dims,
                        weight: item.weight,
                        reason_code: reason.code().to_string(),
                        reason_text: reason.to_string(),
                    });
                    unpacked.push(UnpackedItem { item, reason });
                    continue;
                }
            }
        }

        let (idx, placement) = target.expect("placement target must be set");
        let container = &mut containers[idx];
        container
            .placed
            .push(PlacedItem::new(item, placement.position.as_tuple(), placement.orientation));

        let placed = container.placed.last().expect("missing newly placed item");
        on_event(&PackEvent::ItemPlaced {
            container_id: idx + 1,
            id: placed.item.id,
            pos: placed.position,
            dims: placed.dims,
            orientation: placed.orientation,
            weight: placed.item.weight,
            total_weight: container.used_weight(),
        });
    }

    on_event(&PackEvent::Finished {
        containers: containers.len(),
        unpacked: unpacked.len(),
    });
    PackingResult {
        containers,
        unpacked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: usize, dims: (f64, f64, f64), weight: f64) -> Item {
        Item::new(id, None, dims, weight).unwrap()
    }

    fn spec(dims: (f64, f64, f64), max_weight: Option<f64>) -> ContainerSpec {
        ContainerSpec::new(dims, max_weight).unwrap()
    }

    /// Asserts the geometric invariants for every container: placements
    /// stay within bounds, pairwise AABBs do not overlap, and the weight
    /// capacity holds.
    fn assert_invariants(result: &PackingResult) {
        for container in &result.containers {
            let (cl, cw, ch) = container.dims;
            for p in &container.placed {
                let (x, y, z) = p.position;
                let (l, w, h) = p.dims;
                assert!(x >= 0.0 && y >= 0.0 && z >= 0.0, "anchor outside container");
                assert!(
                    x + l <= cl + 1e-9 && y + w <= cw + 1e-9 && z + h <= ch + 1e-9,
                    "item {} sticks out of the container",
                    p.item.id
                );
            }
            for (i, a) in container.placed.iter().enumerate() {
                for b in container.placed.iter().skip(i + 1) {
                    assert!(
                        !a.bounding_box().intersects(&b.bounding_box()),
                        "items {} and {} overlap",
                        a.item.id,
                        b.item.id
                    );
                }
            }
            assert!(container.used_weight() <= container.max_weight + 1e-9);
        }
    }

    /// Asserts that every input id ends up exactly once, packed or unpacked.
    fn assert_conservation(result: &PackingResult, mut expected_ids: Vec<usize>) {
        let mut seen: Vec<usize> = result
            .containers
            .iter()
            .flat_map(|c| c.placed.iter().map(|p| p.item.id))
            .chain(result.unpacked.iter().map(|u| u.item.id))
            .collect();
        seen.sort_unstable();
        expected_ids.sort_unstable();
        assert_eq!(seen, expected_ids);
    }

    #[test]
    fn single_item_lands_at_origin_in_base_orientation() {
        // Scenario: one 30x20x10 item in a 40^3 container.
        let result = pack_items(
            vec![item(1, (30.0, 20.0, 10.0), 5.0)],
            spec((40.0, 40.0, 40.0), None),
        );

        assert!(result.is_complete());
        assert_eq!(result.container_count(), 1);

        let placed = &result.containers[0].placed[0];
        assert_eq!(placed.position, (0.0, 0.0, 0.0));
        assert_eq!(placed.orientation, 0);
        assert_eq!(placed.dims, (30.0, 20.0, 10.0));
        assert!((result.containers[0].utilization_percent() - 9.375).abs() < 1e-9);
    }

    #[test]
    fn full_footprint_items_stack() {
        // Two 50^3 cubes into a 50x50x100 container: the second stacks at z=50.
        let items = vec![
            item(1, (50.0, 50.0, 50.0), 1.0),
            item(2, (50.0, 50.0, 50.0), 1.0),
        ];
        let result = pack_items(items, spec((50.0, 50.0, 100.0), None));

        assert!(result.is_complete());
        assert_eq!(result.container_count(), 1);
        let placed = &result.containers[0].placed;
        assert_eq!(placed[0].position, (0.0, 0.0, 0.0));
        assert_eq!(placed[1].position, (0.0, 0.0, 50.0));
        assert_invariants(&result);
    }

    #[test]
    fn oversized_item_is_rejected_without_container() {
        let result = pack_items(
            vec![item(1, (100.0, 100.0, 100.0), 1.0)],
            spec((50.0, 50.0, 50.0), None),
        );

        assert!(result.containers.is_empty());
        assert_eq!(result.unpacked.len(), 1);
        assert_eq!(result.unpacked[0].reason, UnpackedReason::TooLargeForContainer);
    }

    #[test]
    fn overweight_item_is_rejected_despite_fitting_spatially() {
        let result = pack_items(
            vec![item(1, (10.0, 10.0, 10.0), 60.0)],
            spec((50.0, 50.0, 50.0), Some(50.0)),
        );

        assert!(result.containers.is_empty());
        assert_eq!(result.unpacked.len(), 1);
        assert_eq!(result.unpacked[0].reason, UnpackedReason::TooHeavyForContainer);
    }

    #[test]
    fn grid_of_cubes_overflows_into_second_container() {
        // Ten 10^3 cubes into 20^3 containers: the first holds a 2x2x2 grid
        // of eight, the remaining two open a second container.
        let items = (1..=10).map(|id| item(id, (10.0, 10.0, 10.0), 1.0)).collect();
        let result = pack_items(items, spec((20.0, 20.0, 20.0), None));

        assert!(result.is_complete());
        assert_eq!(result.container_count(), 2);
        assert_eq!(result.containers[0].placed.len(), 8);
        assert_eq!(result.containers[1].placed.len(), 2);
        assert!((result.containers[0].utilization_percent() - 100.0).abs() < 1e-9);
        assert_invariants(&result);
        assert_conservation(&result, (1..=10).collect());
    }

    #[test]
    fn rotation_enables_fit_when_base_orientation_does_not() {
        let result = pack_items(
            vec![item(1, (50.0, 10.0, 10.0), 1.0)],
            spec((10.0, 10.0, 50.0), None),
        );

        assert!(result.is_complete());
        let placed = &result.containers[0].placed[0];
        assert_eq!(placed.dims, (10.0, 10.0, 50.0));
        assert_ne!(placed.orientation, 0);
    }

    #[test]
    fn disabled_rotation_keeps_base_orientation_only() {
        let config = PackingConfig::builder().allow_rotation(false).build();
        let result = pack_items_with_config(
            vec![item(1, (50.0, 10.0, 10.0), 1.0)],
            spec((10.0, 10.0, 50.0), None),
            config,
        );

        assert!(result.containers.is_empty());
        assert_eq!(result.unpacked.len(), 1);
        assert_eq!(result.unpacked[0].reason, UnpackedReason::TooLargeForContainer);
    }

    #[test]
    fn cube_ties_resolve_to_first_orientation() {
        // All 6 orientations of a cube are identical; the first-found
        // (index 0) must win.
        let result = pack_items(
            vec![item(1, (10.0, 10.0, 10.0), 1.0)],
            spec((20.0, 20.0, 20.0), None),
        );
        assert_eq!(result.containers[0].placed[0].orientation, 0);
    }

    #[test]
    fn placements_prefer_lower_layers_then_back_then_left() {
        // Four half-footprint boxes tile the floor before anything stacks.
        let items = (1..=4).map(|id| item(id, (10.0, 10.0, 5.0), 1.0)).collect();
        let result = pack_items(items, spec((20.0, 20.0, 20.0), None));

        assert_eq!(result.container_count(), 1);
        let mut anchors: Vec<_> = result.containers[0]
            .placed
            .iter()
            .map(|p| p.position)
            .collect();
        anchors.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(
            anchors,
            vec![
                (0.0, 0.0, 0.0),
                (0.0, 10.0, 0.0),
                (10.0, 0.0, 0.0),
                (10.0, 10.0, 0.0),
            ]
        );
    }

    #[test]
    fn weight_capacity_opens_additional_containers() {
        let items = vec![
            item(1, (10.0, 10.0, 10.0), 300.0),
            item(2, (10.0, 10.0, 10.0), 300.0),
            item(3, (10.0, 10.0, 10.0), 300.0),
        ];
        let result = pack_items(items, spec((20.0, 20.0, 20.0), Some(400.0)));

        assert_eq!(result.container_count(), 3);
        assert!(result.is_complete());
        for container in &result.containers {
            assert_eq!(container.placed.len(), 1);
        }
        assert_invariants(&result);
    }

    #[test]
    fn wall_bonus_can_outweigh_a_lower_layer() {
        // A floor slab plus two risers leave exactly one feasible anchor
        // on the z=1 layer, at the interior point (4, 4, 1); the riser
        // tops offer wall-touching anchors at z=3.
        let spec = spec((10.0, 10.0, 10.0), None);
        let mut container = spec.open();
        container
            .placed
            .push(PlacedItem::new(item(1, (10.0, 10.0, 1.0), 1.0), (0.0, 0.0, 0.0), 0));
        container
            .placed
            .push(PlacedItem::new(item(2, (4.0, 10.0, 2.0), 1.0), (0.0, 0.0, 1.0), 0));
        container
            .placed
            .push(PlacedItem::new(item(3, (6.0, 4.0, 2.0), 1.0), (4.0, 0.0, 1.0), 0));

        let cube = item(4, (2.0, 2.0, 2.0), 1.0);

        // Default bonus: the lower interior anchor wins (144 vs 299).
        let low = find_best_placement(&container, &cube, &PackingConfig::default())
            .expect("cube must fit");
        assert_eq!(low.position.as_tuple(), (4.0, 4.0, 1.0));

        // A bonus larger than the layer gap flips the choice to the
        // wall-touching anchor on the higher layer.
        let config = PackingConfig::builder().wall_bonus(200.0).build();
        let high = find_best_placement(&container, &cube, &config).expect("cube must fit");
        assert_eq!(high.position.as_tuple(), (0.0, 0.0, 3.0));
    }

    #[test]
    #[should_panic(expected = "Point merge tolerance must be positive")]
    fn builder_rejects_non_positive_tolerance() {
        let _ = PackingConfig::builder().point_merge_tolerance(0.0);
    }

    #[test]
    fn candidate_points_start_at_origin_and_dedupe_corners() {
        let spec = spec((20.0, 20.0, 20.0), None);
        let mut container = spec.open();
        container.placed.push(PlacedItem::new(
            item(1, (10.0, 10.0, 10.0), 1.0),
            (0.0, 0.0, 0.0),
            0,
        ));

        let points = candidate_points(&container, POINT_MERGE_TOLERANCE);
        // Origin plus 8 corners, with the min corner merging into the origin.
        assert_eq!(points.len(), 8);
        assert_eq!(points[0], Vec3::zero());
    }

    #[test]
    fn results_are_deterministic() {
        let items: Vec<Item> = vec![
            item(1, (30.0, 20.0, 10.0), 5.0),
            item(2, (40.0, 30.0, 20.0), 10.0),
            item(3, (25.0, 25.0, 15.0), 7.0),
            item(4, (50.0, 40.0, 30.0), 15.0),
            item(5, (20.0, 15.0, 10.0), 3.0),
            item(6, (35.0, 25.0, 20.0), 8.0),
            item(7, (45.0, 35.0, 25.0), 12.0),
            item(8, (15.0, 15.0, 15.0), 4.0),
        ];

        let a = pack_items(items.clone(), spec((100.0, 80.0, 60.0), Some(100.0)));
        let b = pack_items(items, spec((100.0, 80.0, 60.0), Some(100.0)));

        assert_eq!(a.container_count(), b.container_count());
        for (ca, cb) in a.containers.iter().zip(&b.containers) {
            assert_eq!(ca.placed.len(), cb.placed.len());
            for (pa, pb) in ca.placed.iter().zip(&cb.placed) {
                assert_eq!(pa.item.id, pb.item.id);
                assert_eq!(pa.position, pb.position);
                assert_eq!(pa.orientation, pb.orientation);
            }
        }
        assert_invariants(&a);
        assert_conservation(&a, (1..=8).collect());
    }

    #[test]
    fn mixed_load_respects_all_invariants() {
        let items: Vec<Item> = vec![
            item(1, (50.0, 40.0, 30.0), 20.0),
            item(2, (30.0, 30.0, 30.0), 12.0),
            item(3, (40.0, 30.0, 20.0), 10.0),
            item(4, (25.0, 25.0, 25.0), 8.0),
            item(5, (60.0, 40.0, 20.0), 15.0),
            item(6, (35.0, 35.0, 35.0), 14.0),
            item(7, (45.0, 30.0, 25.0), 11.0),
            item(8, (20.0, 20.0, 40.0), 6.0),
            item(9, (55.0, 35.0, 30.0), 16.0),
            item(10, (30.0, 25.0, 20.0), 7.0),
        ];

        let result = pack_items(items, spec((100.0, 100.0, 100.0), Some(60.0)));
        assert_invariants(&result);
        assert_conservation(&result, (1..=10).collect());

        // Every effective dimension triple is a permutation of the base one.
        for container in &result.containers {
            for p in &container.placed {
                let mut base = [p.item.dims.0, p.item.dims.1, p.item.dims.2];
                let mut eff = [p.dims.0, p.dims.1, p.dims.2];
                base.sort_by(|a, b| a.partial_cmp(b).unwrap());
                eff.sort_by(|a, b| a.partial_cmp(b).unwrap());
                assert_eq!(base, eff);
            }
        }
    }

    #[test]
    fn progress_events_follow_the_run() {
        let items = vec![
            item(1, (10.0, 10.0, 10.0), 1.0),
            item(2, (100.0, 100.0, 100.0), 1.0),
        ];
        let mut events = Vec::new();
        let result = pack_items_with_progress(
            items,
            spec((20.0, 20.0, 20.0), None),
            PackingConfig::default(),
            |evt| events.push(evt.clone()),
        );

        assert_eq!(result.container_count(), 1);
        assert_eq!(result.unpacked_count(), 1);

        assert!(matches!(events[0], PackEvent::ItemRejected { id: 2, .. }));
        assert!(matches!(events[1], PackEvent::ContainerOpened { id: 1, .. }));
        assert!(matches!(
            events[2],
            PackEvent::ItemPlaced {
                container_id: 1,
                id: 1,
                ..
            }
        ));
        assert!(matches!(
            events[3],
            PackEvent::Finished {
                containers: 1,
                unpacked: 1
            }
        ));
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let mut events = Vec::new();
        let result = pack_items_with_progress(
            Vec::new(),
            spec((20.0, 20.0, 20.0), None),
            PackingConfig::default(),
            |evt| events.push(evt.clone()),
        );

        assert!(result.containers.is_empty());
        assert!(result.unpacked.is_empty());
        assert!(matches!(
            events.as_slice(),
            [PackEvent::Finished {
                containers: 0,
                unpacked: 0
            }]
        ));
    }
}
