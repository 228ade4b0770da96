//! Data models for 3D container packing.
//!
//! This module defines the fundamental data structures of the engine:
//! - `Item`: a cuboid to be packed, with dimensions and weight
//! - `PlacedItem`: an item with its anchor position and chosen orientation
//! - `ContainerSpec`: the container type new containers are opened from
//! - `Container`: a container instance with its placement ledger
//!
//! Items are immutable once created; placement state lives exclusively on
//! `PlacedItem`, never on the item itself.

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToSchema;

use crate::types::{BoundingBox, Dimensional, Vec3, Weighted};

/// Number of distinct axis-aligned orientations of a cuboid.
pub const ORIENTATION_COUNT: usize = 6;

/// Validation error for input data.
#[derive(Debug, Clone)]
pub enum ValidationError {
    InvalidDimension(String),
    InvalidWeight(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidDimension(msg) => write!(f, "Invalid dimension: {}", msg),
            ValidationError::InvalidWeight(msg) => write!(f, "Invalid weight: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Helper function to validate a single dimension.
fn validate_dimension(value: f64, name: &str) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidDimension(format!(
            "{} must be positive and finite, got: {}",
            name, value
        )));
    }
    Ok(())
}

/// Helper function to validate an item weight (zero is allowed).
fn validate_item_weight(value: f64) -> Result<(), ValidationError> {
    if value < 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidWeight(format!(
            "Weight must be non-negative and finite, got: {}",
            value
        )));
    }
    Ok(())
}

/// Validates all three dimensions of a cuboid.
fn validate_dims(dims: (f64, f64, f64), what: &str) -> Result<(), ValidationError> {
    validate_dimension(dims.0, &format!("{} length", what))?;
    validate_dimension(dims.1, &format!("{} width", what))?;
    validate_dimension(dims.2, &format!("{} height", what))?;
    Ok(())
}

/// A cuboid item to be packed.
///
/// # Fields
/// * `id` - Unique identification number of the item
/// * `name` - Optional display name (e.g., a catalog article)
/// * `dims` - Base dimensions (length, width, height) in container units
/// * `weight` - Weight of the item in kg, may be zero
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: usize,
    #[serde(default)]
    #[schema(nullable = true)]
    pub name: Option<String>,
    #[schema(value_type = [f64; 3], example = json!([30.0, 20.0, 10.0]))]
    pub dims: (f64, f64, f64),
    pub weight: f64,
}

impl Item {
    /// Creates a new item with validation.
    ///
    /// # Parameters
    /// * `id` - Unique ID
    /// * `name` - Optional display name
    /// * `dims` - Base dimensions (length, width, height)
    /// * `weight` - Weight in kg, zero allowed
    ///
    /// # Returns
    /// `Ok(Item)` for valid values, otherwise `Err(ValidationError)`
    ///
    /// # Examples
    /// ```
    /// use packpoint::model::Item;
    ///
    /// let ok = Item::new(1, None, (10.0, 20.0, 30.0), 5.0);
    /// assert!(ok.is_ok());
    ///
    /// let invalid = Item::new(1, None, (-10.0, 20.0, 30.0), 5.0);
    /// assert!(invalid.is_err());
    /// ```
    pub fn new(
        id: usize,
        name: Option<String>,
        dims: (f64, f64, f64),
        weight: f64,
    ) -> Result<Self, ValidationError> {
        validate_dims(dims, "Item")?;
        validate_item_weight(weight)?;
        Ok(Self {
            id,
            name,
            dims,
            weight,
        })
    }

    /// Calculates the volume of the item.
    pub fn volume(&self) -> f64 {
        let (l, w, h) = self.dims;
        l * w * h
    }

    /// Returns the dimension triple for an orientation index (0-5).
    ///
    /// The six permutations of (l, w, h), in fixed order:
    /// (l,w,h), (l,h,w), (w,l,h), (w,h,l), (h,l,w), (h,w,l).
    /// Index 0 is the base orientation. Duplicate triples are not removed;
    /// callers may evaluate them harmlessly.
    pub fn orientation_dims(&self, orientation: usize) -> (f64, f64, f64) {
        let (l, w, h) = self.dims;
        match orientation % ORIENTATION_COUNT {
            0 => (l, w, h),
            1 => (l, h, w),
            2 => (w, l, h),
            3 => (w, h, l),
            4 => (h, l, w),
            _ => (h, w, l),
        }
    }

    /// Checks whether any allowed orientation fits the bare container
    /// dimensions.
    ///
    /// When rotation is disabled, only the base orientation is considered.
    pub fn fits_in_any_orientation(
        &self,
        container_dims: (f64, f64, f64),
        allow_rotation: bool,
    ) -> bool {
        let orientations = if allow_rotation { ORIENTATION_COUNT } else { 1 };
        (0..orientations).any(|orientation| {
            Vec3::from_tuple(self.orientation_dims(orientation))
                .fits_within(&Vec3::from_tuple(container_dims))
        })
    }
}

impl Dimensional for Item {
    fn dimensions(&self) -> Vec3 {
        Vec3::from_tuple(self.dims)
    }
}

impl Weighted for Item {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// An item placed in a container.
///
/// Records the chosen anchor position (minimum corner) and the effective
/// dimensions after orientation. The item itself stays untouched.
///
/// # Fields
/// * `item` - The original item
/// * `position` - Anchor position (x, y, z) in the container
/// * `dims` - Effective dimensions (l, w, h) of the chosen orientation
/// * `orientation` - Orientation index 0-5
#[derive(Clone, Debug)]
pub struct PlacedItem {
    pub item: Item,
    pub position: (f64, f64, f64),
    pub dims: (f64, f64, f64),
    pub orientation: usize,
}

impl PlacedItem {
    /// Creates a new placed item.
    pub fn new(item: Item, position: (f64, f64, f64), orientation: usize) -> Self {
        let dims = item.orientation_dims(orientation);
        Self {
            item,
            position,
            dims,
            orientation,
        }
    }

    /// Calculates the bounding box of the placed item.
    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_position_and_dims(
            Vec3::from_tuple(self.position),
            Vec3::from_tuple(self.dims),
        )
    }
}

impl Dimensional for PlacedItem {
    fn dimensions(&self) -> Vec3 {
        Vec3::from_tuple(self.dims)
    }
}

impl Weighted for PlacedItem {
    fn weight(&self) -> f64 {
        self.item.weight
    }
}

/// The container type used for a packing run.
///
/// All containers opened by the driver share these dimensions and the
/// weight capacity. An absent capacity means unbounded.
#[derive(Clone, Debug)]
pub struct ContainerSpec {
    pub dims: (f64, f64, f64),
    pub max_weight: f64,
}

impl ContainerSpec {
    /// Creates a new container spec after validating the parameters.
    ///
    /// # Parameters
    /// * `dims` - Container dimensions (length, width, height), all > 0
    /// * `max_weight` - Optional weight capacity; `None` means unbounded
    pub fn new(dims: (f64, f64, f64), max_weight: Option<f64>) -> Result<Self, ValidationError> {
        validate_dims(dims, "Container")?;
        if let Some(limit) = max_weight {
            if limit <= 0.0 || limit.is_nan() {
                return Err(ValidationError::InvalidWeight(format!(
                    "Container weight capacity must be positive, got: {}",
                    limit
                )));
            }
        }
        Ok(Self {
            dims,
            max_weight: max_weight.unwrap_or(f64::INFINITY),
        })
    }

    /// Opens a new empty container of this type.
    pub fn open(&self) -> Container {
        Container {
            dims: self.dims,
            max_weight: self.max_weight,
            placed: Vec::new(),
        }
    }

    /// Checks whether the item can fit this container type at all, under
    /// any allowed orientation and within the weight capacity.
    ///
    /// Used by the driver to pre-filter items before the position search.
    pub fn admits(&self, item: &Item, allow_rotation: bool) -> bool {
        item.weight <= self.max_weight && item.fits_in_any_orientation(self.dims, allow_rotation)
    }

    /// Returns the volume of the container type.
    pub fn volume(&self) -> f64 {
        let (l, w, h) = self.dims;
        l * w * h
    }
}

/// A container instance with its placement ledger.
///
/// `placed` is ordered by placement (insertion order, not spatial order);
/// downstream candidate-point generation relies on that order being
/// stable. A container only ever gains placements, never loses them.
///
/// # Fields
/// * `dims` - Dimensions (length, width, height)
/// * `max_weight` - Weight capacity in kg (`f64::INFINITY` = unbounded)
/// * `placed` - Placed items in placement order
#[derive(Clone, Debug)]
pub struct Container {
    pub dims: (f64, f64, f64),
    pub max_weight: f64,
    pub placed: Vec<PlacedItem>,
}

impl Container {
    /// Calculates the total weight of all placed items.
    pub fn used_weight(&self) -> f64 {
        self.placed.iter().map(Weighted::weight).sum()
    }

    /// Calculates the remaining weight capacity.
    pub fn remaining_weight(&self) -> f64 {
        self.max_weight - self.used_weight()
    }

    /// Calculates the volume occupied by placed items.
    pub fn used_volume(&self) -> f64 {
        self.placed.iter().map(Dimensional::volume).sum()
    }

    /// Calculates the total volume of the container.
    pub fn total_volume(&self) -> f64 {
        let (l, w, h) = self.dims;
        l * w * h
    }

    /// Calculates the volume utilization of the container in percent.
    pub fn utilization_percent(&self) -> f64 {
        let total = self.total_volume();
        if total <= 0.0 {
            return 0.0;
        }
        (self.used_volume() / total) * 100.0
    }
}

impl Dimensional for Container {
    fn dimensions(&self) -> Vec3 {
        Vec3::from_tuple(self.dims)
    }
}
