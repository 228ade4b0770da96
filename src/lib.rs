//! packpoint: corner-point based 3D container packing.
//!
//! The engine places cuboid items into fixed-size containers by searching
//! over candidate anchor points (derived from placed-item corners) and
//! axis-aligned orientations, minimizing the number of containers used.
//! The HTTP layer in [`api`] exposes the engine as a service.

pub mod api;
pub mod config;
pub mod geometry;
pub mod model;
pub mod packer;
pub mod types;
