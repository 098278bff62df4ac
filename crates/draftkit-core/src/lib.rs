//! # DraftKit Core
//!
//! Core types and utilities for DraftKit.
//! Provides the error taxonomy, engine-wide constants, and the small
//! geometry layer shared by the canvas interaction engine.

pub mod constants;
pub mod error;
pub mod geometry;

pub use error::{Error, GeometryError, Result, SessionError, StoreError};

pub use geometry::{
    normalize_angle, point_in_polygon, point_segment_distance, project_on_segment, rotate_point,
    snap_angle, snap_direction, Point,
};
