// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time-interval model for Wavemark.
//!
//! This crate provides the annotation data model:
//! - Points (single instants of time)
//! - Segments (labelled time intervals)
//! - Validated option structs for creation and update
//! - Id-keyed stores with neighbor queries
//!
//! ## Architecture
//!
//! The model is the source of truth for marker times. Derived structures
//! (such as the cue index in `wavemark_timeline`) hold non-owning references
//! keyed by id and are kept in sync by the owning facade.

pub mod error;
pub mod point;
pub mod segment;
pub mod store;

pub use error::ModelError;
pub use point::{Point, PointOptions, PointUpdate};
pub use segment::{Segment, SegmentOptions, SegmentUpdate};
pub use store::{PointStore, SegmentStore};
