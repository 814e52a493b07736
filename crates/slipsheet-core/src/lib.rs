//! Core value types and layout resolution for Slipsheet.
//!
//! This crate is the leaf of the workspace: detent descriptions, container
//! geometry, and the resolver that turns both into absolute y positions.
//! It holds no gesture or presentation state and performs no I/O.

pub mod detent;
pub mod geometry;
pub mod layout;

pub use detent::{Detent, DetentId, HeightSpec};
pub use geometry::{pixel_rounded, Color, ContainerMetrics, DimState, EdgeInsets, Point};
pub use layout::{
    resolve_height_offset, ContentMeasurements, ResolvedLayout, TopOffsetPolicy, DEFAULT_TOP_GAP,
};
