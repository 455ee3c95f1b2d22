//! Pipespace Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Pipespace
//! spacing engine and its front-ends. It includes:
//!
//! - **Geometry**: Plane coordinates and bounding boxes ([`geometry`] module)
//! - **Pipes**: Per-pipe attributes and clearance modes ([`pipe`] module)
//! - **Lookup**: Standard pipe and flange outer diameters ([`lookup`] module)
//! - **Drafting**: Layers, line types and CAD entities ([`drafting`] module)

pub mod drafting;
pub mod geometry;
pub mod lookup;
pub mod pipe;

pub use pipe::{
    BaseOffset, ClearanceMode, DimensionKind, Flange, MissingDimension, NominalSize,
    PipeDescriptor,
};
