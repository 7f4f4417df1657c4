//! Shared foundational types for the placer workspace.
//!
//! This crate provides the opaque index newtypes used by the placement graph
//! arena, plus the 2D point/vector/rectangle types and the pure geometry
//! helpers the force model and collision resolver are built on.

#![warn(missing_docs)]

pub mod geometry;
pub mod ids;

pub use geometry::{direction, distance, overlap_depth, Point, Rect, Vec2, OVERLAP_EPSILON};
pub use ids::{EdgeId, GroupId, NodeId};
