//! An automatic nesting engine for fabrication: given the flat footprints of
//! solid parts and one or more plates (usable bed regions), it searches per
//! part over candidate rotations and positions, commits a feasible
//! non-overlapping placement and updates the remaining usable area.
//!
//! The engine runs synchronously to completion on a single thread. All boolean
//! geometry runs on integer-valued (accuracy-scaled) coordinates to avoid
//! degenerate clipping failures.

/// The injected polygon boolean-operations capability and its default backend
pub mod boolops;

/// Entities modelling the nesting problem: [`Part`](entities::Part)s and [`Plate`](entities::Plate)s
pub mod entities;

/// Geometric primitives and base algorithms
pub mod geometry;

/// Importing problem instances into and exporting solutions out of this library
pub mod io;

/// The placement search itself: trace lines, ring reconstruction and the [`Nester`](nest::Nester)
pub mod nest;

/// Silhouette extraction: projecting triangle meshes onto an occupancy grid
pub mod silhouette;

/// Helper types which do not belong to any specific module
pub mod util;
