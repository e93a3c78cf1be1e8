//! Test fixtures for route-sequencer.
//!
//! Real Prague delivery points with approximate coordinates.

pub mod prague_locations;

pub use prague_locations::*;
