//! route-sequencer
//!
//! Nearest-neighbor stop sequencing and round-robin multi-vehicle
//! partitioning over an injectable distance provider.

pub mod error;
pub mod haversine;
pub mod matrix;
pub mod osrm;
pub mod sequencer;
pub mod traits;

pub use error::{InvalidInput, SequenceError};
pub use haversine::Haversine;
pub use sequencer::{partition, sequence, sequence_multiple, SequenceOptions, SequencedRoute, Waypoint};
pub use traits::{DistanceProvider, Stop, Strategy};
