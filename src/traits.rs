//! Core domain traits for the route sequencer.
//!
//! These are intentionally minimal. Host applications implement [`Stop`]
//! for their own location records and pick (or write) a
//! [`DistanceProvider`].

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SequenceError;
use crate::matrix::DistanceMatrix;

/// Unique identifier for sequencer entities.
pub trait Id: Clone + Eq + Hash {}

impl<T> Id for T where T: Clone + Eq + Hash {}

/// A single location to be visited by a route.
pub trait Stop {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Position (lat, lng), if the stop has been geocoded.
    fn position(&self) -> Option<(f64, f64)>;
}

impl<S: Stop + ?Sized> Stop for &S {
    type Id = S::Id;

    fn id(&self) -> &Self::Id {
        (**self).id()
    }

    fn position(&self) -> Option<(f64, f64)> {
        (**self).position()
    }
}

/// Provides pairwise distances (kilometers) between positions.
///
/// Returning `None` means the provider could not answer for this pair.
/// Callers treat that the same as a missing position: the pair counts
/// as 0.0 km.
pub trait DistanceProvider {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> Option<f64>;

    /// Builds the full matrix for a set of (possibly unset) positions.
    ///
    /// The matrix is indexed by the provided order. The default evaluates
    /// each unordered pair once and mirrors it.
    fn matrix_for(&self, positions: &[Option<(f64, f64)>]) -> DistanceMatrix {
        let n = positions.len();
        let mut matrix = DistanceMatrix::new(n);

        for i in 0..n {
            for j in (i + 1)..n {
                let km = resolve_distance(self, positions[i], positions[j]);
                matrix.set(i, j, km);
                matrix.set(j, i, km);
            }
        }

        matrix
    }
}

/// Distance between two optional positions with the degraded fallback.
///
/// Missing positions, declined lookups and non-finite or negative answers
/// all collapse to 0.0.
pub fn resolve_distance<P>(provider: &P, from: Option<(f64, f64)>, to: Option<(f64, f64)>) -> f64
where
    P: DistanceProvider + ?Sized,
{
    let (Some(from), Some(to)) = (from, to) else {
        debug!("stop without position, using 0.0 km");
        return 0.0;
    };

    match provider.distance_km(from, to) {
        Some(km) if km.is_finite() && km >= 0.0 => km,
        other => {
            debug!(?from, ?to, value = ?other, "distance unavailable, using 0.0 km");
            0.0
        }
    }
}

/// Distance between two stops, falling back to 0.0 when either lacks a
/// position.
pub fn stop_distance<S, P>(provider: &P, from: &S, to: &S) -> f64
where
    S: Stop,
    P: DistanceProvider + ?Sized,
{
    resolve_distance(provider, from.position(), to.position())
}

/// Sequencing strategy requested by the caller.
///
/// Every strategy currently uses the same nearest-neighbor-by-distance
/// ordering; the value is carried through to the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    DistanceBased,
    TimeBased,
    LoadBalanced,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::DistanceBased => "DISTANCE_BASED",
            Strategy::TimeBased => "TIME_BASED",
            Strategy::LoadBalanced => "LOAD_BALANCED",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DISTANCE_BASED" => Ok(Strategy::DistanceBased),
            "TIME_BASED" => Ok(Strategy::TimeBased),
            "LOAD_BALANCED" => Ok(Strategy::LoadBalanced),
            other => Err(SequenceError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat(Option<f64>);

    impl DistanceProvider for Flat {
        fn distance_km(&self, _from: (f64, f64), _to: (f64, f64)) -> Option<f64> {
            self.0
        }
    }

    #[test]
    fn test_missing_position_is_zero() {
        let provider = Flat(Some(5.0));
        assert_eq!(resolve_distance(&provider, None, Some((1.0, 1.0))), 0.0);
        assert_eq!(resolve_distance(&provider, Some((1.0, 1.0)), None), 0.0);
        assert_eq!(resolve_distance(&provider, Some((1.0, 1.0)), Some((2.0, 2.0))), 5.0);
    }

    #[test]
    fn test_declined_and_invalid_answers_are_zero() {
        let a = Some((0.0, 0.0));
        let b = Some((1.0, 1.0));
        assert_eq!(resolve_distance(&Flat(None), a, b), 0.0);
        assert_eq!(resolve_distance(&Flat(Some(f64::NAN)), a, b), 0.0);
        assert_eq!(resolve_distance(&Flat(Some(-3.0)), a, b), 0.0);
    }

    #[test]
    fn test_default_matrix_is_symmetric_with_zero_diagonal() {
        let matrix = Flat(Some(2.5)).matrix_for(&[Some((0.0, 0.0)), None, Some((1.0, 1.0))]);
        assert_eq!(matrix.size(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 0.0);
        }
        assert_eq!(matrix.get(0, 2), 2.5);
        assert_eq!(matrix.get(2, 0), 2.5);
        assert_eq!(matrix.get(0, 1), 0.0);
        assert_eq!(matrix.get(1, 2), 0.0);
    }

    #[test]
    fn test_strategy_round_trips_through_names() {
        for strategy in [Strategy::DistanceBased, Strategy::TimeBased, Strategy::LoadBalanced] {
            assert_eq!(strategy.as_str().parse::<Strategy>().unwrap(), strategy);
        }
        assert!("FASTEST".parse::<Strategy>().is_err());
    }
}
