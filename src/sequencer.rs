//! Route sequencer: nearest-neighbor ordering and round-robin partitioning.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{InvalidInput, SequenceError};
use crate::matrix::DistanceMatrix;
use crate::traits::{DistanceProvider, Stop, Strategy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceOptions {
    /// Average travel speed used to turn distance into duration.
    pub average_speed_kmh: f64,
    /// Upper bound on stops per sequenced route (bounds the O(n²) cost).
    pub max_stops: Option<usize>,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            average_speed_kmh: 30.0, // 2 minutes per km
            max_stops: None,
        }
    }
}

impl SequenceOptions {
    /// Convert a distance in km to travel minutes.
    pub fn km_to_minutes(&self, km: f64) -> f64 {
        km * (60.0 / self.average_speed_kmh)
    }
}

/// One stop in a sequenced route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint<StopId> {
    pub stop_id: StopId,
    /// 1-based position in the visiting order.
    pub order: usize,
    pub distance_from_previous_km: f64,
    pub duration_from_previous_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencedRoute<StopId> {
    pub stop_ids: Vec<StopId>,
    pub waypoints: Vec<Waypoint<StopId>>,
    pub total_distance_km: f64,
    pub estimated_duration_minutes: f64,
    pub strategy: Strategy,
    /// Cluster index when produced by [`sequence_multiple`].
    pub vehicle: Option<usize>,
}

impl<StopId> SequencedRoute<StopId> {
    pub fn start(&self) -> Option<&StopId> {
        self.stop_ids.first()
    }

    pub fn end(&self) -> Option<&StopId> {
        self.stop_ids.last()
    }

    pub fn name(&self) -> String {
        match self.vehicle {
            Some(vehicle) => format!("Vehicle {} Route", vehicle + 1),
            None => "Optimized Route".to_string(),
        }
    }

    pub fn description(&self) -> String {
        format!("Route optimized using {} strategy", self.strategy)
    }
}

/// Sequence `stops` into a single route.
///
/// The route starts at the first stop in input order and greedily moves to
/// the nearest unvisited stop. Ties go to the stop that appears earliest in
/// the input. Every strategy uses this ordering.
pub fn sequence<S, P>(
    stops: &[S],
    strategy: Strategy,
    provider: &P,
    options: &SequenceOptions,
) -> Result<SequencedRoute<S::Id>, SequenceError>
where
    S: Stop,
    P: DistanceProvider + ?Sized,
{
    validate_options(options)?;
    validate_stop_count(stops.len(), options)?;

    let positions: Vec<Option<(f64, f64)>> = stops.iter().map(|stop| stop.position()).collect();
    let matrix = provider.matrix_for(&positions);

    let order = match strategy {
        Strategy::DistanceBased | Strategy::TimeBased | Strategy::LoadBalanced => {
            nearest_neighbor_order(&matrix)
        }
    };

    let route = build_route(stops, &order, &matrix, strategy, options);

    info!(
        stops = stops.len(),
        strategy = %strategy,
        total_distance_km = route.total_distance_km,
        estimated_duration_minutes = route.estimated_duration_minutes,
        "route sequenced"
    );

    Ok(route)
}

/// Split `stops` into `vehicle_count` clusters, round-robin by input index.
///
/// Cluster sizes differ by at most one.
pub fn partition<S>(stops: &[S], vehicle_count: usize) -> Result<Vec<Vec<&S>>, SequenceError> {
    if vehicle_count == 0 {
        return Err(InvalidInput::NoVehicles.into());
    }
    if stops.len() < vehicle_count {
        return Err(InvalidInput::MoreVehiclesThanStops {
            stops: stops.len(),
            vehicles: vehicle_count,
        }
        .into());
    }

    let per_cluster = stops.len().div_ceil(vehicle_count);
    let mut clusters: Vec<Vec<&S>> = (0..vehicle_count)
        .map(|_| Vec::with_capacity(per_cluster))
        .collect();
    for (i, stop) in stops.iter().enumerate() {
        clusters[i % vehicle_count].push(stop);
    }

    Ok(clusters)
}

/// Partition `stops` across vehicles and sequence each cluster.
///
/// Clusters with fewer than two stops are skipped. Routes come back in
/// cluster order, tagged with their vehicle index.
pub fn sequence_multiple<S, P>(
    stops: &[S],
    vehicle_count: usize,
    strategy: Strategy,
    provider: &P,
    options: &SequenceOptions,
) -> Result<Vec<SequencedRoute<S::Id>>, SequenceError>
where
    S: Stop + Sync,
    S::Id: Send,
    P: DistanceProvider + Sync + ?Sized,
{
    validate_options(options)?;
    let clusters = partition(stops, vehicle_count)?;

    let routes = clusters
        .par_iter()
        .enumerate()
        .filter(|(vehicle, cluster)| {
            if cluster.len() < 2 {
                debug!(vehicle, size = cluster.len(), "skipping cluster too small to sequence");
                return false;
            }
            true
        })
        .map(|(vehicle, cluster)| {
            let mut route = sequence(cluster.as_slice(), strategy, provider, options)?;
            route.vehicle = Some(vehicle);
            Ok(route)
        })
        .collect::<Result<Vec<_>, SequenceError>>()?;

    info!(
        stops = stops.len(),
        vehicles = vehicle_count,
        routes = routes.len(),
        "multi-vehicle routes sequenced"
    );

    Ok(routes)
}

fn validate_options(options: &SequenceOptions) -> Result<(), SequenceError> {
    let speed = options.average_speed_kmh;
    if !speed.is_finite() || speed <= 0.0 {
        return Err(InvalidInput::InvalidSpeed { speed }.into());
    }
    Ok(())
}

fn validate_stop_count(count: usize, options: &SequenceOptions) -> Result<(), SequenceError> {
    if count < 2 {
        return Err(InvalidInput::TooFewStops { count }.into());
    }
    if let Some(max) = options.max_stops {
        if count > max {
            return Err(InvalidInput::TooManyStops { count, max }.into());
        }
    }
    Ok(())
}

/// Greedy nearest-neighbor tour over matrix indices, anchored at index 0.
fn nearest_neighbor_order(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.size();
    if n == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = 0;
    visited[current] = true;
    order.push(current);

    while order.len() < n {
        let mut nearest: Option<(usize, f64)> = None;
        for candidate in 0..n {
            if visited[candidate] {
                continue;
            }
            let distance = matrix.get(current, candidate);
            // Strict comparison keeps the earliest index on ties.
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((candidate, distance));
            }
        }

        let Some((next, _)) = nearest else {
            break;
        };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

fn build_route<S: Stop>(
    stops: &[S],
    order: &[usize],
    matrix: &DistanceMatrix,
    strategy: Strategy,
    options: &SequenceOptions,
) -> SequencedRoute<S::Id> {
    let mut waypoints = Vec::with_capacity(order.len());
    let mut previous: Option<usize> = None;

    for (position, &index) in order.iter().enumerate() {
        let leg_km = previous.map_or(0.0, |prev| matrix.get(prev, index));
        waypoints.push(Waypoint {
            stop_id: stops[index].id().clone(),
            order: position + 1,
            distance_from_previous_km: leg_km,
            duration_from_previous_minutes: options.km_to_minutes(leg_km),
        });
        previous = Some(index);
    }

    let total_distance_km = matrix.path_length(order);

    SequencedRoute {
        stop_ids: order.iter().map(|&index| stops[index].id().clone()).collect(),
        waypoints,
        total_distance_km,
        estimated_duration_minutes: options.km_to_minutes(total_distance_km),
        strategy,
        vehicle: None,
    }
}
