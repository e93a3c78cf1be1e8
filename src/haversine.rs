//! Haversine distance provider.
//!
//! Great-circle distance between coordinates. Ignores roads but needs no
//! external service, so it is the default provider and the fallback when
//! OSRM is unavailable.

use serde::{Deserialize, Serialize};

use crate::traits::DistanceProvider;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Haversine;

impl Haversine {
    /// Calculate haversine distance between two (lat, lng) points in kilometers.
    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        // Rounding can push `a` just past 1.0 for antipodal points.
        let c = 2.0 * a.min(1.0).sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

impl DistanceProvider for Haversine {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> Option<f64> {
        Some(Self::haversine_km(from, to))
    }
}
