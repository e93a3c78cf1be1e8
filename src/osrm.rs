//! OSRM HTTP adapter for road distances.
//!
//! Uses the `table` service with `annotations=distance`. Any transport or
//! decode failure degrades to haversine distances so sequencing never
//! fails because the routing backend is down.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::haversine::Haversine;
use crate::matrix::DistanceMatrix;
use crate::traits::DistanceProvider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Road-distance provider backed by an OSRM server.
///
/// Road distances are directional (one-way streets, turn restrictions), so
/// unlike [`Haversine`] the matrix this returns is not guaranteed to be
/// symmetric. Sequencing reads the entry in the direction of travel.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
    fallback: Haversine,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            fallback: Haversine,
        })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    /// Table request URL. OSRM expects `lng,lat` pairs.
    pub fn table_url(&self, positions: &[(f64, f64)]) -> String {
        let coords = positions
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=distance",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }

    fn fetch_table(&self, positions: &[(f64, f64)]) -> Result<OsrmTableResponse, reqwest::Error> {
        self.client
            .get(self.table_url(positions))
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>())
    }

    /// Kilometer table for `positions`, or `None` if OSRM could not answer.
    fn table_km(&self, positions: &[(f64, f64)]) -> Option<Vec<Vec<Option<f64>>>> {
        match self.fetch_table(positions) {
            Ok(body) => {
                let table = body.distances_km(positions.len());
                if table.is_none() {
                    warn!(count = positions.len(), "OSRM table response malformed");
                }
                table
            }
            Err(err) => {
                warn!(error = %err, "OSRM table request failed");
                None
            }
        }
    }
}

impl DistanceProvider for OsrmClient {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> Option<f64> {
        match self.table_km(&[from, to]) {
            Some(table) => table[0][1],
            None => self.fallback.distance_km(from, to),
        }
    }

    fn matrix_for(&self, positions: &[Option<(f64, f64)>]) -> DistanceMatrix {
        let located: Vec<(usize, (f64, f64))> = positions
            .iter()
            .enumerate()
            .filter_map(|(i, position)| position.map(|p| (i, p)))
            .collect();

        if located.len() < 2 {
            return DistanceMatrix::new(positions.len());
        }

        let coords: Vec<(f64, f64)> = located.iter().map(|(_, p)| *p).collect();
        let Some(table) = self.table_km(&coords) else {
            return self.fallback.matrix_for(positions);
        };

        let indices: Vec<usize> = located.iter().map(|(i, _)| *i).collect();
        expand_table(positions.len(), &indices, &table)
    }
}

/// Spreads a table over the located stops back onto input positions.
///
/// `indices[row]` is the input position of table row/column `row`. Stops
/// without a position keep 0.0 rows and columns.
fn expand_table(n: usize, indices: &[usize], table: &[Vec<Option<f64>>]) -> DistanceMatrix {
    let mut matrix = DistanceMatrix::new(n);
    for (row, &i) in indices.iter().enumerate() {
        for (col, &j) in indices.iter().enumerate() {
            if row == col {
                continue;
            }
            // Unreachable pairs come back as null.
            let km = table[row][col].unwrap_or_else(|| {
                debug!(from = i, to = j, "OSRM found no route, using 0.0 km");
                0.0
            });
            matrix.set(i, j, km);
        }
    }
    matrix
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: Option<String>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmTableResponse {
    /// Converts the meter table to kilometers, checking it is `n`×`n`.
    fn distances_km(self, n: usize) -> Option<Vec<Vec<Option<f64>>>> {
        if self.code.as_deref().is_some_and(|code| code != "Ok") {
            return None;
        }

        let rows = self.distances?;
        if rows.len() != n || rows.iter().any(|row| row.len() != n) {
            return None;
        }

        Some(
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|meters| meters.filter(|m| m.is_finite() && *m >= 0.0).map(|m| m / 1000.0))
                        .collect()
                })
                .collect(),
        )
    }
}
