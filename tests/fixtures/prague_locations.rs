//! Prague locations for realistic sequencing fixtures.

use route_sequencer::traits::Stop;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }
}

impl Stop for Location {
    type Id = &'static str;

    fn id(&self) -> &Self::Id {
        &self.name
    }

    fn position(&self) -> Option<(f64, f64)> {
        Some((self.lat, self.lng))
    }
}

/// Warehouse on the eastern edge of the city, used as the route anchor.
pub const DEPOT: Location = Location::new("Depot Malesice", 50.0833, 14.5300);

pub const CITY_CENTER: &[Location] = &[
    Location::new("Old Town Square", 50.0875, 14.4213),
    Location::new("Wenceslas Square", 50.0810, 14.4280),
    Location::new("Charles Bridge", 50.0865, 14.4114),
    Location::new("Prague Castle", 50.0911, 14.4016),
    Location::new("Dancing House", 50.0755, 14.4141),
    Location::new("Vysehrad", 50.0645, 14.4180),
];

pub const OUTSKIRTS: &[Location] = &[
    Location::new("Prague Airport", 50.1008, 14.2600),
    Location::new("Cerny Most", 50.1090, 14.5770),
    Location::new("Chodov", 50.0320, 14.4910),
    Location::new("Zlicin", 50.0540, 14.2910),
];

/// Depot followed by every fixture location.
pub fn all_stops() -> Vec<Location> {
    std::iter::once(DEPOT)
        .chain(CITY_CENTER.iter().cloned())
        .chain(OUTSKIRTS.iter().cloned())
        .collect()
}
