/// One aircraft state from the feed, decoded from its positional tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRecord {
    pub icao: String,
    pub callsign: String,
    pub origin_country: String,
    pub time_position: Option<f64>,
    pub last_contact: f64,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Meters.
    pub altitude: Option<f64>,
    pub on_ground: bool,
    /// Meters per second.
    pub velocity: Option<f64>,
    /// Degrees clockwise from north.
    pub true_track: Option<f64>,
}

impl FlightRecord {
    /// Latitude and longitude in degrees, if both are usable.
    ///
    /// A zero coordinate is treated as missing, the same way the feed's
    /// placeholder states use it. Out-of-range or non-finite values are
    /// rejected here so they never reach the projector.
    pub fn position_deg(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.filter(|v| *v != 0.0 && v.is_finite())?;
        let lon = self.longitude.filter(|v| *v != 0.0 && v.is_finite())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some((lat, lon))
    }

    pub fn is_renderable(&self, airborne_only: bool) -> bool {
        self.position_deg().is_some() && !(airborne_only && self.on_ground)
    }

    pub fn info(&self) -> FlightInfo {
        FlightInfo {
            callsign: self.callsign.clone(),
            altitude: self.altitude,
            velocity: self.velocity,
        }
    }
}

/// The subset of a record shown when its marker is picked.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightInfo {
    pub callsign: String,
    pub altitude: Option<f64>,
    pub velocity: Option<f64>,
}

#[cfg(test)]
pub(crate) fn record(lon: Option<f64>, lat: Option<f64>, on_ground: bool) -> FlightRecord {
    FlightRecord {
        icao: "A1".into(),
        callsign: "CS1".into(),
        origin_country: "US".into(),
        time_position: Some(0.0),
        last_contact: 0.0,
        longitude: lon,
        latitude: lat,
        altitude: Some(10_000.0),
        on_ground,
        velocity: Some(200.0),
        true_track: Some(90.0),
    }
}
