use crate::event::Location;

const WGS84_A_KM: f64 = 6378.137;
const WGS84_E2: f64 = 0.006_694_379_990_14;

/// Observer position in the frames SGP4 output gets compared against.
#[derive(Debug, Clone, Copy)]
pub struct GroundStation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl From<&Location> for GroundStation {
    fn from(location: &Location) -> Self {
        Self {
            latitude_deg: location.lat(),
            longitude_deg: location.lon(),
            altitude_m: 0.0,
        }
    }
}

impl GroundStation {
    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    /// Geodetic to earth-fixed cartesian on the WGS-84 ellipsoid.
    pub fn position_ecef_km(&self) -> [f64; 3] {
        let (sin_lat, cos_lat) = self.lat_rad().sin_cos();
        let (sin_lon, cos_lon) = self.lon_rad().sin_cos();
        let prime_vertical = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat.powi(2)).sqrt();
        let h = self.altitude_m / 1000.0;
        [
            (prime_vertical + h) * cos_lat * cos_lon,
            (prime_vertical + h) * cos_lat * sin_lon,
            (prime_vertical * (1.0 - WGS84_E2) + h) * sin_lat,
        ]
    }
}
