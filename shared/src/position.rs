use serde::{Deserialize, Serialize};

/// Degrees of latitude/longitude the fixed camera region spans.
pub const REGION_SPAN_DEG: f64 = 0.01;

/// A single position sample from the location provider. Replaced whole on
/// every delivery; never merged or averaged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionReading {
    pub latitude: f64,
    pub longitude: f64,
    /// Provider-reported confidence radius in meters.
    pub accuracy: f64,
}

impl PositionReading {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
        }
    }
}

/// Requested provider accuracy class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accuracy {
    High,
    Balanced,
    Low,
}

/// Thresholds handed to the watch subscription. The screen always passes the
/// default; nothing here is user-adjustable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    pub accuracy: Accuracy,
    /// Minimum milliseconds between deliveries.
    pub min_interval_ms: u32,
    /// Minimum meters of displacement between deliveries.
    pub min_distance_m: f64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            accuracy: Accuracy::High,
            min_interval_ms: 5_000,
            min_distance_m: 1.0,
        }
    }
}

/// The camera region the map is initialised with. Derived once from the
/// first fix and kept for the whole mounted lifetime; later deliveries move
/// the marker, never the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_span: f64,
    pub longitude_span: f64,
}

impl Region {
    pub fn centered(reading: &PositionReading) -> Self {
        Self {
            latitude: reading.latitude,
            longitude: reading.longitude,
            latitude_span: REGION_SPAN_DEG,
            longitude_span: REGION_SPAN_DEG,
        }
    }

    /// (lat, lon) of the south-west corner, for bounds-based map init.
    pub fn south_west(&self) -> (f64, f64) {
        (
            self.latitude - self.latitude_span / 2.0,
            self.longitude - self.longitude_span / 2.0,
        )
    }

    /// (lat, lon) of the north-east corner.
    pub fn north_east(&self) -> (f64, f64) {
        (
            self.latitude + self.latitude_span / 2.0,
            self.longitude + self.longitude_span / 2.0,
        )
    }
}

/// The three overlay lines rendered under the map.
///
/// `f64`'s Display prints the shortest round-trip form, so 37.0 renders as
/// "37" and 37.0001 as "37.0001" — matching what the provider numbers look
/// like on screen.
pub fn overlay_lines(reading: &PositionReading) -> [String; 3] {
    [
        format!("Latitude: {}", reading.latitude),
        format!("Longitude: {}", reading.longitude),
        format!("Accuracy: {} meters", reading.accuracy),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_prints_shortest_form() {
        let lines = overlay_lines(&PositionReading::new(37.0, -122.0, 5.0));
        assert_eq!(lines[0], "Latitude: 37");
        assert_eq!(lines[1], "Longitude: -122");
        assert_eq!(lines[2], "Accuracy: 5 meters");
    }

    #[test]
    fn overlay_keeps_fractional_digits() {
        let lines = overlay_lines(&PositionReading::new(37.0001, -122.0, 4.0));
        assert_eq!(lines[0], "Latitude: 37.0001");
        assert_eq!(lines[2], "Accuracy: 4 meters");
    }

    #[test]
    fn overlay_is_idempotent() {
        let reading = PositionReading::new(51.5074, -0.1278, 12.5);
        assert_eq!(overlay_lines(&reading), overlay_lines(&reading));
    }

    #[test]
    fn region_is_centered_with_fixed_span() {
        let region = Region::centered(&PositionReading::new(37.0, -122.0, 5.0));
        assert_eq!(region.latitude, 37.0);
        assert_eq!(region.longitude, -122.0);
        assert_eq!(region.latitude_span, REGION_SPAN_DEG);
        assert_eq!(region.longitude_span, REGION_SPAN_DEG);
    }

    #[test]
    fn region_corners_bracket_the_center() {
        let region = Region::centered(&PositionReading::new(37.0, -122.0, 5.0));
        let (s, w) = region.south_west();
        let (n, e) = region.north_east();
        assert!((s - 36.995).abs() < 1e-9);
        assert!((w - -122.005).abs() < 1e-9);
        assert!((n - 37.005).abs() < 1e-9);
        assert!((e - -121.995).abs() < 1e-9);
    }

    #[test]
    fn watch_config_default_matches_subscription_call() {
        let cfg = WatchConfig::default();
        assert_eq!(cfg.accuracy, Accuracy::High);
        assert_eq!(cfg.min_interval_ms, 5_000);
        assert_eq!(cfg.min_distance_m, 1.0);
    }
}
