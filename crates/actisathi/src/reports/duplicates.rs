use super::domain::{Coordinates, IssueReport, ReportId, ReportSubmission};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
const DEFAULT_RADIUS_METERS: f64 = 100.0;

/// Decides whether a new report describes an issue that is already open.
pub trait DuplicateDetector: Send + Sync {
    fn find_duplicate(
        &self,
        candidate: &ReportSubmission,
        existing: &[IssueReport],
    ) -> Option<ReportId>;
}

/// Flags reports in the same category that are either within `radius_meters`
/// of an active report or name the same place.
#[derive(Debug, Clone)]
pub struct ProximityDuplicateDetector {
    radius_meters: f64,
}

impl Default for ProximityDuplicateDetector {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS_METERS)
    }
}

impl ProximityDuplicateDetector {
    pub fn new(radius_meters: f64) -> Self {
        let radius_meters = if radius_meters.is_finite() && radius_meters >= 0.0 {
            radius_meters
        } else {
            DEFAULT_RADIUS_METERS
        };
        Self { radius_meters }
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    fn same_place(&self, candidate: &ReportSubmission, report: &IssueReport) -> bool {
        if let (Some(a), Some(b)) = (candidate.coordinates, report.coordinates) {
            return distance_meters(a, b) <= self.radius_meters;
        }
        let candidate_location = normalize_location(&candidate.location);
        !candidate_location.is_empty() && candidate_location == normalize_location(&report.location)
    }
}

impl DuplicateDetector for ProximityDuplicateDetector {
    fn find_duplicate(
        &self,
        candidate: &ReportSubmission,
        existing: &[IssueReport],
    ) -> Option<ReportId> {
        existing
            .iter()
            .filter(|report| report.status.is_active() && report.category == candidate.category)
            .find(|report| self.same_place(candidate, report))
            .map(|report| report.id.clone())
    }
}

/// Great-circle distance using the haversine formula.
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let (lat_a, lat_b) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat_b - lat_a;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

fn normalize_location(raw: &str) -> String {
    raw.split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_matches_known_distance() {
        // Connaught Place to India Gate, roughly 2.4 km.
        let connaught = Coordinates {
            latitude: 28.6315,
            longitude: 77.2167,
        };
        let india_gate = Coordinates {
            latitude: 28.6129,
            longitude: 77.2295,
        };
        let distance = distance_meters(connaught, india_gate);
        assert!((2_300.0..2_500.0).contains(&distance), "{distance}");
        assert_eq!(distance_meters(connaught, connaught), 0.0);
    }

    #[test]
    fn location_text_ignores_case_and_punctuation() {
        assert_eq!(
            normalize_location("  MG Road, Sector-14 "),
            normalize_location("mg road sector 14")
        );
    }

    #[test]
    fn invalid_radius_falls_back_to_default() {
        assert_eq!(
            ProximityDuplicateDetector::new(f64::NAN).radius_meters(),
            DEFAULT_RADIUS_METERS
        );
    }
}
