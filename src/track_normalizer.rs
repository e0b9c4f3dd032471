/// Track normalization
///
/// Turns raw device trackpoints into a clean, strictly distance-ordered
/// sample list: zero-altitude readings are dropped, repeated distances keep
/// only their first occurrence, and an optional distance cutoff trims the tail.

use std::cmp::Ordering;
use tracing::debug;

use crate::activity_reader::Trackpoint;
use crate::error::ProfileError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub distance: f64,
    pub altitude: f64,
}

/// Extremes over every accepted sample, used for canvas layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackStats {
    pub min_altitude: f64,
    pub max_altitude: f64,
    pub max_distance: f64,
}

impl TrackStats {
    fn seeded() -> Self {
        Self {
            min_altitude: f64::INFINITY,
            max_altitude: f64::NEG_INFINITY,
            max_distance: f64::NEG_INFINITY,
        }
    }

    fn accept(&mut self, sample: &Sample) {
        self.min_altitude = self.min_altitude.min(sample.altitude);
        self.max_altitude = self.max_altitude.max(sample.altitude);
        self.max_distance = self.max_distance.max(sample.distance);
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedTrack {
    pub samples: Vec<Sample>,
    pub stats: TrackStats,
}

/// Normalize raw trackpoints. `distance_limit` of `None` (or `<= 0`) keeps the whole track.
pub fn normalize_track(
    trackpoints: &[Trackpoint],
    distance_limit: Option<f64>,
) -> Result<NormalizedTrack, ProfileError> {
    let limit = distance_limit.filter(|l| *l > 0.0);

    let mut samples: Vec<Sample> = trackpoints
        .iter()
        .filter(|tp| tp.altitude != 0.0)
        .filter(|tp| tp.distance.is_finite() && tp.altitude.is_finite())
        .filter(|tp| limit.map_or(true, |l| tp.distance <= l))
        .map(|tp| Sample {
            distance: tp.distance,
            altitude: tp.altitude,
        })
        .collect();

    // Stable sort keeps input order among equal distances, so dedup keeps the first writer
    samples.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
    samples.dedup_by(|later, earlier| later.distance == earlier.distance);

    if samples.is_empty() {
        return Err(ProfileError::EmptyTrack);
    }

    let mut stats = TrackStats::seeded();
    for sample in &samples {
        stats.accept(sample);
    }

    debug!(
        "Normalized {} trackpoints into {} samples (altitude {:.1}..{:.1}m, {:.0}m long)",
        trackpoints.len(),
        samples.len(),
        stats.min_altitude,
        stats.max_altitude,
        stats.max_distance
    );

    Ok(NormalizedTrack { samples, stats })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tp(distance: f64, altitude: f64) -> Trackpoint {
        Trackpoint { distance, altitude }
    }

    fn distances(track: &NormalizedTrack) -> Vec<f64> {
        track.samples.iter().map(|s| s.distance).collect()
    }

    #[test]
    fn test_zero_altitude_is_dropped() {
        let track = normalize_track(&[tp(10.0, 0.0), tp(20.0, 5.0), tp(30.0, 0.0)], None).unwrap();
        assert_eq!(track.samples, vec![Sample { distance: 20.0, altitude: 5.0 }]);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let track = normalize_track(
            &[tp(50.0, 120.0), tp(10.0, 100.0), tp(50.0, 999.0), tp(10.0, 1.0)],
            None,
        )
        .unwrap();
        assert_eq!(
            track.samples,
            vec![
                Sample { distance: 10.0, altitude: 100.0 },
                Sample { distance: 50.0, altitude: 120.0 },
            ]
        );
        // Dropped duplicates never touch the extremes
        assert_eq!(track.stats.min_altitude, 100.0);
        assert_eq!(track.stats.max_altitude, 120.0);
    }

    #[test]
    fn test_output_is_strictly_ascending() {
        let raw: Vec<Trackpoint> = [7.0, 3.0, 9.0, 3.0, 1.0, 8.0, 9.0, 2.0]
            .iter()
            .enumerate()
            .map(|(i, d)| tp(*d, 100.0 + i as f64))
            .collect();
        let track = normalize_track(&raw, None).unwrap();
        assert_eq!(distances(&track), vec![1.0, 2.0, 3.0, 7.0, 8.0, 9.0]);
        assert!(track.samples.windows(2).all(|w| w[0].distance < w[1].distance));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let raw = [
            tp(0.0, 100.0),
            tp(0.0, 100.0),
            tp(50.0, 110.0),
            tp(100.0, 90.0),
            tp(150.0, 0.0),
        ];
        let track = normalize_track(&raw, None).unwrap();
        assert_eq!(distances(&track), vec![0.0, 50.0, 100.0]);
        assert_eq!(track.stats.min_altitude, 90.0);
        assert_eq!(track.stats.max_altitude, 110.0);
        assert_eq!(track.stats.max_distance, 100.0);
    }

    #[test]
    fn test_distance_limit_filters_regardless_of_order() {
        let raw = [tp(10.0, 1.0), tp(500.0, 2.0), tp(20.0, 3.0), tp(30.0, 4.0)];
        let track = normalize_track(&raw, Some(25.0)).unwrap();
        assert_eq!(distances(&track), vec![10.0, 20.0]);
        assert_eq!(track.stats.max_distance, 20.0);

        // Non-positive limit means no limit
        let track = normalize_track(&raw, Some(-1.0)).unwrap();
        assert_eq!(track.samples.len(), 4);
    }

    #[test]
    fn test_limit_is_inclusive() {
        let track = normalize_track(&[tp(10.0, 1.0), tp(20.0, 2.0)], Some(20.0)).unwrap();
        assert_eq!(track.samples.len(), 2);
    }

    #[test]
    fn test_empty_track_is_error() {
        assert!(matches!(
            normalize_track(&[tp(1.0, 0.0), tp(2.0, 0.0)], None),
            Err(ProfileError::EmptyTrack)
        ));
        assert!(matches!(normalize_track(&[], None), Err(ProfileError::EmptyTrack)));
    }

    #[test]
    fn test_non_finite_values_are_dropped() {
        let track = normalize_track(
            &[tp(f64::NAN, 10.0), tp(5.0, f64::INFINITY), tp(6.0, 12.0)],
            None,
        )
        .unwrap();
        assert_eq!(distances(&track), vec![6.0]);
    }

    #[test]
    fn test_negative_altitude_is_valid() {
        let track = normalize_track(&[tp(0.0, -12.5), tp(10.0, -3.0)], None).unwrap();
        assert_eq!(track.stats.min_altitude, -12.5);
        assert_eq!(track.stats.max_altitude, -3.0);
    }
}
