/// Segment table export
///
/// Dumps every rendered profile segment, with its slope and fill color, as CSV.

use std::fs::File;
use std::path::Path;
use csv::Writer;
use serde::Serialize;
use tracing::info;

use crate::error::ProfileError;
use crate::profile_renderer::Segment;

#[derive(Debug, Serialize)]
struct SegmentRecord<'a> {
    start_distance_m: f64,
    end_distance_m: f64,
    start_altitude_m: f64,
    end_altitude_m: f64,
    gradient_percent: f64,
    color: &'a str,
}

impl<'a> From<&'a Segment> for SegmentRecord<'a> {
    fn from(segment: &'a Segment) -> Self {
        Self {
            start_distance_m: segment.start.distance,
            end_distance_m: segment.end.distance,
            start_altitude_m: segment.start.altitude,
            end_altitude_m: segment.end.altitude,
            gradient_percent: segment.gradient,
            color: &segment.color,
        }
    }
}

pub fn save_segments_to_csv(segments: &[Segment], csv_path: &Path) -> Result<(), ProfileError> {
    let file = File::create(csv_path).map_err(|source| ProfileError::OutputWrite {
        path: csv_path.to_path_buf(),
        source,
    })?;
    let mut wtr = Writer::from_writer(file);

    for segment in segments {
        wtr.serialize(SegmentRecord::from(segment))?;
    }
    wtr.flush()?;

    info!("Wrote {} segments to {}", segments.len(), csv_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track_normalizer::Sample;

    fn segment(from: (f64, f64), to: (f64, f64), gradient: f64, color: &str) -> Segment {
        Segment {
            start: Sample { distance: from.0, altitude: from.1 },
            end: Sample { distance: to.0, altitude: to.1 },
            gradient,
            color: color.to_string(),
        }
    }

    #[test]
    fn test_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("segments.csv");
        let segments = vec![
            segment((0.0, 100.0), (50.0, 110.0), 20.0, "#ff0000"),
            segment((50.0, 110.0), (100.0, 90.0), -40.0, "#0000ff"),
        ];

        save_segments_to_csv(&segments, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "start_distance_m,end_distance_m,start_altitude_m,end_altitude_m,gradient_percent,color"
        );
        assert_eq!(lines[1], "0.0,50.0,100.0,110.0,20.0,#ff0000");
        assert_eq!(lines[2], "50.0,100.0,110.0,90.0,-40.0,#0000ff");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("segments.csv");
        let result = save_segments_to_csv(&[], &path);
        assert!(matches!(result, Err(ProfileError::OutputWrite { .. })));
    }
}
