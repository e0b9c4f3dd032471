/// Activity file reading
///
/// A GPX file is viewed as activities (one per `<trk>`), each split into laps
/// (one per `<trkseg>`). Every trackpoint carries the cumulative haversine
/// distance from the start of its activity plus its recorded altitude.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use gpx::{read, Gpx};
use geo::{HaversineDistance, Point};
use tracing::debug;

use crate::error::ProfileError;

/// Raw observation as recorded by the device. Altitude 0 means "no reading".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trackpoint {
    pub distance: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone)]
pub struct Lap {
    pub points: Vec<Trackpoint>,
    /// Distance covered inside this lap, in meters
    pub distance_m: f64,
}

#[derive(Debug, Clone)]
pub struct Activity {
    pub name: Option<String>,
    pub laps: Vec<Lap>,
}

pub fn read_activities(path: &Path) -> Result<Vec<Activity>, ProfileError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    parse_activities(reader)
}

pub fn parse_activities<R: Read>(reader: R) -> Result<Vec<Activity>, ProfileError> {
    let gpx = read(reader).map_err(|e| ProfileError::TrackParse(e.to_string()))?;
    let activities = activities_from_gpx(&gpx);

    debug!(
        "Parsed {} activities, {} trackpoints total",
        activities.len(),
        activities
            .iter()
            .flat_map(|a| a.laps.iter())
            .map(|l| l.points.len())
            .sum::<usize>()
    );

    Ok(activities)
}

fn activities_from_gpx(gpx: &Gpx) -> Vec<Activity> {
    let mut activities = Vec::with_capacity(gpx.tracks.len());

    for track in &gpx.tracks {
        // Distance keeps running across segments, like a device lap counter
        let mut cumulative = 0.0;
        let mut last: Option<Point<f64>> = None;
        let mut laps = Vec::with_capacity(track.segments.len());

        for segment in &track.segments {
            let mut points = Vec::with_capacity(segment.points.len());
            let mut lap_distance = 0.0;

            for (i, waypoint) in segment.points.iter().enumerate() {
                let here = waypoint.point();
                if let Some(prev) = last {
                    let step = prev.haversine_distance(&here);
                    cumulative += step;
                    if i > 0 {
                        lap_distance += step;
                    }
                }
                last = Some(here);

                points.push(Trackpoint {
                    distance: cumulative,
                    altitude: waypoint.elevation.unwrap_or(0.0),
                });
            }

            laps.push(Lap {
                points,
                distance_m: lap_distance,
            });
        }

        activities.push(Activity {
            name: track.name.clone(),
            laps,
        });
    }

    activities
}

/// Human readable listing of every activity and lap in the file.
pub fn format_summary(activities: &[Activity]) -> String {
    let mut out = String::new();

    for (activity_id, activity) in activities.iter().enumerate() {
        match &activity.name {
            Some(name) => out.push_str(&format!("Activity id: {} ({})\n", activity_id, name)),
            None => out.push_str(&format!("Activity id: {}\n", activity_id)),
        }

        for (lap_id, lap) in activity.laps.iter().enumerate() {
            out.push_str(&format!("  Lap id: {}\n", lap_id));
            out.push_str(&format!("    Num points: {}\n", lap.points.len()));
            out.push_str(&format!("    Distance: {:.0}km\n", lap.distance_m / 1000.0));
        }
    }

    out
}

/// Flatten the chosen activity (optionally a single lap of it) into one trackpoint list.
pub fn select_trackpoints(
    activities: &[Activity],
    activity: usize,
    lap: Option<usize>,
) -> Result<Vec<Trackpoint>, ProfileError> {
    let selected = activities
        .get(activity)
        .ok_or(ProfileError::ActivityIndexOutOfRange {
            index: activity,
            count: activities.len(),
        })?;

    match lap {
        Some(lap_id) => {
            let lap = selected
                .laps
                .get(lap_id)
                .ok_or(ProfileError::LapIndexOutOfRange {
                    activity,
                    index: lap_id,
                    count: selected.laps.len(),
                })?;
            Ok(lap.points.clone())
        }
        None => Ok(selected
            .laps
            .iter()
            .flat_map(|l| l.points.iter().copied())
            .collect()),
    }
}
