/// Elevation profile rendering
///
/// Every pair of adjacent samples becomes one filled quadrilateral reaching
/// from the altitude line down to the baseline, colored by its slope. Labels
/// and height callouts are drawn on top. Output is a standalone SVG document.

use std::fmt::Write;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::annotations::Annotations;
use crate::error::ProfileError;
use crate::gradient_color::GradientTable;
use crate::track_normalizer::{Sample, TrackStats};

/// Vertical pixels per meter of altitude
pub const ALTITUDE_SCALE: f64 = 20.0;
/// Blank border around the profile, per side
const MARGIN: f64 = 100.0;
const LABEL_ROTATION_DEG: f64 = 15.0;
const LABEL_CIRCLE_RADIUS: f64 = 20.0;
const HEIGHT_ROTATION_DEG: f64 = -90.0;
const HEIGHT_CALLOUT_Y: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Distance downscale factor; larger values give narrower images
    pub scale: f64,
    pub font_size: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 10.0,
            font_size: 20.0,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ProfileError::InvalidParameter(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ProfileError::InvalidParameter(format!(
                "font size must be a positive number, got {}",
                self.font_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u64,
    pub height: u64,
}

impl Canvas {
    pub fn for_track(stats: &TrackStats, options: &RenderOptions) -> Self {
        let width = (stats.max_distance / options.scale).floor().max(0.0) as u64 + 2 * MARGIN as u64;
        let relief = (stats.max_altitude - stats.min_altitude).floor().max(0.0) as u64;
        let height = 2 * MARGIN as u64 + relief * ALTITUDE_SCALE as u64;
        Self { width, height }
    }

    /// Image y coordinate of `altitude`; higher ground sits nearer the top.
    fn altitude_y(&self, altitude: f64, stats: &TrackStats) -> f64 {
        self.height as f64 - (altitude - stats.min_altitude) * ALTITUDE_SCALE
    }
}

/// One drawn slice of the profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: Sample,
    pub end: Sample,
    /// Slope in percent
    pub gradient: f64,
    pub color: String,
}

pub fn slope_percent(from: &Sample, to: &Sample) -> f64 {
    (to.altitude - from.altitude) / (to.distance - from.distance) * 100.0
}

/// Pair up adjacent samples and color each pair by its slope.
pub fn profile_segments(samples: &[Sample], table: &GradientTable) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(samples.len().saturating_sub(1));
    let mut previous: Option<Sample> = None;

    for sample in samples {
        let Some(prev) = previous.replace(*sample) else {
            continue;
        };

        if sample.distance <= prev.distance {
            warn!(
                "Skipping segment with no forward distance at {:.1}m",
                sample.distance
            );
            continue;
        }

        let gradient = slope_percent(&prev, sample);
        segments.push(Segment {
            start: prev,
            end: *sample,
            gradient,
            color: table.hex_for(gradient),
        });
    }

    segments
}

/// Altitude of the first sample past `distance`, if the track gets that far.
pub fn altitude_at(samples: &[Sample], distance: f64) -> Option<f64> {
    samples
        .iter()
        .find(|s| s.distance > distance)
        .map(|s| s.altitude)
}

/// Build the complete SVG document.
pub fn render_svg(
    samples: &[Sample],
    stats: &TrackStats,
    table: &GradientTable,
    annotations: &Annotations,
    options: &RenderOptions,
) -> Result<String, ProfileError> {
    options.validate()?;
    if samples.is_empty() {
        return Err(ProfileError::EmptyTrack);
    }

    let canvas = Canvas::for_track(stats, options);
    let segments = profile_segments(samples, table);
    let mut out = String::new();

    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        canvas.width, canvas.height
    );
    let _ = writeln!(out, r#"<g transform="translate({},{})">"#, num(MARGIN), num(MARGIN));
    let _ = writeln!(out, r#"<g transform="scale({0},{0})">"#, num(1.0 / options.scale));

    for segment in &segments {
        write_segment(&mut out, segment, &canvas, stats);
    }

    let font_px = options.font_size * options.scale;

    for label in &annotations.label_points {
        write_label(
            &mut out,
            label.dist,
            canvas.height as f64 + 10.0 * options.scale,
            &label.label,
            options,
        );
    }

    for height_point in &annotations.height_points {
        match altitude_at(samples, height_point.dist) {
            Some(altitude) => write_height(
                &mut out,
                height_point.dist,
                &format!("{:.0}m", altitude),
                font_px,
            ),
            None => warn!(
                "Height point at {}m lies beyond the track end, skipping",
                height_point.dist
            ),
        }
    }

    let _ = writeln!(out, "</g>");
    let _ = writeln!(out, "</g>");
    let _ = writeln!(out, "</svg>");

    debug!(
        "Rendered {} segments on a {}x{} canvas",
        segments.len(),
        canvas.width,
        canvas.height
    );

    Ok(out)
}

fn write_segment(out: &mut String, segment: &Segment, canvas: &Canvas, stats: &TrackStats) {
    let baseline = canvas.height as f64;
    let x0 = segment.start.distance;
    let x1 = segment.end.distance;
    let y0 = canvas.altitude_y(segment.start.altitude, stats);
    let y1 = canvas.altitude_y(segment.end.altitude, stats);

    let _ = writeln!(
        out,
        r#"<polygon points="{},{} {},{} {},{} {},{}" style="stroke:none;fill:{}"/>"#,
        num(x0),
        num(y0),
        num(x0),
        num(baseline),
        num(x1),
        num(baseline),
        num(x1),
        num(y1),
        segment.color
    );
}

fn write_label(out: &mut String, x: f64, y: f64, text: &str, options: &RenderOptions) {
    let font_px = options.font_size * options.scale;
    let offset = options.font_size * 2.0;

    let _ = writeln!(out, r#"<g transform="translate({},{})">"#, num(x), num(y));
    let _ = writeln!(out, r#"<g transform="rotate({})">"#, num(LABEL_ROTATION_DEG));
    let _ = writeln!(out, r#"<circle cx="0" cy="0" r="{}"/>"#, num(LABEL_CIRCLE_RADIUS));
    let _ = writeln!(
        out,
        r#"<text x="{0}" y="{0}" style="font-size:{1};font-family:Sans-serif">{2}</text>"#,
        num(offset),
        num(font_px),
        xml_escape(text)
    );
    let _ = writeln!(out, "</g>");
    let _ = writeln!(out, "</g>");
}

fn write_height(out: &mut String, x: f64, text: &str, font_px: f64) {
    let _ = writeln!(out, r#"<g transform="translate({},{})">"#, num(x), num(HEIGHT_CALLOUT_Y));
    let _ = writeln!(out, r#"<g transform="rotate({})">"#, num(HEIGHT_ROTATION_DEG));
    let _ = writeln!(
        out,
        r#"<text x="0" y="{}" style="font-size:{};font-family:Sans-serif">{}</text>"#,
        num(font_px / 2.0),
        num(font_px),
        xml_escape(text)
    );
    let _ = writeln!(out, "</g>");
    let _ = writeln!(out, "</g>");
}

pub fn write_svg(path: &Path, svg: &str) -> Result<(), ProfileError> {
    fs::write(path, svg).map_err(|source| ProfileError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Compact coordinate formatting: at most two decimals, no trailing zeros.
fn num(value: f64) -> String {
    let text = format!("{:.2}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
