/// Slope to color mapping
///
/// A gradient table is an ascending list of keypoints (percent slope, color).
/// Colors between two keypoints are blended in CIE LCh (HCL), which keeps hue
/// transitions perceptually even, and then clamped back into sRGB.

use palette::convert::FromColorUnclamped;
use palette::white_point::D65;
use palette::{Clamp, IntoColor, Lch, Srgb};

use crate::error::ProfileError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub color: Srgb<f64>,
    /// Slope in percent
    pub position: f64,
}

impl Keypoint {
    pub fn from_hex(hex: &str, position: f64) -> Result<Self, ProfileError> {
        Ok(Self {
            color: parse_hex(hex)?,
            position,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientTable {
    keypoints: Vec<Keypoint>,
}

impl GradientTable {
    /// Build a table, rejecting anything the bracket search cannot handle.
    pub fn new(keypoints: Vec<Keypoint>) -> Result<Self, ProfileError> {
        if keypoints.len() < 2 {
            return Err(ProfileError::MalformedGradientTable(format!(
                "need at least 2 keypoints, got {}",
                keypoints.len()
            )));
        }
        if let Some(bad) = keypoints.iter().find(|k| !k.position.is_finite()) {
            return Err(ProfileError::MalformedGradientTable(format!(
                "keypoint position {} is not finite",
                bad.position
            )));
        }
        for pair in keypoints.windows(2) {
            if pair[1].position <= pair[0].position {
                return Err(ProfileError::MalformedGradientTable(format!(
                    "positions must be strictly ascending ({} follows {})",
                    pair[1].position, pair[0].position
                )));
            }
        }

        Ok(Self { keypoints })
    }

    /// Blue for steep descents, green on the flat, red for steep climbs.
    pub fn slope_default() -> Self {
        let blue = Srgb::new(0.0, 0.0, 1.0);
        let green = Srgb::new(0.0, 1.0, 0.0);
        let red = Srgb::new(1.0, 0.0, 0.0);

        Self {
            keypoints: vec![
                Keypoint { color: blue, position: -50.0 },
                Keypoint { color: blue, position: -20.0 },
                Keypoint { color: green, position: 0.0 },
                Keypoint { color: red, position: 20.0 },
                Keypoint { color: red, position: 50.0 },
            ],
        }
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    /// Color for slope `t` (percent).
    pub fn color_for(&self, t: f64) -> Srgb<f64> {
        let first = self.keypoints[0];
        if t < first.position {
            return first.color;
        }

        for pair in self.keypoints.windows(2) {
            let (c1, c2) = (pair[0], pair[1]);
            if c1.position <= t && t <= c2.position {
                let f = (t - c1.position) / (c2.position - c1.position);
                return Srgb::from_color_unclamped(blend_hcl(c1.color, c2.color, f)).clamp();
            }
        }

        // Past the last keypoint (or NaN)
        self.keypoints[self.keypoints.len() - 1].color
    }

    pub fn hex_for(&self, t: f64) -> String {
        to_hex(self.color_for(t))
    }
}

impl Default for GradientTable {
    fn default() -> Self {
        Self::slope_default()
    }
}

/// Interpolate lightness and chroma linearly and hue along the shorter arc.
fn blend_hcl(from: Srgb<f64>, to: Srgb<f64>, f: f64) -> Lch<D65, f64> {
    let a: Lch<D65, f64> = from.into_color();
    let b: Lch<D65, f64> = to.into_color();

    let h1 = a.hue.into_positive_degrees();
    let h2 = b.hue.into_positive_degrees();
    let delta = ((h2 - h1).rem_euclid(360.0) + 540.0).rem_euclid(360.0) - 180.0;
    let hue = (h1 + f * delta).rem_euclid(360.0);

    Lch::new(
        a.l + f * (b.l - a.l),
        a.chroma + f * (b.chroma - a.chroma),
        hue,
    )
}

pub fn parse_hex(hex: &str) -> Result<Srgb<f64>, ProfileError> {
    let rgb: Srgb<u8> = hex
        .trim()
        .parse()
        .map_err(|e| ProfileError::MalformedGradientTable(format!("bad color {:?}: {}", hex, e)))?;
    Ok(rgb.into_format())
}

pub fn to_hex(color: Srgb<f64>) -> String {
    let rgb: Srgb<u8> = color.into_format();
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}
