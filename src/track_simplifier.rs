/// Greedy track simplification
///
/// Repeatedly drops the sample that closes the smallest distance gap until the
/// requested share of samples is gone. The final sample is never removed.

use tracing::debug;

use crate::error::ProfileError;
use crate::track_normalizer::Sample;

/// Never simplify below this many samples; a profile needs at least one segment.
const MIN_SAMPLES: usize = 2;

/// Number of samples a `percent` simplification removes from `len` samples.
pub fn removal_count(len: usize, percent: f64) -> usize {
    let wanted = (len as f64 * percent / 100.0).floor() as usize;
    wanted.min(len.saturating_sub(MIN_SAMPLES))
}

/// Remove `percent` (0..=100) of the samples, smallest distance gap first.
pub fn simplify_track(samples: &[Sample], percent: f64) -> Result<Vec<Sample>, ProfileError> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(ProfileError::InvalidParameter(format!(
            "simplification must be between 0 and 100 percent, got {}",
            percent
        )));
    }

    let remove = removal_count(samples.len(), percent);
    let mut reduced = samples.to_vec();

    for _ in 0..remove {
        let index = removal_index(&reduced);
        reduced.remove(index);
    }

    debug!(
        "Simplified {} samples to {} ({}% requested)",
        samples.len(),
        reduced.len(),
        percent
    );

    Ok(reduced)
}

/// Index of the sample to drop next. Needs at least two samples.
fn removal_index(samples: &[Sample]) -> usize {
    let mut smallest_gap = f64::INFINITY;
    let mut smallest_id = 1;

    for (i, pair) in samples.windows(2).enumerate() {
        let gap = pair[1].distance - pair[0].distance;
        if gap < smallest_gap {
            smallest_gap = gap;
            smallest_id = i + 1;
        }
    }

    // Keep the track end in place: take its neighbour instead
    if smallest_id == samples.len() - 1 {
        smallest_id -= 1;
    }

    smallest_id
}
