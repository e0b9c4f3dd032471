use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop an elevation map run.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("no track file given")]
    InputNotFound,
    #[error("activity {index} does not exist (file has {count} activities)")]
    ActivityIndexOutOfRange { index: usize, count: usize },
    #[error("lap {index} does not exist in activity {activity} (activity has {count} laps)")]
    LapIndexOutOfRange {
        activity: usize,
        index: usize,
        count: usize,
    },
    #[error("cannot write to {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no valid trackpoints left after filtering")]
    EmptyTrack,
    #[error("malformed gradient table: {0}")]
    MalformedGradientTable(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("failed to parse track file: {0}")]
    TrackParse(String),
    #[error("failed to load annotations: {0}")]
    Annotations(String),
    #[error("failed to write csv: {0}")]
    Csv(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProfileError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ProfileError::InputNotFound => 1,
            ProfileError::ActivityIndexOutOfRange { .. } => 2,
            ProfileError::LapIndexOutOfRange { .. } => 3,
            ProfileError::OutputWrite { .. } => 4,
            _ => 1,
        }
    }
}

impl From<csv::Error> for ProfileError {
    fn from(err: csv::Error) -> Self {
        ProfileError::Csv(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ProfileError::InputNotFound.exit_code(), 1);
        assert_eq!(
            ProfileError::ActivityIndexOutOfRange { index: 3, count: 1 }.exit_code(),
            2
        );
        assert_eq!(
            ProfileError::LapIndexOutOfRange { activity: 0, index: 9, count: 2 }.exit_code(),
            3
        );
        let write_err = ProfileError::OutputWrite {
            path: PathBuf::from("/nope/out.svg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(write_err.exit_code(), 4);
        assert_eq!(ProfileError::EmptyTrack.exit_code(), 1);
    }

    #[test]
    fn test_messages_name_the_index() {
        let err = ProfileError::LapIndexOutOfRange { activity: 1, index: 7, count: 2 };
        let msg = err.to_string();
        assert!(msg.contains("lap 7"));
        assert!(msg.contains("activity 1"));
    }
}
