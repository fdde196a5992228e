use std::fmt;
use std::path::{Path, PathBuf};

/// Rewrites a dataset uid into the token embedded in delivered file names:
/// `"uid://A001/X133d"` becomes `"uid___A001_X133d"`.
pub fn normalize_uid(uid: &str) -> String {
    uid.replace("://", "___").replace('/', "_")
}

/// Finds FITS cubes in `dir` whose file name contains both the source name
/// and the uid token as substrings, in either order. Matching is
/// case-sensitive; no matches is not an error.
pub fn matching_cubes(
    dir: &Path,
    name: &str,
    uid_token: &str,
) -> Result<Vec<PathBuf>, MatchError> {
    let pattern = dir.join("*.fits");

    let mut cubes = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let path = entry?;
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if file_name.contains(name) && file_name.contains(uid_token) {
            cubes.push(path);
        }
    }

    // Directory listing order is platform-dependent; sort for stable runs.
    cubes.sort();

    Ok(cubes)
}

#[derive(Debug)]
pub enum MatchError {
    BadPattern(glob::PatternError),
    UnreadablePath(glob::GlobError),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::BadPattern(e) => write!(f, "bad cube search pattern: {}", e),
            MatchError::UnreadablePath(e) => write!(f, "unreadable path: {}", e),
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatchError::BadPattern(e) => Some(e),
            MatchError::UnreadablePath(e) => Some(e),
        }
    }
}

impl From<glob::PatternError> for MatchError {
    fn from(value: glob::PatternError) -> Self {
        MatchError::BadPattern(value)
    }
}

impl From<glob::GlobError> for MatchError {
    fn from(value: glob::GlobError) -> Self {
        MatchError::UnreadablePath(value)
    }
}
