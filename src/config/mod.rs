#![allow(dead_code)]
use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub mod error;
pub use error::ConfigError;

/// Run configuration. The original batch script kept these as globals at the
/// top of the file; making them explicit lets two runs coexist as long as
/// they do not share a fixed `temp_dir`.
#[derive(Debug, Clone)]
pub struct Config {
    table_path: PathBuf,
    data_dir: PathBuf,
    log_path: PathBuf,
    make_moments: bool,
    make_movies: bool,
    frame_rate: u32,
    temp_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            table_path: PathBuf::from("chans.csv"),
            data_dir: PathBuf::from("."),
            log_path: PathBuf::from("moment_movie_script.log"),
            make_moments: true,
            make_movies: true,
            frame_rate: 10,
            temp_dir: None,
        }
    }
}

// This function deserializes a Config object from a deserializer, filling
// unset fields with the defaults and rejecting values the pipeline cannot
// run with.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            table_path: Option<String>,
            data_dir: Option<String>,
            log_path: Option<String>,
            make_moments: Option<bool>,
            make_movies: Option<bool>,
            frame_rate: Option<u32>,
            temp_dir: Option<String>,
        }

        // Deserialize into the helper struct
        let helper = ConfigHelper::deserialize(deserializer)?;
        let defaults = Config::default();

        let frame_rate = helper.frame_rate.unwrap_or(defaults.frame_rate);
        if frame_rate == 0 {
            return Err(D::Error::custom(ConfigError::FrameRate));
        }

        for (field, value) in [
            ("table_path", &helper.table_path),
            ("data_dir", &helper.data_dir),
            ("log_path", &helper.log_path),
            ("temp_dir", &helper.temp_dir),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(D::Error::custom(ConfigError::EmptyPath(field)));
            }
        }

        Ok(Config {
            table_path: helper
                .table_path
                .map_or(defaults.table_path, PathBuf::from),
            data_dir: helper.data_dir.map_or(defaults.data_dir, PathBuf::from),
            log_path: helper.log_path.map_or(defaults.log_path, PathBuf::from),
            make_moments: helper.make_moments.unwrap_or(defaults.make_moments),
            make_movies: helper.make_movies.unwrap_or(defaults.make_movies),
            frame_rate,
            temp_dir: helper.temp_dir.map(PathBuf::from),
        })
    }
}

impl Config {
    pub fn new<T: Into<PathBuf>, D: Into<PathBuf>>(
        table_path: T,
        data_dir: D,
        make_moments: bool,
        make_movies: bool,
    ) -> Self {
        Config {
            table_path: table_path.into(),
            data_dir: data_dir.into(),
            make_moments,
            make_movies,
            ..Config::default()
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn make_moments(&self) -> bool {
        self.make_moments
    }

    pub fn make_movies(&self) -> bool {
        self.make_movies
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Fixed frame-workspace path, if one was configured. When `None` the
    /// pipeline uses a unique scratch directory per movie instead.
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_original_script() {
        let config = Config::default();

        assert_eq!(config.table_path(), Path::new("chans.csv"));
        assert_eq!(config.data_dir(), Path::new("."));
        assert_eq!(config.log_path(), Path::new("moment_movie_script.log"));
        assert!(config.make_moments());
        assert!(config.make_movies());
        assert_eq!(config.frame_rate(), 10);
        assert_eq!(config.temp_dir(), None);
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");
        let mut file = File::create(&file_path).unwrap();

        let config_data = r#"
    {
        "table_path": "lines.csv",
        "data_dir": "./cubes",
        "make_movies": false,
        "frame_rate": 25,
        "temp_dir": "./frames"
    }
    "#;

        file.write_all(config_data.as_bytes()).unwrap();

        let config = Config::from_file(file_path).unwrap();

        assert_eq!(config.table_path(), Path::new("lines.csv"));
        assert_eq!(config.data_dir(), Path::new("./cubes"));
        assert!(config.make_moments());
        assert!(!config.make_movies());
        assert_eq!(config.frame_rate(), 25);
        assert_eq!(config.temp_dir(), Some(Path::new("./frames")));
    }

    #[test]
    fn test_zero_frame_rate_is_rejected() {
        let result: Result<Config, _> = serde_json::from_str(r#"{ "frame_rate": 0 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let result: Result<Config, _> = serde_json::from_str(r#"{ "table_path": " " }"#);
        assert!(result.is_err());
    }
}
