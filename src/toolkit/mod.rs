use std::fmt;
use std::path::Path;

use crate::table::ChannelRange;

pub mod casa;
pub use casa::CasaTasks;

/// Image-analysis operations the pipeline needs from the external toolkit.
/// The production implementation drives a headless CASA installation;
/// toolkit failures while reading a cube are recoverable at file
/// granularity, everything else is fatal to the run.
pub trait ImageToolkit {
    /// World frequencies in Hz at the start and end channel along the
    /// cube's spectral axis.
    fn channel_frequencies(
        &self,
        cube: &Path,
        start: usize,
        end: usize,
    ) -> Result<(f64, f64), ToolkitError>;

    /// Integrated-intensity (moment 0) image over the channel range,
    /// written as a toolkit-native image at `outfile`.
    fn moment0(
        &self,
        cube: &Path,
        chans: ChannelRange,
        outfile: &Path,
    ) -> Result<(), ToolkitError>;

    /// Exports a toolkit-native image to FITS, overwriting an existing file.
    fn export_fits(&self, image: &Path, fits: &Path) -> Result<(), ToolkitError>;

    /// Imports a FITS cube as a toolkit-native image, overwriting.
    fn import_fits(&self, fits: &Path, image: &Path) -> Result<(), ToolkitError>;

    /// Extracts a single channel plane into its own image.
    fn extract_channel(
        &self,
        image: &Path,
        chan: usize,
        outfile: &Path,
    ) -> Result<(), ToolkitError>;

    /// Rasterizes an image to a PNG frame.
    fn render_raster(&self, image: &Path, png: &Path) -> Result<(), ToolkitError>;
}

#[derive(Debug)]
pub enum ToolkitError {
    /// The toolkit process could not be started or its scratch files written.
    Launch(std::io::Error),
    /// The toolkit ran but the task failed.
    Task { task: String, detail: String },
    /// The toolkit reported success but its result was unreadable.
    BadOutput(String),
}

impl fmt::Display for ToolkitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolkitError::Launch(e) => {
                write!(f, "failed to launch the image-analysis toolkit: {}", e)
            }
            ToolkitError::Task { task, detail } => write!(f, "{} failed: {}", task, detail),
            ToolkitError::BadOutput(detail) => write!(f, "unreadable toolkit output: {}", detail),
        }
    }
}

impl std::error::Error for ToolkitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolkitError::Launch(e) => Some(e),
            _ => None,
        }
    }
}
