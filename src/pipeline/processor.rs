use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::config::Config;
use crate::encoder::MovieEncoder;
use crate::freq;
use crate::products::{self, ProductNames};
use crate::table::{ChannelRange, WorkItem};
use crate::toolkit::ImageToolkit;

use super::PipelineError;

/// What became of one cube for one work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeOutcome {
    /// The row carried no channel range; nothing to generate.
    NoChannels,
    /// The cube could not be opened or its coordinate system read.
    /// Usually an interrupted download; logged and skipped.
    Unreadable,
    Processed {
        moment: StepOutcome,
        movie: StepOutcome,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Written,
    SkippedExisting,
    Disabled,
}

/// Runs the moment-map and movie steps for a single cube.
pub struct CubeProcessor<'a> {
    config: &'a Config,
    toolkit: &'a dyn ImageToolkit,
    encoder: &'a dyn MovieEncoder,
}

impl<'a> CubeProcessor<'a> {
    pub fn new(
        config: &'a Config,
        toolkit: &'a dyn ImageToolkit,
        encoder: &'a dyn MovieEncoder,
    ) -> Self {
        CubeProcessor {
            config,
            toolkit,
            encoder,
        }
    }

    pub fn process(&self, item: &WorkItem, cube: &Path) -> Result<CubeOutcome, PipelineError> {
        let project_dir = self.config.data_dir().join(&item.project);
        fs::create_dir_all(&project_dir)?;

        let Some(chans) = item.chans else {
            return Ok(CubeOutcome::NoChannels);
        };

        let (start_hz, end_hz) =
            match self.toolkit.channel_frequencies(cube, chans.start, chans.end) {
                Ok(freqs) => freqs,
                Err(e) => {
                    error!("Error: {}", e);
                    error!("Error: {}", cube.display());
                    return Ok(CubeOutcome::Unreadable);
                }
            };

        let names = ProductNames::new(
            cube,
            &item.mol,
            freq::hz_to_ghz(start_hz),
            freq::hz_to_ghz(end_hz),
        );

        let moment = if self.config.make_moments() {
            self.make_moment(cube, chans, &project_dir, &names)?
        } else {
            StepOutcome::Disabled
        };

        let movie = if self.config.make_movies() {
            self.make_movie(cube, chans, &project_dir, &names)?
        } else {
            StepOutcome::Disabled
        };

        self.cleanup(cube);

        Ok(CubeOutcome::Processed { moment, movie })
    }

    fn make_moment(
        &self,
        cube: &Path,
        chans: ChannelRange,
        project_dir: &Path,
        names: &ProductNames,
    ) -> Result<StepOutcome, PipelineError> {
        let fits_out = project_dir.join(names.moment_fits());
        if fits_out.exists() {
            info!("Moment map already exists: {}", names.moment_image());
            return Ok(StepOutcome::SkippedExisting);
        }

        let native_out = project_dir.join(names.moment_image());
        self.toolkit.moment0(cube, chans, &native_out)?;
        self.toolkit.export_fits(&native_out, &fits_out)?;

        // The native moment image is only a stepping stone to the FITS file.
        if let Err(e) = fs::remove_dir_all(&native_out) {
            error!("Error: {} - {}.", native_out.display(), e);
        }

        Ok(StepOutcome::Written)
    }

    fn make_movie(
        &self,
        cube: &Path,
        chans: ChannelRange,
        project_dir: &Path,
        names: &ProductNames,
    ) -> Result<StepOutcome, PipelineError> {
        let movie_out = project_dir.join(names.movie());
        if movie_out.exists() {
            info!("Movie already exists: {}", names.movie());
            return Ok(StepOutcome::SkippedExisting);
        }

        let image = products::native_image_path(cube);
        self.toolkit.import_fits(cube, &image)?;

        let workspace = self.frame_workspace()?;
        let frame_dir = workspace.path().to_path_buf();

        for chan in chans.start..chans.end {
            let chan_image = frame_dir.join(format!("{}.image", chan));
            self.toolkit.extract_channel(&image, chan, &chan_image)?;
        }

        for chan in chans.start..chans.end {
            let chan_image = frame_dir.join(format!("{}.image", chan));
            let chan_png = frame_dir.join(format!("{}.png", chan));
            self.toolkit.render_raster(&chan_image, &chan_png)?;
        }

        self.encoder
            .encode(&frame_dir, chans.start, self.config.frame_rate(), &movie_out)?;

        info!("Cleaning up temp directory");
        if let Err(e) = workspace.close() {
            error!("Error: {} - {}.", frame_dir.display(), e);
        }

        Ok(StepOutcome::Written)
    }

    fn frame_workspace(&self) -> Result<FrameWorkspace, PipelineError> {
        match self.config.temp_dir() {
            Some(dir) => {
                // A fixed workspace is cleared unconditionally, like the
                // original `./temp` directory.
                if dir.is_dir() {
                    fs::remove_dir_all(dir)?;
                }
                fs::create_dir_all(dir)?;
                Ok(FrameWorkspace::Fixed(dir.to_path_buf()))
            }
            None => {
                let scratch = tempfile::Builder::new()
                    .prefix("moment_movies_frames")
                    .tempdir()?;
                Ok(FrameWorkspace::Scratch(scratch))
            }
        }
    }

    /// Best-effort removal of whatever a cube left behind, whether or not
    /// the generation steps ran.
    fn cleanup(&self, cube: &Path) {
        if let Some(dir) = self.config.temp_dir() {
            if dir.is_dir() {
                info!("Cleaning up temp directory");
                if let Err(e) = fs::remove_dir_all(dir) {
                    error!("Error: {} - {}.", dir.display(), e);
                }
            }
        }

        let image = products::native_image_path(cube);
        if image.is_dir() {
            info!("Cleaning up image files");
            if let Err(e) = fs::remove_dir_all(&image) {
                error!("Error: {} - {}.", image.display(), e);
            }
        }
    }
}

/// Where movie frames are staged. A configured path reproduces the original
/// shared `./temp` behavior; the scratch variant gives every movie its own
/// directory so concurrent runs cannot see each other's frames.
enum FrameWorkspace {
    Fixed(PathBuf),
    Scratch(tempfile::TempDir),
}

impl FrameWorkspace {
    fn path(&self) -> &Path {
        match self {
            FrameWorkspace::Fixed(path) => path,
            FrameWorkspace::Scratch(dir) => dir.path(),
        }
    }

    fn close(self) -> std::io::Result<()> {
        match self {
            FrameWorkspace::Fixed(path) => fs::remove_dir_all(path),
            FrameWorkspace::Scratch(dir) => dir.close(),
        }
    }
}
