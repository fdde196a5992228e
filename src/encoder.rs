use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Assembles sequentially numbered PNG frames into a video. The production
/// encoder shells out to ffmpeg; an encoder failure is fatal to the run.
pub trait MovieEncoder {
    /// Encodes `<frame_dir>/<n>.png` frames, numbered from `start`, into
    /// `outfile` at the given frame rate.
    fn encode(
        &self,
        frame_dir: &Path,
        start: usize,
        frame_rate: u32,
        outfile: &Path,
    ) -> Result<(), EncoderError>;
}

pub struct FfmpegEncoder {
    executable: PathBuf,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        FfmpegEncoder {
            executable: PathBuf::from("ffmpeg"),
        }
    }
}

impl FfmpegEncoder {
    #[allow(dead_code)]
    pub fn new<P: Into<PathBuf>>(executable: P) -> Self {
        FfmpegEncoder {
            executable: executable.into(),
        }
    }
}

impl MovieEncoder for FfmpegEncoder {
    fn encode(
        &self,
        frame_dir: &Path,
        start: usize,
        frame_rate: u32,
        outfile: &Path,
    ) -> Result<(), EncoderError> {
        let output = Command::new(&self.executable)
            .arg("-framerate")
            .arg(frame_rate.to_string())
            .arg("-start_number")
            .arg(start.to_string())
            .arg("-i")
            .arg(frame_dir.join("%d.png"))
            .arg(outfile)
            .output()
            .map_err(EncoderError::Launch)?;

        if !output.status.success() {
            let detail = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(EncoderError::Exit(detail));
        }

        Ok(())
    }
}

#[derive(Debug)]
pub enum EncoderError {
    Launch(std::io::Error),
    Exit(String),
}

impl fmt::Display for EncoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncoderError::Launch(e) => write!(f, "failed to launch the video encoder: {}", e),
            EncoderError::Exit(detail) => write!(f, "video encoder failed: {}", detail),
        }
    }
}

impl std::error::Error for EncoderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncoderError::Launch(e) => Some(e),
            EncoderError::Exit(_) => None,
        }
    }
}
