use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::table::ChannelRange;

use super::{ImageToolkit, ToolkitError};

/// Drives CASA in headless script mode: each operation is a short generated
/// task script handed to `casa --nologger --nogui --agg -c <script>`.
pub struct CasaTasks {
    executable: PathBuf,
}

impl Default for CasaTasks {
    fn default() -> Self {
        CasaTasks {
            executable: PathBuf::from("casa"),
        }
    }
}

impl CasaTasks {
    #[allow(dead_code)]
    pub fn new<P: Into<PathBuf>>(executable: P) -> Self {
        CasaTasks {
            executable: executable.into(),
        }
    }

    fn run_task(&self, task: &str, script: &str) -> Result<(), ToolkitError> {
        let mut script_file = tempfile::Builder::new()
            .prefix("moment_movies_task")
            .suffix(".py")
            .tempfile()
            .map_err(ToolkitError::Launch)?;
        script_file
            .write_all(script.as_bytes())
            .map_err(ToolkitError::Launch)?;
        script_file.flush().map_err(ToolkitError::Launch)?;

        let output = Command::new(&self.executable)
            .arg("--nologger")
            .arg("--nogui")
            .arg("--agg")
            .arg("-c")
            .arg(script_file.path())
            .output()
            .map_err(ToolkitError::Launch)?;

        if !output.status.success() {
            let detail = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ToolkitError::Task {
                task: task.to_string(),
                detail,
            });
        }

        Ok(())
    }
}

// Quotes a path for interpolation into a generated task script.
fn py_str(path: &Path) -> String {
    let escaped = path
        .to_string_lossy()
        .replace('\\', "\\\\")
        .replace('\'', "\\'");
    format!("'{}'", escaped)
}

impl ImageToolkit for CasaTasks {
    fn channel_frequencies(
        &self,
        cube: &Path,
        start: usize,
        end: usize,
    ) -> Result<(f64, f64), ToolkitError> {
        let result_file = tempfile::Builder::new()
            .prefix("moment_movies_freq")
            .suffix(".txt")
            .tempfile()
            .map_err(ToolkitError::Launch)?;

        // Pixel axes other than the spectral one (axis 2) are pinned to 0.
        let script = format!(
            "ia.open({cube})\n\
             cs = ia.coordsys()\n\
             start_hz = cs.toworld([0, 0, {start}, 0])['numeric'][2]\n\
             end_hz = cs.toworld([0, 0, {end}, 0])['numeric'][2]\n\
             ia.close()\n\
             with open({out}, 'w') as f:\n\
                 f.write('%.10e %.10e' % (start_hz, end_hz))\n",
            cube = py_str(cube),
            start = start,
            end = end,
            out = py_str(result_file.path()),
        );
        self.run_task("coordsys lookup", &script)?;

        let text = fs::read_to_string(result_file.path())
            .map_err(|e| ToolkitError::BadOutput(e.to_string()))?;

        let mut values = text.split_whitespace().map(str::parse::<f64>);
        match (values.next(), values.next()) {
            (Some(Ok(start_hz)), Some(Ok(end_hz))) => Ok((start_hz, end_hz)),
            _ => Err(ToolkitError::BadOutput(text.trim().to_string())),
        }
    }

    fn moment0(
        &self,
        cube: &Path,
        chans: ChannelRange,
        outfile: &Path,
    ) -> Result<(), ToolkitError> {
        let script = format!(
            "immoments(imagename={}, moments=[0], axis='spectral', chans='{}', outfile={})\n",
            py_str(cube),
            chans,
            py_str(outfile),
        );
        self.run_task("immoments", &script)
    }

    fn export_fits(&self, image: &Path, fits: &Path) -> Result<(), ToolkitError> {
        let script = format!(
            "exportfits(imagename={}, fitsimage={}, overwrite=True)\n",
            py_str(image),
            py_str(fits),
        );
        self.run_task("exportfits", &script)
    }

    fn import_fits(&self, fits: &Path, image: &Path) -> Result<(), ToolkitError> {
        let script = format!(
            "importfits(fitsimage={}, imagename={}, overwrite=True)\n",
            py_str(fits),
            py_str(image),
        );
        self.run_task("importfits", &script)
    }

    fn extract_channel(
        &self,
        image: &Path,
        chan: usize,
        outfile: &Path,
    ) -> Result<(), ToolkitError> {
        let script = format!(
            "imsubimage(imagename={}, outfile={}, chans='{}', overwrite=False)\n",
            py_str(image),
            py_str(outfile),
            chan,
        );
        self.run_task("imsubimage", &script)
    }

    fn render_raster(&self, image: &Path, png: &Path) -> Result<(), ToolkitError> {
        let script = format!(
            "imview(raster={}, out={})\n",
            py_str(image),
            py_str(png),
        );
        self.run_task("imview", &script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_py_str_quotes_and_escapes() {
        assert_eq!(py_str(Path::new("cube.fits")), "'cube.fits'");
        assert_eq!(py_str(Path::new("it's.fits")), "'it\\'s.fits'");
    }
}
