use std::fs;
use std::path::Path;

use flexi_logger::{DeferredNow, FileSpec, Logger, LoggerHandle};
use log::Record;

// Line format of the original batch log: `<timestamp> - <LEVEL> - <message>`.
fn log_line(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} - {} - {}",
        now.now().format("%Y-%m-%d %H:%M:%S,%3f"),
        record.level(),
        record.args()
    )
}

/// Starts the run log at `log_path`, replacing whatever a previous run left
/// behind. The returned handle must stay alive for the whole run so buffered
/// records are flushed on drop.
pub fn init(log_path: &Path) -> Result<LoggerHandle, Box<dyn std::error::Error>> {
    if log_path.exists() {
        fs::remove_file(log_path)?;
    }

    let directory = match log_path.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    };
    let basename = log_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("moment_movie_script");
    let suffix = log_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("log");

    let handle = Logger::try_with_str("info")?
        .log_to_file(
            FileSpec::default()
                .directory(directory)
                .basename(basename)
                .suffix(suffix)
                .suppress_timestamp(),
        )
        .format_for_files(log_line)
        .start()?;

    Ok(handle)
}
