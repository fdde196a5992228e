mod config;
mod encoder;
mod freq;
mod logging;
mod matcher;
mod pipeline;
mod products;
mod table;
mod toolkit;

use std::path::Path;

use config::Config;
use encoder::FfmpegEncoder;
use pipeline::BatchRunner;
use toolkit::CasaTasks;

const CONFIG_PATH: &str = "moment_movies.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = if Path::new(CONFIG_PATH).exists() {
        Config::from_file(CONFIG_PATH)?
    } else {
        Config::default()
    };

    // Keep the handle alive so buffered records are flushed when the run ends.
    let _logger = logging::init(config.log_path())?;

    println!("Starting moment map and movie processing...");

    let runner = BatchRunner::new(
        config,
        Box::new(CasaTasks::default()),
        Box::new(FfmpegEncoder::default()),
    );
    let summary = runner.run()?;

    println!(
        "Processed {} work items across {} matching cubes",
        summary.items, summary.cubes
    );
    println!(
        "  Moment maps written: {}, already existing: {}",
        summary.moments_written, summary.moments_skipped
    );
    println!(
        "  Movies written: {}, already existing: {}",
        summary.movies_written, summary.movies_skipped
    );
    if summary.unreadable > 0 {
        println!("  Unreadable cubes skipped: {}", summary.unreadable);
    }

    Ok(())
}
