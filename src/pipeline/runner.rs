use log::info;

use crate::config::Config;
use crate::encoder::MovieEncoder;
use crate::matcher;
use crate::table;
use crate::toolkit::ImageToolkit;

use super::PipelineError;
use super::processor::{CubeOutcome, CubeProcessor, StepOutcome};

/// Totals for one batch run, printed by `main` when the run finishes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub items: usize,
    pub cubes: usize,
    pub moments_written: usize,
    pub moments_skipped: usize,
    pub movies_written: usize,
    pub movies_skipped: usize,
    pub unreadable: usize,
}

/// Walks the work table and hands every matching cube to the processor.
pub struct BatchRunner {
    config: Config,
    toolkit: Box<dyn ImageToolkit>,
    encoder: Box<dyn MovieEncoder>,
}

impl BatchRunner {
    pub fn new(
        config: Config,
        toolkit: Box<dyn ImageToolkit>,
        encoder: Box<dyn MovieEncoder>,
    ) -> Self {
        BatchRunner {
            config,
            toolkit,
            encoder,
        }
    }

    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        let items = table::load_work_items(self.config.table_path())?;
        info!(
            "Loaded {} work items from {}",
            items.len(),
            self.config.table_path().display()
        );

        let processor =
            CubeProcessor::new(&self.config, self.toolkit.as_ref(), self.encoder.as_ref());

        let mut summary = RunSummary {
            items: items.len(),
            ..RunSummary::default()
        };

        for item in &items {
            let token = matcher::normalize_uid(&item.uid);
            let cubes = matcher::matching_cubes(self.config.data_dir(), &item.name, &token)?;

            for cube in &cubes {
                summary.cubes += 1;

                match processor.process(item, cube)? {
                    CubeOutcome::NoChannels => {}
                    CubeOutcome::Unreadable => summary.unreadable += 1,
                    CubeOutcome::Processed { moment, movie } => {
                        tally(
                            &mut summary.moments_written,
                            &mut summary.moments_skipped,
                            moment,
                        );
                        tally(
                            &mut summary.movies_written,
                            &mut summary.movies_skipped,
                            movie,
                        );
                    }
                }
            }
        }

        Ok(summary)
    }
}

fn tally(written: &mut usize, skipped: &mut usize, outcome: StepOutcome) {
    match outcome {
        StepOutcome::Written => *written += 1,
        StepOutcome::SkippedExisting => *skipped += 1,
        StepOutcome::Disabled => {}
    }
}
