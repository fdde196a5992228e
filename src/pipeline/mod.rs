use std::fmt;

use crate::encoder::EncoderError;
use crate::matcher::MatchError;
use crate::table::TableError;
use crate::toolkit::ToolkitError;

pub mod processor;
pub mod runner;

pub use runner::{BatchRunner, RunSummary};

/// Fatal pipeline failures. Unreadable cubes never surface here; they are
/// logged and skipped at file granularity by the processor.
#[derive(Debug)]
pub enum PipelineError {
    Table(TableError),
    Match(MatchError),
    Toolkit(ToolkitError),
    Encoder(EncoderError),
    Io(std::io::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Table(e) => write!(f, "{}", e),
            PipelineError::Match(e) => write!(f, "{}", e),
            PipelineError::Toolkit(e) => write!(f, "{}", e),
            PipelineError::Encoder(e) => write!(f, "{}", e),
            PipelineError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Table(e) => Some(e),
            PipelineError::Match(e) => Some(e),
            PipelineError::Toolkit(e) => Some(e),
            PipelineError::Encoder(e) => Some(e),
            PipelineError::Io(e) => Some(e),
        }
    }
}

impl From<TableError> for PipelineError {
    fn from(err: TableError) -> PipelineError {
        PipelineError::Table(err)
    }
}

impl From<MatchError> for PipelineError {
    fn from(err: MatchError) -> PipelineError {
        PipelineError::Match(err)
    }
}

impl From<ToolkitError> for PipelineError {
    fn from(err: ToolkitError) -> PipelineError {
        PipelineError::Toolkit(err)
    }
}

impl From<EncoderError> for PipelineError {
    fn from(err: EncoderError) -> PipelineError {
        PipelineError::Encoder(err)
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> PipelineError {
        PipelineError::Io(err)
    }
}
