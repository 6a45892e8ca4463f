use std::io;

use thiserror::Error;

use crate::system::AcquisitionError;

/// Lifecycle misuse by the caller. Reported synchronously, never deferred
/// into the tick loop.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    #[error("sampler was already started")]
    AlreadyStarted,
    #[error("stop requested before the sampler was started")]
    StopBeforeStart,
    #[error("sampler is not running")]
    NotRunning,
}

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error("CPU acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),
    #[error("writing the utilization log failed: {0}")]
    Sink(#[from] io::Error),
}
