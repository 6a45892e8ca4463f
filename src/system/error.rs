use thiserror::Error;

/// Failure to read a consistent set of CPU tick counters from the host.
///
/// Every variant is fatal for a sampling run: without a stable core topology
/// there is nothing meaningful to diff against.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("operating system reported zero CPU cores")]
    NoCores,

    #[error("core count changed from {expected} to {found}; core hot-plug is not supported")]
    CoreCountChanged { expected: usize, found: usize },

    #[error("failed to read CPU counters: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse CPU counters: {0}")]
    Parse(String),

    #[error("CPU tick counters are not available on {0}")]
    Unsupported(&'static str),
}
