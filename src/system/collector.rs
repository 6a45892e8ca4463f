use std::time::{Instant, SystemTime, UNIX_EPOCH};

use sysinfo::{MemoryRefreshKind, RefreshKind, System};

use super::error::AcquisitionError;
use super::platform;
use super::snapshot::{MemoryReading, TickSnapshot};

/// Anything able to produce tick snapshots for the sampler.
pub trait TickSource {
    fn capture(&mut self) -> Result<TickSnapshot, AcquisitionError>;
}

/// Host-backed tick source: per-core counters from the platform layer,
/// memory from `sysinfo`.
pub struct Collector {
    sys: System,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );
        Collector { sys }
    }

    fn memory(&mut self) -> MemoryReading {
        self.sys.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());
        MemoryReading {
            free_bytes: self.sys.free_memory(),
            total_bytes: self.sys.total_memory(),
        }
    }
}

impl TickSource for Collector {
    fn capture(&mut self) -> Result<TickSnapshot, AcquisitionError> {
        let _span = tracing::trace_span!("collector.capture").entered();

        let instant = Instant::now();
        let cores = platform::core_ticks()?;
        let memory = self.memory();
        TickSnapshot::new(instant, unix_millis(), cores, memory)
    }
}

/// Milliseconds since the Unix epoch, saturating to zero for clocks set
/// before 1970.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
