use std::time::Instant;

use super::error::AcquisitionError;

/// Cumulative counters for one core since boot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreTicks {
    pub idle_ticks: u64,
    pub total_ticks: u64,
}

impl CoreTicks {
    pub fn new(idle_ticks: u64, total_ticks: u64) -> Self {
        CoreTicks {
            idle_ticks,
            total_ticks,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryReading {
    pub free_bytes: u64,
    pub total_bytes: u64,
}

/// Raw tick counters of every core, captured at one instant.
///
/// Never mutated after construction; the sampler replaces its previous
/// snapshot with a fresh one on every tick.
#[derive(Clone, Debug)]
pub struct TickSnapshot {
    pub instant: Instant,
    /// Wall-clock capture time in milliseconds since the Unix epoch.
    pub unix_ms: u64,
    pub cores: Vec<CoreTicks>,
    /// Sum of the per-core idle counters. The core count cancels out of
    /// idle/total, so ratios over the sums equal the cross-core average.
    pub aggregate_idle_ticks: u128,
    /// Sum of the per-core total counters.
    pub aggregate_total_ticks: u128,
    pub memory: MemoryReading,
}

impl TickSnapshot {
    /// Build a snapshot from per-core counters. Aggregates are kept as exact
    /// integer sums so aggregate deltas never depend on counter magnitude.
    pub fn new(
        instant: Instant,
        unix_ms: u64,
        cores: Vec<CoreTicks>,
        memory: MemoryReading,
    ) -> Result<Self, AcquisitionError> {
        if cores.is_empty() {
            return Err(AcquisitionError::NoCores);
        }

        let idle_sum: u128 = cores.iter().map(|c| u128::from(c.idle_ticks)).sum();
        let total_sum: u128 = cores.iter().map(|c| u128::from(c.total_ticks)).sum();

        Ok(TickSnapshot {
            instant,
            unix_ms,
            cores,
            aggregate_idle_ticks: idle_sum,
            aggregate_total_ticks: total_sum,
            memory,
        })
    }

    pub fn core_count(&self) -> usize {
        self.cores.len()
    }

    /// Reject a snapshot whose core topology differs from `previous`.
    pub fn ensure_same_topology(&self, previous: &TickSnapshot) -> Result<(), AcquisitionError> {
        if self.core_count() != previous.core_count() {
            return Err(AcquisitionError::CoreCountChanged {
                expected: previous.core_count(),
                found: self.core_count(),
            });
        }
        Ok(())
    }
}
