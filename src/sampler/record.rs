use std::fmt;

use super::utilization::Utilization;
use crate::format::{bytes_to_mb, fixed2};
use crate::system::TickSnapshot;

/// One sampled interval, handed straight to the output sink.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRecord {
    /// Wall-clock capture time of the newer snapshot, ms since the Unix epoch.
    pub timestamp: u64,
    pub aggregate_percent: f64,
    pub free_memory_mb: f64,
    pub total_memory_mb: f64,
    pub per_core_percent: Vec<f64>,
}

impl ResultRecord {
    pub fn new(current: &TickSnapshot, utilization: Utilization) -> Self {
        ResultRecord {
            timestamp: current.unix_ms,
            aggregate_percent: utilization.aggregate_percent,
            free_memory_mb: bytes_to_mb(current.memory.free_bytes),
            total_memory_mb: bytes_to_mb(current.memory.total_bytes),
            per_core_percent: utilization.per_core_percent,
        }
    }
}

/// `timestamp,aggregate,freeMB,totalMB,core0,core1,...` without a newline.
impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.timestamp,
            fixed2(self.aggregate_percent),
            fixed2(self.free_memory_mb),
            fixed2(self.total_memory_mb)
        )?;
        for core in &self.per_core_percent {
            write!(f, ",{}", fixed2(*core))?;
        }
        Ok(())
    }
}
