use super::PlatformExtensions;
use crate::system::error::AcquisitionError;
use crate::system::snapshot::CoreTicks;

const PROC_STAT: &str = "/proc/stat";

pub struct Platform;

impl PlatformExtensions for Platform {
    fn core_ticks() -> Result<Vec<CoreTicks>, AcquisitionError> {
        let contents = std::fs::read_to_string(PROC_STAT)?;
        parse_proc_stat(&contents)
    }
}

/// Parse the per-core `cpuN` lines of `/proc/stat`.
///
/// Fields after the label: user nice system idle iowait irq softirq steal
/// guest guest_nice. Only user, nice, system, idle and irq are counted, so
/// iowait, softirq and steal affect neither the idle nor the total ticks.
pub fn parse_proc_stat(contents: &str) -> Result<Vec<CoreTicks>, AcquisitionError> {
    let mut cores: Vec<(usize, CoreTicks)> = Vec::new();

    for line in contents.lines() {
        let mut fields = line.split_whitespace();
        let Some(label) = fields.next() else {
            continue;
        };
        // The aggregate "cpu" line is recomputed from the cores.
        let Some(index) = label.strip_prefix("cpu").filter(|s| !s.is_empty()) else {
            continue;
        };
        let index: usize = index
            .parse()
            .map_err(|_| AcquisitionError::Parse(format!("bad core label `{label}`")))?;

        let values = fields
            .take(8)
            .map(|v| {
                v.parse::<u64>()
                    .map_err(|_| AcquisitionError::Parse(format!("bad counter `{v}` on {label}")))
            })
            .collect::<Result<Vec<u64>, _>>()?;
        if values.len() < 4 {
            return Err(AcquisitionError::Parse(format!(
                "{label} has {} counters, expected at least 4",
                values.len()
            )));
        }

        let field = |i: usize| values.get(i).copied().unwrap_or(0);
        let idle = field(3);
        let total = field(0) + field(1) + field(2) + idle + field(5);
        cores.push((index, CoreTicks::new(idle, total)));
    }

    if cores.is_empty() {
        return Err(AcquisitionError::NoCores);
    }
    cores.sort_by_key(|(index, _)| *index);
    Ok(cores.into_iter().map(|(_, ticks)| ticks).collect())
}
