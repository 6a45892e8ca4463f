use crate::format::round2;
use crate::system::TickSnapshot;

/// Percentages derived from two consecutive snapshots.
#[derive(Clone, Debug, PartialEq)]
pub struct Utilization {
    pub aggregate_percent: f64,
    pub per_core_percent: Vec<f64>,
}

/// Busy share of an interval, `100 * (1 - idle/total)`, rounded to two
/// decimals. A zero total delta means no progress and yields `0.0`.
///
/// Results are not clamped: counter skew can push a reading slightly below
/// 0 or above 100 and it is passed through as measured.
pub fn busy_percent(idle_delta: f64, total_delta: f64) -> f64 {
    if total_delta == 0.0 {
        return 0.0;
    }
    round2(100.0 - 100.0 * idle_delta / total_delta)
}

/// Signed integer difference, converted to f64 only after subtracting so
/// the result is independent of the absolute counter values.
fn tick_delta(before: u128, after: u128) -> f64 {
    if after >= before {
        (after - before) as f64
    } else {
        -((before - after) as f64)
    }
}

/// Derive aggregate and per-core utilization between `previous` and `current`.
///
/// Both snapshots must describe the same cores; the sampler checks this with
/// [`TickSnapshot::ensure_same_topology`] before calling.
pub fn compute_utilization(previous: &TickSnapshot, current: &TickSnapshot) -> Utilization {
    debug_assert_eq!(previous.core_count(), current.core_count());

    let aggregate_percent = busy_percent(
        tick_delta(previous.aggregate_idle_ticks, current.aggregate_idle_ticks),
        tick_delta(previous.aggregate_total_ticks, current.aggregate_total_ticks),
    );

    let per_core_percent = previous
        .cores
        .iter()
        .zip(&current.cores)
        .map(|(before, after)| {
            busy_percent(
                tick_delta(before.idle_ticks.into(), after.idle_ticks.into()),
                tick_delta(before.total_ticks.into(), after.total_ticks.into()),
            )
        })
        .collect();

    Utilization {
        aggregate_percent,
        per_core_percent,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::system::{CoreTicks, MemoryReading};

    fn snap(cores: &[(u64, u64)]) -> TickSnapshot {
        let cores = cores.iter().map(|&(i, t)| CoreTicks::new(i, t)).collect();
        TickSnapshot::new(Instant::now(), 0, cores, MemoryReading::default()).unwrap()
    }

    #[test]
    fn two_core_interval() {
        let before = snap(&[(1_000, 5_000), (2_000, 6_000)]);
        let after = snap(&[(1_020, 5_100), (2_030, 6_100)]);
        let u = compute_utilization(&before, &after);
        assert_eq!(u.per_core_percent, vec![80.0, 70.0]);
        // aggregate: idle delta 50, total delta 200
        assert_eq!(u.aggregate_percent, 75.0);
    }

    #[test]
    fn aggregate_ignores_counter_magnitude() {
        let deltas = [
            (2931, 2581),
            (6814, 3080),
            (9445, 5058),
            (2234, 7396),
            (5206, 1230),
            (8016, 3375),
            (4214, 1746),
        ];
        let at = |offset: u64| {
            let before: Vec<(u64, u64)> = deltas.iter().map(|_| (offset, offset * 2)).collect();
            let after: Vec<(u64, u64)> = deltas
                .iter()
                .map(|&(idle, busy)| (offset + idle, offset * 2 + idle + busy))
                .collect();
            compute_utilization(&snap(&before), &snap(&after)).aggregate_percent
        };
        assert_eq!(at(0), at(609_700_000_001));
        assert_eq!(at(0), 38.63);
    }

    #[test]
    fn counters_moving_backwards_give_negative_deltas() {
        assert_eq!(tick_delta(10, 4), -6.0);
        assert_eq!(tick_delta(4, 10), 6.0);
    }

    #[test]
    fn zero_total_delta_is_zero_percent() {
        let s = snap(&[(10, 100), (10, 100)]);
        let u = compute_utilization(&s, &s.clone());
        assert_eq!(u.aggregate_percent, 0.0);
        assert_eq!(u.per_core_percent, vec![0.0, 0.0]);
    }

    #[test]
    fn skewed_counters_are_not_clamped() {
        // idle advanced more than total
        assert_eq!(busy_percent(110.0, 100.0), -10.0);
        assert_eq!(busy_percent(-5.0, 100.0), 105.0);
    }

    #[test]
    fn fully_busy_and_fully_idle() {
        assert_eq!(busy_percent(0.0, 250.0), 100.0);
        assert_eq!(busy_percent(250.0, 250.0), 0.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 100 - 100/3 = 66.666...
        assert_eq!(busy_percent(1.0, 3.0), 66.67);
    }
}
