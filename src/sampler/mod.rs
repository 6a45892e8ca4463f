//! Continuous CPU utilization sampler.
//!
//! A [`Sampler`] walks `Idle -> Running -> Stopping -> Stopped`. `start`
//! captures the baseline snapshot, every [`Sampler::on_tick`] diffs a fresh
//! snapshot against the previous one and appends one record, and the run ends
//! after the first tick that observes a stop request. Failures take the same
//! `Stopping -> Stopped` path so the sink is always closed.

pub mod error;
pub mod record;
pub mod sink;
pub mod ticker;
pub mod utilization;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub use error::{SamplerError, UsageError};
pub use record::ResultRecord;
pub use sink::{CsvLogSink, OutputSink};
pub use ticker::{IntervalTicker, Ticker};
pub use utilization::{Utilization, busy_percent, compute_utilization};

use crate::system::{TickSnapshot, TickSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub records: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
struct Control {
    started: AtomicBool,
    stop_requested: AtomicBool,
}

/// Requests a stop from outside the tick loop. Cheap to clone and safe to
/// use from another task or thread.
#[derive(Clone, Debug)]
pub struct StopHandle {
    control: Arc<Control>,
}

impl StopHandle {
    /// Ask the sampler to stop after the tick that is currently scheduled.
    /// The pending tick still runs and records its result.
    pub fn stop(&self) -> Result<(), UsageError> {
        if !self.control.started.load(Ordering::Acquire) {
            return Err(UsageError::StopBeforeStart);
        }
        self.control.stop_requested.store(true, Ordering::Release);
        Ok(())
    }

    pub fn is_stop_requested(&self) -> bool {
        self.control.stop_requested.load(Ordering::Acquire)
    }
}

pub struct Sampler<S, K> {
    source: S,
    sink: K,
    state: SamplerState,
    previous: Option<TickSnapshot>,
    control: Arc<Control>,
    records: u64,
    started_at: Option<Instant>,
}

impl<S: TickSource, K: OutputSink> Sampler<S, K> {
    pub fn new(source: S, sink: K) -> Self {
        Sampler {
            source,
            sink,
            state: SamplerState::Idle,
            previous: None,
            control: Arc::new(Control::default()),
            records: 0,
            started_at: None,
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            control: Arc::clone(&self.control),
        }
    }

    pub fn stop(&self) -> Result<(), UsageError> {
        self.stop_handle().stop()
    }

    /// Capture the baseline snapshot and enter `Running`. The baseline
    /// produces no record.
    pub fn start(&mut self) -> Result<(), SamplerError> {
        if self.state != SamplerState::Idle {
            return Err(UsageError::AlreadyStarted.into());
        }
        self.state = SamplerState::Running;
        self.started_at = Some(Instant::now());
        self.control.started.store(true, Ordering::Release);

        match self.source.capture() {
            Ok(baseline) => {
                tracing::info!(cores = baseline.core_count(), "sampler started");
                self.previous = Some(baseline);
                Ok(())
            }
            Err(err) => Err(self.abort(err.into())),
        }
    }

    /// Run one tick: capture, diff against the previous snapshot, append the
    /// record and keep the new snapshot. Closes the sink and reports
    /// [`TickOutcome::Stopped`] once a stop was requested.
    pub fn on_tick(&mut self) -> Result<TickOutcome, SamplerError> {
        if self.state != SamplerState::Running {
            return Err(UsageError::NotRunning.into());
        }

        if let Err(err) = self.sample() {
            return Err(self.abort(err));
        }

        if self.control.stop_requested.load(Ordering::Acquire) {
            self.state = SamplerState::Stopping;
            self.finish()?;
            tracing::info!(records = self.records, "sampler stopped");
            return Ok(TickOutcome::Stopped);
        }
        Ok(TickOutcome::Continue)
    }

    /// Drive ticks until a stop request or a fatal error. The first tick
    /// happens one full wait after `start`.
    pub async fn run<T: Ticker>(&mut self, ticker: &mut T) -> Result<RunSummary, SamplerError> {
        if self.state != SamplerState::Running {
            return Err(UsageError::NotRunning.into());
        }

        loop {
            ticker.wait().await;
            if self.on_tick()? == TickOutcome::Stopped {
                break;
            }
        }

        Ok(RunSummary {
            records: self.records,
            elapsed: self.started_at.map(|t| t.elapsed()).unwrap_or_default(),
        })
    }

    fn sample(&mut self) -> Result<(), SamplerError> {
        let current = self.source.capture()?;
        let previous = self.previous.as_ref().ok_or(UsageError::NotRunning)?;
        current.ensure_same_topology(previous)?;

        let record = ResultRecord::new(&current, compute_utilization(previous, &current));
        self.sink.append(&record)?;
        self.records += 1;
        tracing::debug!(
            timestamp = record.timestamp,
            aggregate = record.aggregate_percent,
            "tick recorded"
        );

        self.previous = Some(current);
        Ok(())
    }

    /// `Stopping -> Stopped`: release the snapshot and close the sink.
    fn finish(&mut self) -> Result<(), SamplerError> {
        self.previous = None;
        let closed = self.sink.close();
        self.state = SamplerState::Stopped;
        closed.map_err(SamplerError::from)
    }

    fn abort(&mut self, err: SamplerError) -> SamplerError {
        tracing::error!(error = %err, "sampling run failed");
        self.state = SamplerState::Stopping;
        if let Err(close_err) = self.finish() {
            tracing::warn!(error = %close_err, "closing the log after a failure also failed");
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use super::*;
    use crate::system::{AcquisitionError, CoreTicks, MemoryReading};

    struct Scripted(VecDeque<Result<Vec<CoreTicks>, AcquisitionError>>);

    impl Scripted {
        fn ticks(frames: &[&[(u64, u64)]]) -> Self {
            Scripted(
                frames
                    .iter()
                    .map(|f| Ok(f.iter().map(|&(i, t)| CoreTicks::new(i, t)).collect()))
                    .collect(),
            )
        }
    }

    impl TickSource for Scripted {
        fn capture(&mut self) -> Result<TickSnapshot, AcquisitionError> {
            let cores = self.0.pop_front().unwrap_or(Err(AcquisitionError::NoCores))?;
            TickSnapshot::new(Instant::now(), 0, cores, MemoryReading::default())
        }
    }

    #[derive(Default)]
    struct VecSink {
        lines: Vec<String>,
        closed: bool,
        fail_appends: bool,
    }

    impl OutputSink for VecSink {
        fn append(&mut self, record: &ResultRecord) -> io::Result<()> {
            if self.closed || self.fail_appends {
                return Err(io::Error::other("sink unavailable"));
            }
            self.lines.push(record.to_string());
            Ok(())
        }

        fn close(&mut self) -> io::Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    #[test]
    fn baseline_produces_no_record() {
        let mut sampler = Sampler::new(Scripted::ticks(&[&[(0, 0)]]), VecSink::default());
        sampler.start().unwrap();
        assert_eq!(sampler.state(), SamplerState::Running);
        assert!(sampler.sink().lines.is_empty());
    }

    #[test]
    fn tick_records_then_stop_closes_sink() {
        let source = Scripted::ticks(&[&[(0, 0)], &[(50, 100)], &[(60, 200)]]);
        let mut sampler = Sampler::new(source, VecSink::default());
        sampler.start().unwrap();

        assert_eq!(sampler.on_tick().unwrap(), TickOutcome::Continue);
        sampler.stop().unwrap();
        assert_eq!(sampler.on_tick().unwrap(), TickOutcome::Stopped);

        assert_eq!(sampler.state(), SamplerState::Stopped);
        assert!(sampler.sink().closed);
        assert_eq!(sampler.sink().lines.len(), 2);
        assert!(sampler.sink().lines[0].starts_with("0,50.00,"));
        assert!(sampler.sink().lines[1].starts_with("0,90.00,"));
    }

    #[test]
    fn double_start_is_a_usage_error() {
        let mut sampler = Sampler::new(Scripted::ticks(&[&[(0, 0)]]), VecSink::default());
        sampler.start().unwrap();
        let err = sampler.start().unwrap_err();
        assert!(matches!(err, SamplerError::Usage(UsageError::AlreadyStarted)));
    }

    #[test]
    fn stop_before_start_is_a_usage_error() {
        let sampler = Sampler::new(Scripted::ticks(&[]), VecSink::default());
        assert_eq!(sampler.stop(), Err(UsageError::StopBeforeStart));
        assert!(!sampler.stop_handle().is_stop_requested());
    }

    #[test]
    fn tick_before_start_is_rejected() {
        let mut sampler = Sampler::new(Scripted::ticks(&[]), VecSink::default());
        let err = sampler.on_tick().unwrap_err();
        assert!(matches!(err, SamplerError::Usage(UsageError::NotRunning)));
    }

    #[test]
    fn core_count_change_is_fatal_and_closes_sink() {
        let source = Scripted::ticks(&[&[(0, 0), (0, 0)], &[(1, 10)]]);
        let mut sampler = Sampler::new(source, VecSink::default());
        sampler.start().unwrap();

        let err = sampler.on_tick().unwrap_err();
        assert!(matches!(
            err,
            SamplerError::Acquisition(AcquisitionError::CoreCountChanged {
                expected: 2,
                found: 1
            })
        ));
        assert_eq!(sampler.state(), SamplerState::Stopped);
        assert!(sampler.sink().closed);
        assert!(sampler.sink().lines.is_empty());
    }

    #[test]
    fn failed_baseline_stops_the_run() {
        let mut sampler = Sampler::new(Scripted::ticks(&[]), VecSink::default());
        let err = sampler.start().unwrap_err();
        assert!(matches!(err, SamplerError::Acquisition(AcquisitionError::NoCores)));
        assert_eq!(sampler.state(), SamplerState::Stopped);
        assert!(sampler.sink().closed);
    }

    #[test]
    fn sink_failure_is_fatal() {
        let source = Scripted::ticks(&[&[(0, 0)], &[(5, 10)]]);
        let sink = VecSink {
            fail_appends: true,
            ..VecSink::default()
        };
        let mut sampler = Sampler::new(source, sink);
        sampler.start().unwrap();
        assert!(matches!(sampler.on_tick(), Err(SamplerError::Sink(_))));
        assert_eq!(sampler.state(), SamplerState::Stopped);
        assert!(matches!(
            sampler.on_tick(),
            Err(SamplerError::Usage(UsageError::NotRunning))
        ));
    }
}
