use std::time::{Duration, Instant};

use super::edges::EdgeMap;
use super::model::EndpointRef;

const STRATEGY_COUNT: u32 = 12;

/// Numeric ranking strategy selector; raw identifiers wrap modulo the number
/// of known strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrategyId(u32);

impl StrategyId {
    pub fn from_raw(raw: u32) -> Self {
        StrategyId(raw % STRATEGY_COUNT)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = StrategyId> {
        (0..STRATEGY_COUNT).map(StrategyId)
    }
}

/// External ranking collaborator fed with the classified edge map.
pub trait RankingAlgorithm {
    type Ranking;

    fn rank(
        &mut self,
        strategy: StrategyId,
        edges: &EdgeMap,
        endpoints: &[EndpointRef],
        target_service: &str,
    ) -> Self::Ranking;
}

#[derive(Debug)]
pub struct TimedRanking<R> {
    pub ranking: R,
    pub runtime: Duration,
}

/// Run one ranking pass and measure only the algorithm itself.
pub fn rank_timed<A: RankingAlgorithm>(
    algorithm: &mut A,
    strategy: StrategyId,
    edges: &EdgeMap,
    endpoints: &[EndpointRef],
    target_service: &str,
) -> TimedRanking<A::Ranking> {
    let started = Instant::now();
    let ranking = algorithm.rank(strategy, edges, endpoints, target_service);
    let runtime = started.elapsed();
    tracing::debug!(strategy = strategy.get(), ?runtime, "ranking finished");
    TimedRanking { ranking, runtime }
}
