//! Call-graph diff boundary consumed by the ranking driver.
//!
//! Loads the interaction graph and endpoint summary JSON, classifies every
//! entry into a [`DiffKind`] and groups the resulting calls per
//! caller/callee service pair. Ranking itself is an external collaborator
//! behind [`RankingAlgorithm`].

pub mod diff;
pub mod edges;
pub mod model;
pub mod ranking;

use std::io;

use thiserror::Error;

pub use diff::{Call, Comparison, DEVIATION_BOUNDARY, DiffKind, classify};
pub use edges::{Edge, EdgeMap, build_edge_map};
pub use model::{EndpointRef, EndpointSummary, InteractionGraph};
pub use ranking::{RankingAlgorithm, StrategyId, TimedRanking, rank_timed};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed graph JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{kind} entry is missing `{field}`")]
    MissingVersion {
        kind: DiffKind,
        field: &'static str,
    },
}
