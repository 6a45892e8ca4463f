use indexmap::IndexMap;

use super::diff::Call;

/// All calls between one caller service and one callee service.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source_service: String,
    pub target_service: String,
    pub calls: Vec<Call>,
}

impl Edge {
    pub fn new(source_service: impl Into<String>, target_service: impl Into<String>) -> Self {
        Edge {
            source_service: source_service.into(),
            target_service: target_service.into(),
            calls: Vec::new(),
        }
    }

    pub fn add_call(&mut self, call: Call) {
        self.calls.push(call);
    }
}

/// `source service -> target service -> edge`, iterated in the order each
/// service pair was first seen.
pub type EdgeMap = IndexMap<String, IndexMap<String, Edge>>;

/// Group classified calls by service pair, keeping their order within an edge.
pub fn build_edge_map(calls: impl IntoIterator<Item = Call>) -> EdgeMap {
    let mut edges = EdgeMap::new();
    for call in calls {
        let source = call.source.service.clone();
        let target = call.target.service.clone();
        edges
            .entry(source.clone())
            .or_default()
            .entry(target.clone())
            .or_insert_with(|| Edge::new(source, target))
            .add_call(call);
    }
    edges
}
