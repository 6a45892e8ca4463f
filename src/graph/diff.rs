use std::fmt;

use super::GraphError;
use super::model::{CallStats, ComparableEntry, EndpointRef, InteractionGraph, StandardEntry};

/// Relative tolerance around a deviation boundary.
pub const DEVIATION_BOUNDARY: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiffKind {
    AddCallToNewService,
    AddCallToExistingEndpoint,
    RemoveCall,
    CommonUnchanged,
    CallerVersionUpdated,
    CalleeVersionUpdated,
    BothVersionsUpdated,
}

impl DiffKind {
    pub const ALL: [DiffKind; 7] = [
        DiffKind::AddCallToNewService,
        DiffKind::AddCallToExistingEndpoint,
        DiffKind::RemoveCall,
        DiffKind::CommonUnchanged,
        DiffKind::CallerVersionUpdated,
        DiffKind::CalleeVersionUpdated,
        DiffKind::BothVersionsUpdated,
    ];

    /// Key of the list holding this kind in the interaction-graph JSON.
    pub fn json_key(self) -> &'static str {
        match self {
            DiffKind::AddCallToNewService => "calling_new_ep",
            DiffKind::AddCallToExistingEndpoint => "calling_ex_ep",
            DiffKind::RemoveCall => "removing",
            DiffKind::CommonUnchanged => "common",
            DiffKind::CallerVersionUpdated => "updated_caller",
            DiffKind::CalleeVersionUpdated => "updated_callee",
            DiffKind::BothVersionsUpdated => "updated_version",
        }
    }

    /// Kinds that carry response-time statistics from a previous version.
    pub fn is_comparable(self) -> bool {
        !matches!(
            self,
            DiffKind::AddCallToNewService
                | DiffKind::AddCallToExistingEndpoint
                | DiffKind::RemoveCall
        )
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_key())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparison {
    pub critical: bool,
    pub max_deviation: f64,
}

impl Comparison {
    pub fn is_deviation_within_boundary(&self, boundary: f64) -> bool {
        let buffer = boundary * DEVIATION_BOUNDARY;
        boundary - buffer <= self.max_deviation && self.max_deviation <= boundary + buffer
    }
}

impl From<&CallStats> for Comparison {
    fn from(stats: &CallStats) -> Self {
        Comparison {
            critical: stats.critical,
            max_deviation: stats.max_deviation,
        }
    }
}

/// One classified caller/callee interaction.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub kind: DiffKind,
    pub source: EndpointRef,
    pub target: EndpointRef,
    pub old_source_version: Option<String>,
    pub old_target_version: Option<String>,
    /// Present exactly for comparable kinds.
    pub comparison: Option<Comparison>,
}

impl Call {
    fn structural(kind: DiffKind, entry: &StandardEntry) -> Self {
        Call {
            kind,
            source: entry.source.clone(),
            target: entry.target.clone(),
            old_source_version: None,
            old_target_version: None,
            comparison: None,
        }
    }

    fn comparable(kind: DiffKind, entry: &ComparableEntry) -> Result<Self, GraphError> {
        let needs_source = matches!(
            kind,
            DiffKind::CallerVersionUpdated | DiffKind::BothVersionsUpdated
        );
        let needs_target = matches!(
            kind,
            DiffKind::CalleeVersionUpdated | DiffKind::BothVersionsUpdated
        );

        let old_source_version = if needs_source {
            Some(required(kind, &entry.old_source_version, "oldSourceVersion")?)
        } else {
            None
        };
        let old_target_version = if needs_target {
            Some(required(kind, &entry.old_target_version, "oldTargetVersion")?)
        } else {
            None
        };

        Ok(Call {
            kind,
            source: entry.source.clone(),
            target: entry.target.clone(),
            old_source_version,
            old_target_version,
            comparison: Some(Comparison::from(&entry.stats)),
        })
    }
}

fn required(
    kind: DiffKind,
    value: &Option<String>,
    field: &'static str,
) -> Result<String, GraphError> {
    value
        .clone()
        .ok_or(GraphError::MissingVersion { kind, field })
}

/// Classify every entry of `graph`, list by list in [`DiffKind::ALL`] order.
pub fn classify(graph: &InteractionGraph) -> Result<Vec<Call>, GraphError> {
    let mut calls = Vec::new();

    let structural = [
        (DiffKind::AddCallToNewService, &graph.calling_new_ep),
        (DiffKind::AddCallToExistingEndpoint, &graph.calling_ex_ep),
        (DiffKind::RemoveCall, &graph.removing),
    ];
    for (kind, entries) in structural {
        calls.extend(entries.iter().map(|e| Call::structural(kind, e)));
    }

    let comparable = [
        (DiffKind::CommonUnchanged, &graph.common),
        (DiffKind::CallerVersionUpdated, &graph.updated_caller),
        (DiffKind::CalleeVersionUpdated, &graph.updated_callee),
        (DiffKind::BothVersionsUpdated, &graph.updated_version),
    ];
    for (kind, entries) in comparable {
        for entry in entries {
            calls.push(Call::comparable(kind, entry)?);
        }
    }

    Ok(calls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_tolerance_is_five_percent() {
        let within = Comparison {
            critical: true,
            max_deviation: 104.0,
        };
        assert!(within.is_deviation_within_boundary(100.0));
        let outside = Comparison {
            critical: true,
            max_deviation: 94.0,
        };
        assert!(!outside.is_deviation_within_boundary(100.0));
    }

    #[test]
    fn comparable_kinds() {
        let comparable: Vec<_> = DiffKind::ALL.iter().filter(|k| k.is_comparable()).collect();
        assert_eq!(comparable.len(), 4);
        assert!(!DiffKind::RemoveCall.is_comparable());
    }

    #[test]
    fn display_uses_json_key() {
        assert_eq!(DiffKind::BothVersionsUpdated.to_string(), "updated_version");
    }
}
