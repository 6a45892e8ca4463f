use std::path::Path;

use serde::Deserialize;

use super::GraphError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct EndpointRef {
    pub service: String,
    pub version: String,
    #[serde(default)]
    pub endpoint: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CallStats {
    pub critical: bool,
    #[serde(rename = "maxDeviation")]
    pub max_deviation: f64,
}

/// Entry of the three structural diff lists (added/removed calls).
#[derive(Clone, Debug, Deserialize)]
pub struct StandardEntry {
    pub source: EndpointRef,
    pub target: EndpointRef,
}

/// Entry of the four lists that compare against a previous measurement.
#[derive(Clone, Debug, Deserialize)]
pub struct ComparableEntry {
    pub source: EndpointRef,
    pub target: EndpointRef,
    #[serde(rename = "oldSourceVersion", default)]
    pub old_source_version: Option<String>,
    #[serde(rename = "oldTargetVersion", default)]
    pub old_target_version: Option<String>,
    pub stats: CallStats,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct InteractionGraph {
    pub calling_new_ep: Vec<StandardEntry>,
    pub calling_ex_ep: Vec<StandardEntry>,
    pub removing: Vec<StandardEntry>,
    pub common: Vec<ComparableEntry>,
    pub updated_caller: Vec<ComparableEntry>,
    pub updated_callee: Vec<ComparableEntry>,
    pub updated_version: Vec<ComparableEntry>,
}

impl InteractionGraph {
    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, GraphError> {
        Self::from_json_str(&read(path)?)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceRef {
    pub service: String,
    pub version: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiffSummary {
    pub added_services: Vec<ServiceRef>,
    pub deleted_services: Vec<ServiceRef>,
    pub added_versions: Vec<ServiceRef>,
    pub deleted_versions: Vec<ServiceRef>,
    pub added_endpoints: Vec<EndpointRef>,
    pub deleted_endpoints: Vec<EndpointRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EndpointSummary {
    pub diff_summary: DiffSummary,
    pub endpoints: Vec<EndpointRef>,
}

impl EndpointSummary {
    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, GraphError> {
        Self::from_json_str(&read(path)?)
    }
}

fn read(path: &Path) -> Result<String, GraphError> {
    std::fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.display().to_string(),
        source,
    })
}
