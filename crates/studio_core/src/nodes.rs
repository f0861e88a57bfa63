use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub node_type: String,
    pub title: String,
    pub version: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

/// Node templates keyed by node type.
pub type NodeTemplates = BTreeMap<String, NodeTemplate>;

/// Lifecycle of the schema request that produces node templates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SchemaStatus {
    #[default]
    Idle,
    Pending,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeTemplatesState {
    pub templates: NodeTemplates,
    pub status: SchemaStatus,
}

impl NodeTemplatesState {
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
