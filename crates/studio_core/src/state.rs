use serde::{Deserialize, Serialize};

use crate::{ApiState, NodeTemplatesState, QueryKey, QueueAndProcessorStatus};

/// Feature areas of the studio UI, named as the backend config names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    #[serde(rename = "txt2img")]
    TextToImage,
    #[serde(rename = "img2img")]
    ImageToImage,
    #[serde(rename = "unifiedCanvas")]
    UnifiedCanvas,
    #[serde(rename = "nodes")]
    Nodes,
    #[serde(rename = "modelManager")]
    ModelManager,
    #[serde(rename = "queue")]
    Queue,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigState {
    pub disabled_tabs: Vec<Tab>,
}

impl ConfigState {
    pub fn is_tab_disabled(&self, tab: Tab) -> bool {
        self.disabled_tabs.contains(&tab)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemState {
    pub is_connected: bool,
}

/// Everything the client keeps in memory. Only [`crate::update`] mutates it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub system: SystemState,
    pub config: ConfigState,
    pub node_templates: NodeTemplatesState,
    pub api: ApiState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConfigState) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Last known queue status, regardless of staleness.
    pub fn queue_status(&self) -> Option<&QueueAndProcessorStatus> {
        self.api
            .data(&QueryKey::QueueStatus)
            .and_then(|data| data.as_queue_status())
    }
}
