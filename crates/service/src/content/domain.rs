use std::collections::BTreeMap;

use models::{content_block, service_entry, setting};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Blocks keyed by dotted path, in key order.
pub type BlockMap = BTreeMap<String, BlockView>;
/// Settings keyed by name, in key order.
pub type SettingMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockView {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<content_block::Model> for BlockView {
    fn from(m: content_block::Model) -> Self {
        Self { value: m.value, kind: m.kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub emphasis: String,
    pub order_index: i32,
}

impl From<service_entry::Model> for ServiceRecord {
    fn from(m: service_entry::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            emphasis: m.emphasis,
            order_index: m.order_index,
        }
    }
}

/// Everything the public page needs in one read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSnapshot {
    pub blocks: BlockMap,
    pub services: Vec<ServiceRecord>,
    pub settings: SettingMap,
}

pub fn block_map(rows: Vec<content_block::Model>) -> BlockMap {
    rows.into_iter().map(|m| (m.key.clone(), BlockView::from(m))).collect()
}

pub fn setting_map(rows: Vec<setting::Model>) -> SettingMap {
    rows.into_iter().map(|m| (m.key, m.value)).collect()
}

/// Service body as received from a client. Missing text fields arrive empty
/// and are rejected by [`ServiceInput::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub emphasis: Option<String>,
    #[serde(default)]
    pub order_index: Option<i32>,
}

/// A service body that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFields {
    pub title: String,
    pub description: String,
    pub emphasis: String,
    pub order_index: i32,
}

impl ServiceInput {
    pub fn validate(self) -> Result<ServiceFields, ServiceError> {
        service_entry::validate_title(&self.title)?;
        service_entry::validate_description(&self.description)?;
        Ok(ServiceFields {
            title: self.title,
            description: self.description,
            emphasis: self.emphasis.unwrap_or_default(),
            order_index: self.order_index.unwrap_or(0),
        })
    }
}
