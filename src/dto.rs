//! Request and response bodies of the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::node;
use crate::error::TreeError;
use crate::validation::{ValidateMaxLength, ValidateNonEmpty, MAX_LABEL_LENGTH};

/// Body of `POST /nodes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCreateRequest {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ancestor_id: Option<Uuid>,
}

impl NodeCreateRequest {
    pub fn validate(&self) -> Result<(), TreeError> {
        validate_labels(&self.title, &self.node_type)
    }
}

/// Body of `PUT /nodes/:id`. A missing `description` keeps the stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeUpdateRequest {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NodeUpdateRequest {
    pub fn validate(&self) -> Result<(), TreeError> {
        validate_labels(&self.title, &self.node_type)
    }
}

/// Body of `POST /nodes/:id/move`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMoveRequest {
    #[serde(default)]
    pub to_ancestor_id: Option<Uuid>,
}

impl NodeMoveRequest {
    /// The validated target id.
    pub fn target(&self) -> Result<Uuid, TreeError> {
        self.to_ancestor_id
            .ok_or_else(|| TreeError::validation("to_ancestor_id is required"))
    }
}

fn validate_labels(title: &str, node_type: &str) -> Result<(), TreeError> {
    title.validate_non_empty("title")?;
    title.validate_max_length("title", MAX_LABEL_LENGTH)?;
    node_type.validate_non_empty("type")?;
    node_type.validate_max_length("type", MAX_LABEL_LENGTH)?;
    Ok(())
}

/// Payload returned by `POST /nodes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCreatedResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<node::Model> for NodeCreatedResponse {
    fn from(model: node::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            node_type: model.node_type,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

/// Node payload used by the detail, update and list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<node::Model> for NodeResponse {
    fn from(model: node::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            node_type: model.node_type,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub fn node_list(models: Vec<node::Model>) -> Vec<NodeResponse> {
    models.into_iter().map(NodeResponse::from).collect()
}

/// `{success, message, data?}` envelope wrapping every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}
