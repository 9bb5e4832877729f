//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::file::{ParentRef, RequestedParent, UploadRequest};

/// A node ID sent either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NodeIdParam {
    /// `42`
    Number(i64),
    /// `"42"`
    Text(String),
}

impl NodeIdParam {
    /// Resolve to a parent reference; `0` is the root.
    ///
    /// Text that is not a number cannot name any folder.
    pub fn to_parent(&self) -> RequestedParent {
        match self {
            NodeIdParam::Number(id) => ParentRef::from_wire(*id).into(),
            NodeIdParam::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_or(RequestedParent::Unknown, |id| ParentRef::from_wire(id).into()),
        }
    }
}

/// Upload request body.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadBody {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// `folder`, `file` or `image`.
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,
    /// Parent folder ID; `0` or absent for the root.
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub parent_id: Option<NodeIdParam>,
    /// Initial visibility (default `false`).
    #[serde(default)]
    pub is_public: Option<bool>,
    /// Base64-encoded content, required unless `type` is `folder`.
    #[serde(default)]
    pub data: Option<String>,
}

impl UploadBody {
    /// Convert into a service request.
    ///
    /// Nothing is rejected here; the parent is resolved after the other
    /// fields have been checked.
    pub fn into_request(self) -> UploadRequest {
        let parent = self
            .parent_id
            .as_ref()
            .map_or_else(RequestedParent::default, NodeIdParam::to_parent);

        UploadRequest {
            name: self.name,
            node_type: self.node_type,
            parent,
            is_public: self.is_public.unwrap_or(false),
            data: self.data,
        }
    }
}

/// Query parameters for listing nodes.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Parent folder ID; `0` or absent for the root.
    pub parent_id: Option<String>,
    /// Zero-based page number.
    pub page: Option<String>,
}

impl ListQuery {
    /// Parent to list, or `None` when the value cannot name any folder.
    pub fn parent(&self) -> Option<ParentRef> {
        match self.parent_id.as_deref().map(str::trim) {
            None | Some("") => Some(ParentRef::Root),
            Some(text) => text.parse::<i64>().ok().map(ParentRef::from_wire),
        }
    }

    /// Page number; anything unparseable is page 0.
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(0)
    }
}

/// Query parameters for reading content.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContentQuery {
    /// Thumbnail width: 100, 250 or 500.
    pub size: Option<String>,
}
