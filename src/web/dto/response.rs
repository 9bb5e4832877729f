//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::db::User;
use crate::file::FileNode;

/// A node as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeResponse {
    /// Node ID.
    pub id: i64,
    /// Owner ID.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// `folder`, `file` or `image`.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Whether the content can be read anonymously.
    pub is_public: bool,
    /// Parent folder ID; `0` for the root.
    pub parent_id: i64,
    /// Blob path; absent for folders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

impl From<FileNode> for NodeResponse {
    fn from(node: FileNode) -> Self {
        Self {
            id: node.id,
            user_id: node.owner_id,
            name: node.name,
            node_type: node.node_type.as_str().to_string(),
            is_public: node.is_public,
            parent_id: node.parent.to_wire(),
            local_path: node.local_path,
        }
    }
}

/// Session token response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Opaque bearer token, sent back as `X-Token`.
    pub token: String,
}

/// Backend reachability.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Whether the session cache answers.
    pub redis: bool,
    /// Whether the document store answers.
    pub db: bool,
}

/// Record counts.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Number of users.
    pub users: i64,
    /// Number of nodes.
    pub files: i64,
}

/// The authenticated user.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    /// User ID.
    pub id: i64,
    /// Login email.
    pub email: String,
}

impl From<User> for MeResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{NodeType, ParentRef};

    #[test]
    fn test_node_response_wire_shape() {
        let node = FileNode {
            id: 7,
            owner_id: 3,
            name: "cat.png".to_string(),
            node_type: NodeType::Image,
            parent: ParentRef::Root,
            is_public: true,
            local_path: Some("/data/ab/abc".to_string()),
        };

        let json = serde_json::to_value(NodeResponse::from(node)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["userId"], 3);
        assert_eq!(json["type"], "image");
        assert_eq!(json["isPublic"], true);
        assert_eq!(json["parentId"], 0);
        assert_eq!(json["localPath"], "/data/ab/abc");
    }

    #[test]
    fn test_folder_omits_local_path() {
        let node = FileNode {
            id: 1,
            owner_id: 1,
            name: "dir".to_string(),
            node_type: NodeType::Folder,
            parent: ParentRef::Node(9),
            is_public: false,
            local_path: None,
        };

        let json = serde_json::to_value(NodeResponse::from(node)).unwrap();
        assert_eq!(json["parentId"], 9);
        assert!(json.get("localPath").is_none());
    }
}
