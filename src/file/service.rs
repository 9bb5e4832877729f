//! File service for filevault.
//!
//! This module provides the operations the HTTP layer calls:
//! - Upload from a base64 payload
//! - Owner-scoped lookup, listing and publishing
//! - Content download with visibility checks and thumbnail variants

use tracing::debug;

use super::hierarchy::{CreateNode, FileHierarchy, NodeData, RequestedParent};
use super::node::{FileNode, ParentRef};
use super::storage::parse_variant;
use crate::{Result, VaultError};

/// Request data for an upload.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// Display name.
    pub name: Option<String>,
    /// Node type as sent by the client.
    pub node_type: Option<String>,
    /// Containing folder.
    pub parent: RequestedParent,
    /// Initial visibility.
    pub is_public: bool,
    /// Base64-encoded content.
    pub data: Option<String>,
}

/// Content of a node ready to be sent.
#[derive(Debug)]
pub struct NodeContent {
    /// The node the content belongs to.
    pub node: FileNode,
    /// Raw bytes.
    pub bytes: Vec<u8>,
    /// MIME type guessed from the node name.
    pub mime_type: String,
}

/// File service used by the web handlers.
#[derive(Clone)]
pub struct FileService {
    hierarchy: FileHierarchy,
}

impl FileService {
    /// Create a new FileService.
    pub fn new(hierarchy: FileHierarchy) -> Self {
        Self { hierarchy }
    }

    /// The underlying hierarchy.
    pub fn hierarchy(&self) -> &FileHierarchy {
        &self.hierarchy
    }

    /// Upload a node for `owner_id`.
    ///
    /// An empty `data` string counts as missing; anything that is not valid
    /// base64 is rejected as "Invalid data" once name and type have passed.
    pub async fn upload(&self, owner_id: i64, request: UploadRequest) -> Result<FileNode> {
        let content = request
            .data
            .filter(|d| !d.is_empty())
            .map(NodeData::Base64);

        self.hierarchy
            .create(
                owner_id,
                CreateNode {
                    name: request.name,
                    node_type: request.node_type,
                    parent: request.parent,
                    is_public: request.is_public,
                    content,
                },
            )
            .await
    }

    /// Get an owned node.
    pub async fn get(&self, node_id: i64, owner_id: i64) -> Result<FileNode> {
        self.hierarchy.get(node_id, owner_id).await
    }

    /// List one page of owned nodes under `parent`.
    pub async fn list(
        &self,
        owner_id: i64,
        parent: ParentRef,
        page: u32,
    ) -> Result<Vec<FileNode>> {
        self.hierarchy.list(owner_id, parent, page).await
    }

    /// Make an owned node public.
    pub async fn publish(&self, node_id: i64, owner_id: i64) -> Result<FileNode> {
        self.hierarchy.set_visibility(node_id, owner_id, true).await
    }

    /// Make an owned node private.
    pub async fn unpublish(&self, node_id: i64, owner_id: i64) -> Result<FileNode> {
        self.hierarchy.set_visibility(node_id, owner_id, false).await
    }

    /// Read the content of a node, or of one of its thumbnails.
    ///
    /// `requester` is `None` for anonymous callers. A private node that the
    /// requester does not own is reported as `NotFound`, the same as a
    /// missing node. Folders have no content.
    pub async fn content(
        &self,
        node_id: i64,
        requester: Option<i64>,
        size: Option<&str>,
    ) -> Result<NodeContent> {
        let node = self
            .hierarchy
            .find(node_id)
            .await?
            .filter(|node| node.readable_by(requester))
            .ok_or_else(|| VaultError::NotFound("node".to_string()))?;

        if node.is_folder() {
            return Err(VaultError::UnsupportedOperation(
                "A folder doesn't have content".to_string(),
            ));
        }

        let variant = match size {
            Some(size) => Some(
                parse_variant(size)
                    .ok_or_else(|| VaultError::NotFound(format!("thumbnail size {size}")))?,
            ),
            None => None,
        };

        let local_path = node
            .local_path
            .as_deref()
            .ok_or_else(|| VaultError::NotFound("content".to_string()))?;
        let bytes = self.hierarchy.blobs().read(local_path, variant).await?;

        let mime_type = mime_guess::from_path(&node.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        debug!(node_id, bytes = bytes.len(), mime = %mime_type, "Serving content");

        Ok(NodeContent {
            node,
            bytes,
            mime_type,
        })
    }

    /// Count all nodes.
    pub async fn count(&self) -> Result<i64> {
        self.hierarchy.count().await
    }
}
