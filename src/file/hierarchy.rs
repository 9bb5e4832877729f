//! Per-user folder hierarchy.
//!
//! Owns the rules for creating nodes (validation, parent resolution, the
//! blob-then-metadata write order) and every owner-scoped read and update.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, info, warn};

use super::node::{FileNode, NewNode, NodeType, ParentRef};
use super::storage::BlobStore;
use super::thumbnail::{ThumbnailDispatcher, ThumbnailJob};
use crate::db::NodeStore;
use crate::{Result, VaultError};

/// Number of nodes per listing page.
pub const PAGE_SIZE: i64 = 20;

/// Parent folder as named by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedParent {
    /// The root or a node ID.
    Ref(ParentRef),
    /// A value that cannot name any folder, such as a non-numeric ID.
    Unknown,
}

impl Default for RequestedParent {
    fn default() -> Self {
        RequestedParent::Ref(ParentRef::Root)
    }
}

impl From<ParentRef> for RequestedParent {
    fn from(parent: ParentRef) -> Self {
        RequestedParent::Ref(parent)
    }
}

/// Node content as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Base64 text, decoded when the content is checked.
    Base64(String),
}

impl NodeData {
    fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            NodeData::Bytes(bytes) => Ok(bytes),
            NodeData::Base64(text) => STANDARD
                .decode(text.trim())
                .map_err(|_| VaultError::Validation("Invalid data".to_string())),
        }
    }
}

/// Input for [`FileHierarchy::create`].
///
/// Fields are optional because presence is part of what gets validated.
#[derive(Debug, Clone, Default)]
pub struct CreateNode {
    /// Display name. Required and non-empty.
    pub name: Option<String>,
    /// One of `folder`, `file`, `image`.
    pub node_type: Option<String>,
    /// Containing folder.
    pub parent: RequestedParent,
    /// Initial visibility.
    pub is_public: bool,
    /// Content. Required unless the node is a folder.
    pub content: Option<NodeData>,
}

/// Creates, reads and updates nodes on behalf of their owners.
#[derive(Clone)]
pub struct FileHierarchy {
    nodes: Arc<dyn NodeStore>,
    blobs: BlobStore,
    thumbnails: ThumbnailDispatcher,
}

impl FileHierarchy {
    /// Create a hierarchy over the given stores.
    pub fn new(
        nodes: Arc<dyn NodeStore>,
        blobs: BlobStore,
        thumbnails: ThumbnailDispatcher,
    ) -> Self {
        Self {
            nodes,
            blobs,
            thumbnails,
        }
    }

    /// Blob store holding node content.
    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Create a node for `owner_id`.
    ///
    /// Checks run in a fixed order: name, type, content, parent. Content
    /// is written before the metadata; if the metadata write then fails
    /// the blob stays behind on disk.
    pub async fn create(&self, owner_id: i64, request: CreateNode) -> Result<FileNode> {
        let name = request
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| VaultError::Validation("Missing name".to_string()))?;

        let node_type: NodeType = request
            .node_type
            .as_deref()
            .ok_or_else(|| VaultError::Validation("Missing type".to_string()))?
            .parse()
            .map_err(|_| VaultError::Validation("Invalid type".to_string()))?;

        let content = match (node_type, request.content) {
            (NodeType::Folder, _) => None,
            (_, Some(content)) => Some(content.into_bytes()?),
            (_, None) => return Err(VaultError::Validation("Missing data".to_string())),
        };

        let parent = self.check_parent(owner_id, request.parent).await?;

        let Some(content) = content else {
            let new_node = NewNode::folder(owner_id, name, parent).public(request.is_public);
            let node = self.nodes.insert(&new_node).await?;
            info!(user_id = owner_id, node_id = node.id, "Folder created");
            return Ok(node);
        };

        let local_path = self.blobs.store(&content).await?;
        debug!(path = %local_path, bytes = content.len(), "Blob stored");

        let new_node = NewNode::with_content(owner_id, name, node_type, parent, &local_path)
            .public(request.is_public);
        let node = match self.nodes.insert(&new_node).await {
            Ok(node) => node,
            Err(e) => {
                warn!(path = %local_path, "Blob left without metadata: {}", e);
                return Err(e);
            }
        };

        info!(
            user_id = owner_id,
            node_id = node.id,
            node_type = %node.node_type,
            "Node created"
        );

        if node.node_type == NodeType::Image {
            self.thumbnails.enqueue(ThumbnailJob {
                owner_id,
                file_id: node.id,
            });
        }

        Ok(node)
    }

    /// Get a node owned by `owner_id`.
    ///
    /// Someone else's node is `NotFound`, exactly like a missing one.
    pub async fn get(&self, node_id: i64, owner_id: i64) -> Result<FileNode> {
        self.nodes
            .find_owned(node_id, owner_id)
            .await?
            .ok_or_else(|| VaultError::NotFound("node".to_string()))
    }

    /// Get a node regardless of owner. Visibility is the caller's concern.
    pub async fn find(&self, node_id: i64) -> Result<Option<FileNode>> {
        self.nodes.find_by_id(node_id).await
    }

    /// List one page of `owner_id`'s nodes directly under `parent`.
    pub async fn list(
        &self,
        owner_id: i64,
        parent: ParentRef,
        page: u32,
    ) -> Result<Vec<FileNode>> {
        let offset = i64::from(page) * PAGE_SIZE;
        self.nodes
            .list_children(owner_id, parent, offset, PAGE_SIZE)
            .await
    }

    /// Set the public flag of an owned node and return the updated node.
    ///
    /// Concurrent updates are not serialised; the last write wins.
    pub async fn set_visibility(
        &self,
        node_id: i64,
        owner_id: i64,
        public: bool,
    ) -> Result<FileNode> {
        if !self.nodes.set_public(node_id, owner_id, public).await? {
            return Err(VaultError::NotFound("node".to_string()));
        }
        debug!(user_id = owner_id, node_id, public, "Visibility changed");
        self.get(node_id, owner_id).await
    }

    /// Count all nodes.
    pub async fn count(&self) -> Result<i64> {
        self.nodes.count().await
    }

    async fn check_parent(&self, owner_id: i64, parent: RequestedParent) -> Result<ParentRef> {
        let parent_id = match parent {
            RequestedParent::Unknown => return Err(VaultError::ParentNotFound),
            RequestedParent::Ref(ParentRef::Root) => return Ok(ParentRef::Root),
            RequestedParent::Ref(ParentRef::Node(id)) => id,
        };

        match self.nodes.find_owned(parent_id, owner_id).await? {
            None => Err(VaultError::ParentNotFound),
            Some(node) if !node.is_folder() => Err(VaultError::ParentNotFolder),
            Some(_) => Ok(ParentRef::Node(parent_id)),
        }
    }
}
