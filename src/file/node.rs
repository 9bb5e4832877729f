//! File hierarchy node types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of node in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// A container; has no content.
    Folder,
    /// Plain file content.
    File,
    /// Image content; thumbnails are derived from it.
    Image,
}

impl NodeType {
    /// Convert to the stored string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Folder => "folder",
            NodeType::File => "file",
            NodeType::Image => "image",
        }
    }

    /// Whether this node kind is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, NodeType::Folder)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "folder" => Ok(NodeType::Folder),
            "file" => Ok(NodeType::File),
            "image" => Ok(NodeType::Image),
            _ => Err(format!("unknown node type: {s}")),
        }
    }
}

/// Where a node hangs in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParentRef {
    /// Top level of the owner's tree.
    #[default]
    Root,
    /// Inside the folder with this ID.
    Node(i64),
}

impl ParentRef {
    /// Build from the wire representation, where `0` means root.
    pub fn from_wire(id: i64) -> Self {
        if id == 0 {
            ParentRef::Root
        } else {
            ParentRef::Node(id)
        }
    }

    /// Wire representation, where `0` means root.
    pub fn to_wire(&self) -> i64 {
        match self {
            ParentRef::Root => 0,
            ParentRef::Node(id) => *id,
        }
    }

    /// Column value: NULL for root.
    pub fn as_column(&self) -> Option<i64> {
        match self {
            ParentRef::Root => None,
            ParentRef::Node(id) => Some(*id),
        }
    }

    /// Whether this is the root.
    pub fn is_root(&self) -> bool {
        matches!(self, ParentRef::Root)
    }
}

impl From<Option<i64>> for ParentRef {
    fn from(column: Option<i64>) -> Self {
        column.map_or(ParentRef::Root, ParentRef::Node)
    }
}

/// A folder, file or image record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    /// Unique node ID.
    pub id: i64,
    /// Owning user. Never changes.
    pub owner_id: i64,
    /// Display name.
    pub name: String,
    /// Node kind.
    pub node_type: NodeType,
    /// Containing folder.
    pub parent: ParentRef,
    /// Whether the content can be read anonymously.
    pub is_public: bool,
    /// Blob path; present exactly when the node is not a folder.
    pub local_path: Option<String>,
}

impl FileNode {
    /// Whether this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.node_type.is_folder()
    }

    /// Whether `requester` may read this node's content.
    ///
    /// Public nodes are readable by anyone, private ones only by the owner.
    pub fn readable_by(&self, requester: Option<i64>) -> bool {
        self.is_public || requester == Some(self.owner_id)
    }
}

/// Data for inserting a node.
#[derive(Debug, Clone)]
pub struct NewNode {
    /// Owning user.
    pub owner_id: i64,
    /// Display name.
    pub name: String,
    /// Node kind.
    pub node_type: NodeType,
    /// Containing folder.
    pub parent: ParentRef,
    /// Initial visibility.
    pub is_public: bool,
    /// Blob path for file and image nodes.
    pub local_path: Option<String>,
}

impl NewNode {
    /// A folder node.
    pub fn folder(owner_id: i64, name: impl Into<String>, parent: ParentRef) -> Self {
        Self {
            owner_id,
            name: name.into(),
            node_type: NodeType::Folder,
            parent,
            is_public: false,
            local_path: None,
        }
    }

    /// A file or image node backed by the blob at `local_path`.
    pub fn with_content(
        owner_id: i64,
        name: impl Into<String>,
        node_type: NodeType,
        parent: ParentRef,
        local_path: impl Into<String>,
    ) -> Self {
        Self {
            owner_id,
            name: name.into(),
            node_type,
            parent,
            is_public: false,
            local_path: Some(local_path.into()),
        }
    }

    /// Set the initial visibility.
    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }
}
