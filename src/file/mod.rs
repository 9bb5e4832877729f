//! File management module for filevault.
//!
//! This module provides:
//! - The per-user folder hierarchy and its node records
//! - Blob storage with UUID naming and thumbnail variants
//! - Thumbnail job hand-off to an external worker

mod hierarchy;
mod node;
mod repository;
mod service;
mod storage;
mod thumbnail;

pub use hierarchy::{CreateNode, FileHierarchy, NodeData, RequestedParent, PAGE_SIZE};
pub use node::{FileNode, NewNode, NodeType, ParentRef};
pub use repository::NodeRepository;
pub use service::{FileService, NodeContent, UploadRequest};
pub use storage::{parse_variant, variant_path, BlobStore, THUMBNAIL_SIZES};
pub use thumbnail::{
    ChannelQueue, ClaimedJob, JobQueue, SqlJobQueue, ThumbnailDispatcher, ThumbnailJob,
};
