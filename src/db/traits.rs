//! Store traits for filevault.
//!
//! The core only talks to the document store through these traits, so a
//! different backend (or a fake in tests) can be injected in place of the
//! SQLite repositories.

use async_trait::async_trait;

use crate::db::{NewUser, User};
use crate::file::{FileNode, NewNode, ParentRef};
use crate::Result;

/// User lookups against the document store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return it with its assigned ID.
    async fn insert(&self, new_user: &NewUser) -> Result<User>;

    /// Get a user by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Count all users.
    async fn count(&self) -> Result<i64>;
}

/// File hierarchy node persistence.
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// Insert a node and return it with its assigned ID.
    async fn insert(&self, node: &NewNode) -> Result<FileNode>;

    /// Get a node by ID regardless of owner.
    async fn find_by_id(&self, id: i64) -> Result<Option<FileNode>>;

    /// Get a node by ID only if it belongs to `owner_id`.
    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Option<FileNode>>;

    /// List the children of `parent` owned by `owner_id`, in storage order.
    async fn list_children(
        &self,
        owner_id: i64,
        parent: ParentRef,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<FileNode>>;

    /// Set the public flag of an owned node.
    ///
    /// Returns `false` if no owned node matched.
    async fn set_public(&self, id: i64, owner_id: i64, is_public: bool) -> Result<bool>;

    /// Count all nodes.
    async fn count(&self) -> Result<i64>;
}
