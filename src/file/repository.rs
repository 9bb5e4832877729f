//! Node repository for filevault.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::node::{FileNode, NewNode, NodeType, ParentRef};
use crate::db::NodeStore;
use crate::{Result, VaultError};

const NODE_COLUMNS: &str = "id, owner_id, name, node_type, parent_id, is_public, local_path";

#[derive(sqlx::FromRow)]
struct NodeRow {
    id: i64,
    owner_id: i64,
    name: String,
    node_type: String,
    parent_id: Option<i64>,
    is_public: bool,
    local_path: Option<String>,
}

impl TryFrom<NodeRow> for FileNode {
    type Error = VaultError;

    fn try_from(row: NodeRow) -> Result<Self> {
        let node_type: NodeType = row.node_type.parse().map_err(VaultError::Database)?;
        Ok(FileNode {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            node_type,
            parent: ParentRef::from(row.parent_id),
            is_public: row.is_public,
            local_path: row.local_path,
        })
    }
}

/// SQLite-backed node store.
#[derive(Debug, Clone)]
pub struct NodeRepository {
    pool: SqlitePool,
}

impl NodeRepository {
    /// Create a new NodeRepository sharing the given pool.
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }
}

#[async_trait]
impl NodeStore for NodeRepository {
    async fn insert(&self, node: &NewNode) -> Result<FileNode> {
        let result = sqlx::query(
            "INSERT INTO files (owner_id, name, node_type, parent_id, is_public, local_path)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(node.owner_id)
        .bind(&node.name)
        .bind(node.node_type.as_str())
        .bind(node.parent.as_column())
        .bind(node.is_public)
        .bind(&node.local_path)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| VaultError::NotFound("node".to_string()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FileNode>> {
        let row = sqlx::query_as::<_, NodeRow>(&format!(
            "SELECT {NODE_COLUMNS} FROM files WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(FileNode::try_from).transpose()
    }

    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Option<FileNode>> {
        let row = sqlx::query_as::<_, NodeRow>(&format!(
            "SELECT {NODE_COLUMNS} FROM files WHERE id = ? AND owner_id = ?"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(FileNode::try_from).transpose()
    }

    async fn list_children(
        &self,
        owner_id: i64,
        parent: ParentRef,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<FileNode>> {
        // `IS` matches both a NULL (root) and a concrete parent id
        let rows = sqlx::query_as::<_, NodeRow>(&format!(
            "SELECT {NODE_COLUMNS} FROM files
             WHERE owner_id = ? AND parent_id IS ?
             ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(owner_id)
        .bind(parent.as_column())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(FileNode::try_from).collect()
    }

    async fn set_public(&self, id: i64, owner_id: i64, is_public: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE files SET is_public = ? WHERE id = ? AND owner_id = ?")
            .bind(is_public)
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
