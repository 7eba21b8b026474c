use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::entity::{node, node_closure};
use crate::error::TreeError;

/// Persistence of node rows. The only writer of the `nodes` table.
///
/// Every method takes the connection to run on so the caller decides whether
/// the call joins an open transaction.
#[async_trait]
pub trait NodeStore: Send + Sync + 'static {
    async fn create<C>(&self, conn: &C, node: node::Model) -> Result<node::Model, TreeError>
    where
        C: ConnectionTrait;

    /// Overwrite title, type, description and `updated_at` of an existing row.
    async fn update<C>(
        &self,
        conn: &C,
        id: Uuid,
        node: node::Model,
    ) -> Result<node::Model, TreeError>
    where
        C: ConnectionTrait;

    async fn delete_by_ids<C>(&self, conn: &C, ids: &[Uuid]) -> Result<u64, TreeError>
    where
        C: ConnectionTrait;

    /// Nodes with no incoming `depth > 0` edge, newest first.
    async fn list_roots<C>(&self, conn: &C) -> Result<Vec<node::Model>, TreeError>
    where
        C: ConnectionTrait;

    async fn exists_by_id<C>(&self, conn: &C, id: Uuid) -> Result<bool, TreeError>
    where
        C: ConnectionTrait;

    async fn get_by_id<C>(&self, conn: &C, id: Uuid) -> Result<node::Model, TreeError>
    where
        C: ConnectionTrait;

    /// Every node strictly below `ancestor_id`, newest first.
    async fn list_descendants<C>(
        &self,
        conn: &C,
        ancestor_id: Uuid,
    ) -> Result<Vec<node::Model>, TreeError>
    where
        C: ConnectionTrait;
}

/// Persistence of closure rows. The only writer of the `node_closure` table.
#[async_trait]
pub trait ClosureStore: Send + Sync + 'static {
    async fn save<C>(
        &self,
        conn: &C,
        edge: node_closure::Model,
    ) -> Result<node_closure::Model, TreeError>
    where
        C: ConnectionTrait;

    /// Insert a batch of edges in one statement. An empty batch is a no-op.
    async fn save_many<C>(
        &self,
        conn: &C,
        edges: Vec<node_closure::Model>,
    ) -> Result<u64, TreeError>
    where
        C: ConnectionTrait;

    async fn delete_by_descendant_ids<C>(&self, conn: &C, ids: &[Uuid]) -> Result<u64, TreeError>
    where
        C: ConnectionTrait;

    /// Ids of every node in the subtree rooted at `ancestor_id`, itself included.
    async fn find_descendant_ids_by_ancestor<C>(
        &self,
        conn: &C,
        ancestor_id: Uuid,
    ) -> Result<Vec<Uuid>, TreeError>
    where
        C: ConnectionTrait;

    /// Every edge starting at one of `ancestor_ids`.
    async fn find_by_ancestor_ids<C>(
        &self,
        conn: &C,
        ancestor_ids: &[Uuid],
    ) -> Result<Vec<node_closure::Model>, TreeError>
    where
        C: ConnectionTrait;

    /// The ancestor chain of `node_id`, self-edge first, ordered by depth.
    async fn find_by_descendant<C>(
        &self,
        conn: &C,
        node_id: Uuid,
    ) -> Result<Vec<node_closure::Model>, TreeError>
    where
        C: ConnectionTrait;

    /// Edges attaching the subtree rooted at `node_id` below `new_ancestor_id`
    /// and every ancestor of it.
    async fn compute_edges_for_reparent<C>(
        &self,
        conn: &C,
        node_id: Uuid,
        new_ancestor_id: Uuid,
    ) -> Result<Vec<node_closure::Model>, TreeError>
    where
        C: ConnectionTrait;
}
