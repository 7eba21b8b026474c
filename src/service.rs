//! Tree maintenance: keeps `node_closure` consistent with node creation,
//! deletion and relocation. Every mutation runs in a single transaction.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use uuid::Uuid;

use crate::config::{AdvisoryLockStrategy, ClosureTableConfig};
use crate::dto::{NodeCreateRequest, NodeMoveRequest, NodeUpdateRequest};
use crate::entity::{node, node_closure};
use crate::error::TreeError;
use crate::lock::LockedTransaction;
use crate::store::{chain_edges, SeaClosureStore, SeaNodeStore};
use crate::traits::{ClosureStore, NodeStore};

/// Orchestrates a [`NodeStore`] and a [`ClosureStore`] over one connection pool.
pub struct TreeService<N = SeaNodeStore, S = SeaClosureStore> {
    db: DatabaseConnection,
    nodes: N,
    closures: S,
    config: ClosureTableConfig,
}

impl TreeService {
    pub fn new(db: DatabaseConnection, config: ClosureTableConfig) -> Self {
        Self::with_stores(db, SeaNodeStore::new(), SeaClosureStore::new(), config)
    }
}

impl<N, S> TreeService<N, S>
where
    N: NodeStore,
    S: ClosureStore,
{
    pub fn with_stores(
        db: DatabaseConnection,
        nodes: N,
        closures: S,
        config: ClosureTableConfig,
    ) -> Self {
        Self {
            db,
            nodes,
            closures,
            config,
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn config(&self) -> &ClosureTableConfig {
        &self.config
    }

    /// Insert a node, its self-edge and, when `ancestor_id` is given, one edge
    /// from every node on the ancestor's chain.
    pub async fn create(&self, request: NodeCreateRequest) -> Result<node::Model, TreeError> {
        request.validate()?;

        let guard = LockedTransaction::acquire(self.config.lock_strategy(), &self.db).await?;
        let result = self.create_on(guard.connection(), request).await;
        let created = guard.finish(result).await?;

        tracing::info!(node_id = %created.id, "node created");
        Ok(created)
    }

    async fn create_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        request: NodeCreateRequest,
    ) -> Result<node::Model, TreeError> {
        if let Some(ancestor_id) = request.ancestor_id {
            if !self.nodes.exists_by_id(conn, ancestor_id).await? {
                return Err(TreeError::ancestor_not_found());
            }
        }

        let model = node::Model {
            id: Uuid::new_v4(),
            title: request.title,
            node_type: request.node_type,
            description: request.description,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        let created = self.nodes.create(conn, model).await?;

        self.closures
            .save(conn, node_closure::Model::self_edge(created.id))
            .await?;

        if let Some(ancestor_id) = request.ancestor_id {
            let chain = self.closures.find_by_descendant(conn, ancestor_id).await?;
            if chain.is_empty() {
                return Err(TreeError::invariant(format!(
                    "node {ancestor_id} has no closure rows"
                )));
            }
            self.closures
                .save_many(conn, chain_edges(created.id, &chain))
                .await?;
        }

        Ok(created)
    }

    /// Nodes without a parent, newest first.
    pub async fn roots(&self) -> Result<Vec<node::Model>, TreeError> {
        self.nodes.list_roots(&self.db).await
    }

    pub async fn get(&self, id: Uuid) -> Result<node::Model, TreeError> {
        self.nodes.get_by_id(&self.db, id).await
    }

    /// Replace title and type, and description when one is supplied.
    pub async fn update(
        &self,
        id: Uuid,
        request: NodeUpdateRequest,
    ) -> Result<node::Model, TreeError> {
        let guard = LockedTransaction::acquire(&AdvisoryLockStrategy::Disabled, &self.db).await?;
        let result = self.update_on(guard.connection(), id, request).await;
        let updated = guard.finish(result).await?;

        tracing::info!(node_id = %id, "node updated");
        Ok(updated)
    }

    async fn update_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        request: NodeUpdateRequest,
    ) -> Result<node::Model, TreeError> {
        let mut model = self.nodes.get_by_id(conn, id).await?;
        request.validate()?;

        model.title = request.title;
        model.node_type = request.node_type;
        if let Some(description) = request.description {
            model.description = Some(description);
        }
        model.updated_at = Some(Utc::now());

        self.nodes.update(conn, id, model).await
    }

    /// Remove a node together with its whole subtree. Returns the removed ids.
    pub async fn delete(&self, id: Uuid) -> Result<Vec<Uuid>, TreeError> {
        let guard = LockedTransaction::acquire(self.config.lock_strategy(), &self.db).await?;
        let result = self.delete_on(guard.connection(), id).await;
        let removed = guard.finish(result).await?;

        tracing::info!(node_id = %id, removed = removed.len(), "subtree deleted");
        Ok(removed)
    }

    async fn delete_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Vec<Uuid>, TreeError> {
        if !self.nodes.exists_by_id(conn, id).await? {
            return Err(TreeError::NotFound(id));
        }

        let subtree = self
            .closures
            .find_descendant_ids_by_ancestor(conn, id)
            .await?;
        self.closures.delete_by_descendant_ids(conn, &subtree).await?;
        self.nodes.delete_by_ids(conn, &subtree).await?;

        Ok(subtree)
    }

    /// `NotFound` unless a node with `id` exists.
    pub async fn ensure_exists(&self, id: Uuid) -> Result<(), TreeError> {
        if self.nodes.exists_by_id(&self.db, id).await? {
            Ok(())
        } else {
            Err(TreeError::NotFound(id))
        }
    }

    /// Every node below `id`, newest first.
    pub async fn descendants(&self, id: Uuid) -> Result<Vec<node::Model>, TreeError> {
        self.ensure_exists(id).await?;
        self.nodes.list_descendants(&self.db, id).await
    }

    /// Re-attach the subtree rooted at `id` below `request.to_ancestor_id`.
    pub async fn move_node(&self, id: Uuid, request: NodeMoveRequest) -> Result<(), TreeError> {
        let guard = LockedTransaction::acquire(self.config.lock_strategy(), &self.db).await?;
        let result = self.move_on(guard.connection(), id, request).await;
        let target = guard.finish(result).await?;

        tracing::info!(node_id = %id, to_ancestor_id = %target, "subtree moved");
        Ok(())
    }

    async fn move_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        request: NodeMoveRequest,
    ) -> Result<Uuid, TreeError> {
        if !self.nodes.exists_by_id(conn, id).await? {
            return Err(TreeError::NotFound(id));
        }
        let target = request.target()?;
        if !self.nodes.exists_by_id(conn, target).await? {
            return Err(TreeError::ancestor_not_found());
        }

        let subtree = self
            .closures
            .find_descendant_ids_by_ancestor(conn, id)
            .await?;
        if subtree.contains(&target) {
            return Err(TreeError::CyclicMove { node: id, target });
        }

        let attach = self
            .closures
            .compute_edges_for_reparent(conn, id, target)
            .await?;
        // Edges inside the subtree are dropped along with the old ancestry and
        // written back unchanged.
        let internal = self.closures.find_by_ancestor_ids(conn, &subtree).await?;

        self.closures.delete_by_descendant_ids(conn, &subtree).await?;

        let mut edges = internal;
        edges.extend(attach);
        self.closures.save_many(conn, edges).await?;

        Ok(target)
    }
}
