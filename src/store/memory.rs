//! In-memory stores for exercising tree operations without PostgreSQL.
//! They ignore the connection they are handed.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::entity::{node, node_closure};
use crate::error::TreeError;
use crate::traits::{ClosureStore, NodeStore};

#[derive(Default)]
struct Tables {
    nodes: Vec<node::Model>,
    edges: Vec<node_closure::Model>,
}

/// Shared tables behind a [`MemoryNodeStore`] / [`MemoryClosureStore`] pair.
#[derive(Clone, Default)]
pub struct MemoryTree {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stores(&self) -> (MemoryNodeStore, MemoryClosureStore) {
        (MemoryNodeStore(self.clone()), MemoryClosureStore(self.clone()))
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory tree poisoned")
    }

    pub fn edges(&self) -> Vec<node_closure::Model> {
        self.lock().edges.clone()
    }

    pub fn node_ids(&self) -> HashSet<Uuid> {
        self.lock().nodes.iter().map(|node| node.id).collect()
    }

    /// Edges ending at `id`, sorted by depth.
    pub fn chain(&self, id: Uuid) -> Vec<node_closure::Model> {
        let mut chain: Vec<_> = self
            .lock()
            .edges
            .iter()
            .filter(|edge| edge.descendant == id)
            .copied()
            .collect();
        chain.sort_by_key(|edge| edge.depth);
        chain
    }
}

fn newest_first(mut nodes: Vec<node::Model>) -> Vec<node::Model> {
    nodes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    nodes
}

pub struct MemoryNodeStore(MemoryTree);

pub struct MemoryClosureStore(MemoryTree);

#[async_trait]
impl NodeStore for MemoryNodeStore {
    async fn create<C>(&self, _conn: &C, node: node::Model) -> Result<node::Model, TreeError>
    where
        C: ConnectionTrait,
    {
        self.0.lock().nodes.push(node.clone());
        Ok(node)
    }

    async fn update<C>(
        &self,
        _conn: &C,
        id: Uuid,
        node: node::Model,
    ) -> Result<node::Model, TreeError>
    where
        C: ConnectionTrait,
    {
        let mut tables = self.0.lock();
        let row = tables
            .nodes
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(TreeError::NotFound(id))?;
        row.title = node.title;
        row.node_type = node.node_type;
        row.description = node.description;
        row.updated_at = node.updated_at;
        Ok(row.clone())
    }

    async fn delete_by_ids<C>(&self, _conn: &C, ids: &[Uuid]) -> Result<u64, TreeError>
    where
        C: ConnectionTrait,
    {
        let mut tables = self.0.lock();
        let before = tables.nodes.len();
        tables.nodes.retain(|node| !ids.contains(&node.id));
        Ok((before - tables.nodes.len()) as u64)
    }

    async fn list_roots<C>(&self, _conn: &C) -> Result<Vec<node::Model>, TreeError>
    where
        C: ConnectionTrait,
    {
        let tables = self.0.lock();
        let roots = tables
            .nodes
            .iter()
            .filter(|node| {
                tables.edges.iter().any(|e| e.descendant == node.id && e.depth == 0)
                    && !tables.edges.iter().any(|e| e.descendant == node.id && e.depth > 0)
            })
            .cloned()
            .collect();
        Ok(newest_first(roots))
    }

    async fn exists_by_id<C>(&self, _conn: &C, id: Uuid) -> Result<bool, TreeError>
    where
        C: ConnectionTrait,
    {
        Ok(self.0.lock().nodes.iter().any(|node| node.id == id))
    }

    async fn get_by_id<C>(&self, _conn: &C, id: Uuid) -> Result<node::Model, TreeError>
    where
        C: ConnectionTrait,
    {
        self.0
            .lock()
            .nodes
            .iter()
            .find(|node| node.id == id)
            .cloned()
            .ok_or(TreeError::NotFound(id))
    }

    async fn list_descendants<C>(
        &self,
        _conn: &C,
        ancestor_id: Uuid,
    ) -> Result<Vec<node::Model>, TreeError>
    where
        C: ConnectionTrait,
    {
        let tables = self.0.lock();
        let ids: HashSet<Uuid> = tables
            .edges
            .iter()
            .filter(|e| e.ancestor == ancestor_id && e.depth > 0)
            .map(|e| e.descendant)
            .collect();
        let rows = tables
            .nodes
            .iter()
            .filter(|node| ids.contains(&node.id))
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }
}

#[async_trait]
impl ClosureStore for MemoryClosureStore {
    async fn save<C>(
        &self,
        _conn: &C,
        edge: node_closure::Model,
    ) -> Result<node_closure::Model, TreeError>
    where
        C: ConnectionTrait,
    {
        let mut tables = self.0.lock();
        if tables
            .edges
            .iter()
            .any(|e| e.ancestor == edge.ancestor && e.descendant == edge.descendant)
        {
            return Err(TreeError::invariant(format!(
                "duplicate closure row {} -> {}",
                edge.ancestor, edge.descendant
            )));
        }
        tables.edges.push(edge);
        Ok(edge)
    }

    async fn save_many<C>(
        &self,
        conn: &C,
        edges: Vec<node_closure::Model>,
    ) -> Result<u64, TreeError>
    where
        C: ConnectionTrait,
    {
        let count = edges.len() as u64;
        for edge in edges {
            self.save(conn, edge).await?;
        }
        Ok(count)
    }

    async fn delete_by_descendant_ids<C>(&self, _conn: &C, ids: &[Uuid]) -> Result<u64, TreeError>
    where
        C: ConnectionTrait,
    {
        let mut tables = self.0.lock();
        let before = tables.edges.len();
        tables.edges.retain(|edge| !ids.contains(&edge.descendant));
        Ok((before - tables.edges.len()) as u64)
    }

    async fn find_descendant_ids_by_ancestor<C>(
        &self,
        _conn: &C,
        ancestor_id: Uuid,
    ) -> Result<Vec<Uuid>, TreeError>
    where
        C: ConnectionTrait,
    {
        let mut edges: Vec<_> = self
            .0
            .lock()
            .edges
            .iter()
            .filter(|edge| edge.ancestor == ancestor_id)
            .copied()
            .collect();
        edges.sort_by_key(|edge| edge.depth);
        Ok(edges.into_iter().map(|edge| edge.descendant).collect())
    }

    async fn find_by_ancestor_ids<C>(
        &self,
        _conn: &C,
        ancestor_ids: &[Uuid],
    ) -> Result<Vec<node_closure::Model>, TreeError>
    where
        C: ConnectionTrait,
    {
        Ok(self
            .0
            .lock()
            .edges
            .iter()
            .filter(|edge| ancestor_ids.contains(&edge.ancestor))
            .copied()
            .collect())
    }

    async fn find_by_descendant<C>(
        &self,
        _conn: &C,
        node_id: Uuid,
    ) -> Result<Vec<node_closure::Model>, TreeError>
    where
        C: ConnectionTrait,
    {
        Ok(self.0.chain(node_id))
    }

    async fn compute_edges_for_reparent<C>(
        &self,
        _conn: &C,
        node_id: Uuid,
        new_ancestor_id: Uuid,
    ) -> Result<Vec<node_closure::Model>, TreeError>
    where
        C: ConnectionTrait,
    {
        let tables = self.0.lock();
        let mut edges = Vec::new();
        for sup in tables.edges.iter().filter(|e| e.descendant == new_ancestor_id) {
            for sub in tables.edges.iter().filter(|e| e.ancestor == node_id) {
                edges.push(node_closure::Model::new(
                    sup.ancestor,
                    sub.descendant,
                    sup.depth + sub.depth + 1,
                ));
            }
        }
        Ok(edges)
    }
}
