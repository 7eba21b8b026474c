use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, QueryFilter,
    QueryOrder, Statement,
};
use uuid::Uuid;

use crate::entity::node_closure;
use crate::error::TreeError;
use crate::store::any_of;
use crate::traits::ClosureStore;

/// PostgreSQL caps a statement at 65535 bind parameters; each edge binds three.
pub(crate) const EDGES_PER_INSERT: usize = u16::MAX as usize / 3;

/// Cross product of the new parent's ancestor chain with the moved subtree.
const REPARENT_SQL: &str = r#"
SELECT
    super_tree.ancestor AS ancestor,
    sub_tree.descendant AS descendant,
    super_tree.depth + sub_tree.depth + 1 AS depth
FROM node_closure AS super_tree
JOIN node_closure AS sub_tree ON sub_tree.ancestor = $1
WHERE super_tree.descendant = $2
"#;

/// [`ClosureStore`] backed by the SeaORM `node_closure` entity.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeaClosureStore;

impl SeaClosureStore {
    pub fn new() -> Self {
        Self
    }

    fn ensure_postgres(conn: &impl ConnectionTrait) -> Result<(), TreeError> {
        if conn.get_database_backend() == DbBackend::Postgres {
            Ok(())
        } else {
            Err(TreeError::UnsupportedBackend)
        }
    }
}

fn active_model(edge: &node_closure::Model) -> node_closure::ActiveModel {
    node_closure::ActiveModel {
        ancestor: Set(edge.ancestor),
        descendant: Set(edge.descendant),
        depth: Set(edge.depth),
    }
}

#[async_trait]
impl ClosureStore for SeaClosureStore {
    async fn save<C>(
        &self,
        conn: &C,
        edge: node_closure::Model,
    ) -> Result<node_closure::Model, TreeError>
    where
        C: ConnectionTrait,
    {
        node_closure::Entity::insert(active_model(&edge))
            .exec_without_returning(conn)
            .await?;
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
        if edges.is_empty() {
            return Ok(0);
        }

        let mut inserted = 0;
        for chunk in edges.chunks(EDGES_PER_INSERT) {
            inserted += node_closure::Entity::insert_many(chunk.iter().map(active_model))
                .exec_without_returning(conn)
                .await?;
        }
        Ok(inserted)
    }

    async fn delete_by_descendant_ids<C>(&self, conn: &C, ids: &[Uuid]) -> Result<u64, TreeError>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = node_closure::Entity::delete_many()
            .filter(Expr::col(node_closure::Column::Descendant).eq(any_of(ids)))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn find_descendant_ids_by_ancestor<C>(
        &self,
        conn: &C,
        ancestor_id: Uuid,
    ) -> Result<Vec<Uuid>, TreeError>
    where
        C: ConnectionTrait,
    {
        let rows = node_closure::Entity::find()
            .filter(node_closure::Column::Ancestor.eq(ancestor_id))
            .order_by_asc(node_closure::Column::Depth)
            .all(conn)
            .await?;
        Ok(rows.into_iter().map(|edge| edge.descendant).collect())
    }

    async fn find_by_ancestor_ids<C>(
        &self,
        conn: &C,
        ancestor_ids: &[Uuid],
    ) -> Result<Vec<node_closure::Model>, TreeError>
    where
        C: ConnectionTrait,
    {
        if ancestor_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = node_closure::Entity::find()
            .filter(Expr::col(node_closure::Column::Ancestor).eq(any_of(ancestor_ids)))
            .all(conn)
            .await?;
        Ok(rows)
    }

    async fn find_by_descendant<C>(
        &self,
        conn: &C,
        node_id: Uuid,
    ) -> Result<Vec<node_closure::Model>, TreeError>
    where
        C: ConnectionTrait,
    {
        let rows = node_closure::Entity::find()
            .filter(node_closure::Column::Descendant.eq(node_id))
            .order_by_asc(node_closure::Column::Depth)
            .all(conn)
            .await?;
        Ok(rows)
    }

    async fn compute_edges_for_reparent<C>(
        &self,
        conn: &C,
        node_id: Uuid,
        new_ancestor_id: Uuid,
    ) -> Result<Vec<node_closure::Model>, TreeError>
    where
        C: ConnectionTrait,
    {
        Self::ensure_postgres(conn)?;
        let rows = node_closure::Entity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::Postgres,
                REPARENT_SQL,
                [node_id.into(), new_ancestor_id.into()],
            ))
            .all(conn)
            .await?;
        Ok(rows)
    }
}

/// Edges linking a freshly inserted node to its parent's ancestor chain.
///
/// `chain` is the parent's `find_by_descendant` result (self-edge first). The
/// i-th row becomes an edge of depth `i + 1` from that row's ancestor.
pub fn chain_edges(node_id: Uuid, chain: &[node_closure::Model]) -> Vec<node_closure::Model> {
    chain
        .iter()
        .zip(1..)
        .map(|(edge, depth)| node_closure::Model::new(edge.ancestor, node_id, depth))
        .collect()
}
