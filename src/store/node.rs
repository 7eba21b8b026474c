use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entity::{node, node_closure};
use crate::error::TreeError;
use crate::store::any_of;
use crate::traits::NodeStore;

/// [`NodeStore`] backed by the SeaORM `nodes` entity.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeaNodeStore;

impl SeaNodeStore {
    pub fn new() -> Self {
        Self
    }
}

fn active_model(model: &node::Model) -> node::ActiveModel {
    node::ActiveModel {
        id: Set(model.id),
        title: Set(model.title.clone()),
        node_type: Set(model.node_type.clone()),
        description: Set(model.description.clone()),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    }
}

#[async_trait]
impl NodeStore for SeaNodeStore {
    async fn create<C>(&self, conn: &C, node: node::Model) -> Result<node::Model, TreeError>
    where
        C: ConnectionTrait,
    {
        node::Entity::insert(active_model(&node))
            .exec_without_returning(conn)
            .await?;
        Ok(node)
    }

    async fn update<C>(
        &self,
        conn: &C,
        id: Uuid,
        node: node::Model,
    ) -> Result<node::Model, TreeError>
    where
        C: ConnectionTrait,
    {
        let result = node::Entity::update_many()
            .col_expr(node::Column::Title, Expr::value(node.title.clone()))
            .col_expr(node::Column::NodeType, Expr::value(node.node_type.clone()))
            .col_expr(
                node::Column::Description,
                Expr::value(node.description.clone()),
            )
            .col_expr(node::Column::UpdatedAt, Expr::value(node.updated_at))
            .filter(node::Column::Id.eq(id))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(TreeError::NotFound(id));
        }

        Ok(node::Model { id, ..node })
    }

    async fn delete_by_ids<C>(&self, conn: &C, ids: &[Uuid]) -> Result<u64, TreeError>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = node::Entity::delete_many()
            .filter(Expr::col(node::Column::Id).eq(any_of(ids)))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn list_roots<C>(&self, conn: &C) -> Result<Vec<node::Model>, TreeError>
    where
        C: ConnectionTrait,
    {
        let anchored = Query::select()
            .column(node_closure::Column::Descendant)
            .from(node_closure::Entity)
            .and_where(Expr::col(node_closure::Column::Depth).eq(0))
            .to_owned();
        let attached = Query::select()
            .column(node_closure::Column::Descendant)
            .from(node_closure::Entity)
            .and_where(Expr::col(node_closure::Column::Depth).gt(0))
            .to_owned();

        let rows = node::Entity::find()
            .filter(node::Column::Id.in_subquery(anchored))
            .filter(node::Column::Id.not_in_subquery(attached))
            .order_by_desc(node::Column::CreatedAt)
            .all(conn)
            .await?;
        Ok(rows)
    }

    async fn exists_by_id<C>(&self, conn: &C, id: Uuid) -> Result<bool, TreeError>
    where
        C: ConnectionTrait,
    {
        let found = node::Entity::find_by_id(id).one(conn).await?;
        Ok(found.is_some())
    }

    async fn get_by_id<C>(&self, conn: &C, id: Uuid) -> Result<node::Model, TreeError>
    where
        C: ConnectionTrait,
    {
        node::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(TreeError::NotFound(id))
    }

    async fn list_descendants<C>(
        &self,
        conn: &C,
        ancestor_id: Uuid,
    ) -> Result<Vec<node::Model>, TreeError>
    where
        C: ConnectionTrait,
    {
        let edges = node_closure::Entity::find()
            .filter(node_closure::Column::Ancestor.eq(ancestor_id))
            .filter(node_closure::Column::Depth.gt(0))
            .all(conn)
            .await?;

        if edges.is_empty() {
            return Ok(Vec::new());
        }

        let ids = edges.iter().map(|edge| edge.descendant).collect::<Vec<_>>();
        let rows = node::Entity::find()
            .filter(Expr::col(node::Column::Id).eq(any_of(&ids)))
            .order_by_desc(node::Column::CreatedAt)
            .all(conn)
            .await?;
        Ok(rows)
    }
}
