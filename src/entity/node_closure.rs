use sea_orm::entity::prelude::*;

/// One ancestor/descendant pair. `depth` is the number of edges between the
/// two; every node carries a `depth = 0` row pointing at itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, DeriveEntityModel)]
#[sea_orm(table_name = "node_closure")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ancestor: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub descendant: Uuid,
    pub depth: i32,
}

impl Model {
    pub fn new(ancestor: Uuid, descendant: Uuid, depth: i32) -> Self {
        Self {
            ancestor,
            descendant,
            depth,
        }
    }

    /// The `depth = 0` row every node owns.
    pub fn self_edge(id: Uuid) -> Self {
        Self::new(id, id, 0)
    }

    pub fn is_self_edge(&self) -> bool {
        self.depth == 0 && self.ancestor == self.descendant
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
