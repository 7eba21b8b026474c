//! SeaORM implementations of the [`NodeStore`](crate::traits::NodeStore) and
//! [`ClosureStore`](crate::traits::ClosureStore) traits.

use sea_orm::sea_query::{Expr, SimpleExpr};
use uuid::Uuid;

pub mod closure;
pub mod node;

pub use closure::{chain_edges, SeaClosureStore};
pub use node::SeaNodeStore;

#[cfg(test)]
pub mod memory;

/// Right-hand side of `col = ANY($1)`. The whole id list travels as one array
/// parameter, so subtree size is not bounded by the bind-parameter limit.
pub(crate) fn any_of(ids: &[Uuid]) -> SimpleExpr {
    Expr::cust_with_values("ANY($1)", [ids.to_vec()])
}
