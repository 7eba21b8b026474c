//! Idempotent DDL for the `nodes` and `node_closure` tables.

use sea_orm::{ConnectionTrait, DbBackend, Statement};

use crate::error::TreeError;

const STATEMENTS: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS nodes (
        id UUID PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        type VARCHAR(255) NOT NULL,
        description TEXT NULL,
        created_at TIMESTAMPTZ NULL,
        updated_at TIMESTAMPTZ NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS node_closure (
        ancestor UUID NOT NULL REFERENCES nodes(id),
        descendant UUID NOT NULL REFERENCES nodes(id),
        depth INTEGER NOT NULL CHECK (depth >= 0),
        PRIMARY KEY (ancestor, descendant)
    );
    "#,
    "CREATE INDEX IF NOT EXISTS node_closure_descendant_idx ON node_closure (descendant);",
];

pub async fn ensure_schema<C: ConnectionTrait>(conn: &C) -> Result<(), TreeError> {
    if conn.get_database_backend() != DbBackend::Postgres {
        return Err(TreeError::UnsupportedBackend);
    }

    for sql in STATEMENTS {
        conn.execute(Statement::from_string(DbBackend::Postgres, sql))
            .await?;
    }
    Ok(())
}
