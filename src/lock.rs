use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, Statement,
    TransactionTrait, Value,
};

use crate::config::AdvisoryLockStrategy;
use crate::error::TreeError;

/// A database transaction that optionally holds a transaction-scoped advisory
/// lock. PostgreSQL releases the lock on commit or rollback.
pub struct LockedTransaction {
    txn: DatabaseTransaction,
    locked: bool,
}

impl LockedTransaction {
    pub async fn acquire(
        strategy: &AdvisoryLockStrategy,
        db: &DatabaseConnection,
    ) -> Result<Self, TreeError> {
        let key = strategy.key();
        if key.is_some() && db.get_database_backend() != DbBackend::Postgres {
            return Err(TreeError::UnsupportedBackend);
        }

        let txn = db.begin().await?;

        if let Some(key) = key {
            if let Err(err) = acquire_lock(&txn, key.as_str()).await {
                let _ = txn.rollback().await;
                return Err(err);
            }
        }

        Ok(Self {
            txn,
            locked: key.is_some(),
        })
    }

    pub fn connection(&self) -> &DatabaseTransaction {
        &self.txn
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub async fn commit(self) -> Result<(), TreeError> {
        self.txn.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), TreeError> {
        self.txn.rollback().await?;
        Ok(())
    }

    /// Commit on `Ok`, roll back on `Err`, and hand the result back.
    pub async fn finish<T>(self, result: Result<T, TreeError>) -> Result<T, TreeError> {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

async fn acquire_lock(txn: &DatabaseTransaction, key: &str) -> Result<(), TreeError> {
    txn.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT pg_advisory_xact_lock(hashtext($1))",
        vec![Value::from(key)],
    ))
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;
    use crate::config::AdvisoryLockKey;

    #[tokio::test]
    async fn namespaced_strategy_takes_xact_lock() -> Result<(), TreeError> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let strategy = AdvisoryLockStrategy::Namespaced(AdvisoryLockKey::new("tree"));
        let guard = LockedTransaction::acquire(&strategy, &db).await?;
        assert!(guard.is_locked());
        guard.commit().await?;

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("pg_advisory_xact_lock"));
        assert!(log.contains("COMMIT"));
        Ok(())
    }

    #[tokio::test]
    async fn disabled_strategy_skips_lock() -> Result<(), TreeError> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let guard = LockedTransaction::acquire(&AdvisoryLockStrategy::Disabled, &db).await?;
        assert!(!guard.is_locked());
        guard.rollback().await?;
        Ok(())
    }

    #[tokio::test]
    async fn locking_requires_postgres() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let strategy = AdvisoryLockStrategy::Namespaced(AdvisoryLockKey::new("tree"));

        let result = LockedTransaction::acquire(&strategy, &db).await;
        assert!(matches!(result, Err(TreeError::UnsupportedBackend)));
    }
}
