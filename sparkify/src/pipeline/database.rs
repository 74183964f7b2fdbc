use crate::pipeline::error::Error;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use std::time::Duration;

/// A session able to run one statement at a time, each in its own committed transaction.
#[allow(async_fn_in_trait)]
pub trait Database {
    async fn execute(&mut self, request: &str) -> Result<(), sqlx::Error>;

    async fn row_count(&mut self, table_name: &str) -> Result<i64, sqlx::Error>;

    async fn close(self) -> Result<(), sqlx::Error>;
}

/// Single connection to the Redshift cluster, held for the whole run.
pub struct Warehouse {
    connection: PgConnection,
}

impl Warehouse {
    pub async fn connect(options: &PgConnectOptions) -> Result<Self, Error> {
        let connection = PgConnection::connect_with(options)
            .await
            .map_err(Error::Connection)?;
        Ok(Warehouse { connection })
    }

    /// Makes the cluster cancel any statement running longer than `limit` on this session.
    pub async fn set_statement_timeout(&mut self, limit: Duration) -> Result<(), Error> {
        sqlx::raw_sql(&statement_timeout_request(limit))
            .execute(&mut self.connection)
            .await
            .map_err(Error::Connection)?;
        Ok(())
    }
}

impl Database for Warehouse {
    async fn execute(&mut self, request: &str) -> Result<(), sqlx::Error> {
        let mut transaction = self.connection.begin().await?;
        // simple query protocol, COPY is rejected as a prepared statement
        sqlx::raw_sql(request).execute(&mut *transaction).await?;
        transaction.commit().await
    }

    async fn row_count(&mut self, table_name: &str) -> Result<i64, sqlx::Error> {
        let request = format!("SELECT COUNT(*) FROM {table_name};");
        sqlx::query_scalar(&request)
            .fetch_one(&mut self.connection)
            .await
    }

    async fn close(self) -> Result<(), sqlx::Error> {
        self.connection.close().await
    }
}

fn statement_timeout_request(limit: Duration) -> String {
    format!("SET statement_timeout TO {};", limit.as_millis())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    pub const MALFORMED: &str = "CREATE TABLE IF NOT EXISTS (;";
    pub const SLOW: &str = "SELECT pg_sleep(60);";

    /// Keeps committed statements in memory, rejects `MALFORMED` and hangs on `SLOW`.
    #[derive(Default)]
    pub struct RecordingDatabase {
        pub committed: Vec<String>,
        pub closed: Arc<AtomicBool>,
    }

    impl Database for RecordingDatabase {
        async fn execute(&mut self, request: &str) -> Result<(), sqlx::Error> {
            if request == MALFORMED {
                return Err(sqlx::Error::Protocol(
                    "syntax error at or near \"(\"".to_string(),
                ));
            }
            if request == SLOW {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            self.committed.push(request.to_string());
            Ok(())
        }

        async fn row_count(&mut self, _table_name: &str) -> Result<i64, sqlx::Error> {
            Ok(0)
        }

        async fn close(self) -> Result<(), sqlx::Error> {
            self.closed.store(true, Ordering::Release);
            Ok(())
        }
    }

    #[test]
    fn test_statement_timeout_request() {
        assert_eq!(
            statement_timeout_request(Duration::from_secs(900)),
            "SET statement_timeout TO 900000;"
        );
    }

    #[tokio::test]
    async fn test_recording_database_close() {
        let database = RecordingDatabase::default();
        let closed = database.closed.clone();

        database.close().await.unwrap();

        assert!(closed.load(Ordering::Acquire));
    }
}
