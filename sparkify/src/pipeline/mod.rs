use crate::pipeline::database::Database;
use crate::pipeline::error::Error;
use crate::pipeline::stage::{preview, Catalog, Stage};
use chrono::Local;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};

pub mod database;
pub mod error;
pub mod stage;

/// Runs `requests` one after the other, committing each, and stops at the first failure.
///
/// Statements committed before a failure stay applied. Returns the number of
/// committed statements.
pub async fn run_requests<D: Database>(
    database: &mut D,
    stage: Stage,
    requests: &[String],
    statement_timeout: Option<Duration>,
) -> Result<usize, Error> {
    info!("starting {} stage with {} statements", stage, requests.len());

    for (position, request) in requests.iter().enumerate() {
        let index = position + 1;
        let preview = preview(request);
        info!(
            "running {} statement {} / {}: {}",
            stage,
            index,
            requests.len(),
            preview
        );

        let start = Local::now().timestamp_millis();
        let result = match statement_timeout {
            Some(limit) => match timeout(limit, database.execute(request)).await {
                Ok(result) => result,
                Err(_) => {
                    error!(
                        "{} statement {} timed out after {} s",
                        stage,
                        index,
                        limit.as_secs()
                    );
                    return Err(Error::StatementTimeout {
                        stage,
                        index,
                        preview,
                        seconds: limit.as_secs(),
                    });
                }
            },
            None => database.execute(request).await,
        };

        if let Err(source) = result {
            error!("{} statement {} failed: {}", stage, index, source);
            return Err(Error::Statement {
                stage,
                index,
                preview,
                source,
            });
        }

        let duration = Local::now().timestamp_millis() - start;
        info!(
            "{} statement {} committed in {} s",
            stage,
            index,
            duration as f32 / 1000.0
        );
    }

    Ok(requests.len())
}

async fn run_stages<D: Database>(
    database: &mut D,
    catalog: &Catalog,
    stages: &[Stage],
    statement_timeout: Option<Duration>,
) -> Result<usize, Error> {
    let mut committed = 0;
    for stage in stages {
        committed +=
            run_requests(database, *stage, catalog.requests(*stage), statement_timeout).await?;
    }
    Ok(committed)
}

/// Drops then recreates every table.
pub async fn provision<D: Database>(
    database: &mut D,
    catalog: &Catalog,
    statement_timeout: Option<Duration>,
) -> Result<usize, Error> {
    run_stages(database, catalog, &Stage::PROVISION, statement_timeout).await
}

/// Loads the staging tables from S3 then fills the star schema from them.
pub async fn etl<D: Database>(
    database: &mut D,
    catalog: &Catalog,
    statement_timeout: Option<Duration>,
) -> Result<usize, Error> {
    run_stages(database, catalog, &Stage::ETL, statement_timeout).await
}
