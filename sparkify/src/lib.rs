use crate::config::{read_config, subscribe_logger};
use crate::pipeline::database::{Database, Warehouse};
use crate::pipeline::error::Error;
use crate::pipeline::stage::schema::{table_names, TABLES};
use crate::pipeline::stage::{Catalog, Stage};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub mod config;
pub mod pipeline;

/// Drops and recreates the staging and star schema tables.
pub async fn create_tables(config_path: &Path) -> Result<(), Error> {
    let (catalog, warehouse, statement_timeout) = open(config_path).await?;

    let committed = provision_and_close(warehouse, &catalog, statement_timeout).await?;
    info!("{} tables provisioned with {} statements", TABLES.len(), committed);
    Ok(())
}

/// Copies the S3 datasets into staging then populates the star schema.
pub async fn run_etl(config_path: &Path) -> Result<(), Error> {
    let (catalog, warehouse, statement_timeout) = open(config_path).await?;

    let committed = etl_and_close(warehouse, &catalog, statement_timeout).await?;
    info!("etl process complete with {} statements", committed);
    Ok(())
}

async fn open(config_path: &Path) -> Result<(Catalog, Warehouse, Option<Duration>), Error> {
    let config = read_config(config_path)?;
    subscribe_logger(&config.logger)?;
    let catalog = Catalog::new(&config);
    let statement_timeout = config.runner.statement_timeout();

    info!(
        "connecting to cluster {}:{}/{}",
        config.cluster.host, config.cluster.db_port, config.cluster.db_name
    );
    let mut warehouse = Warehouse::connect(&config.connect_options()?).await?;
    if let Some(limit) = statement_timeout {
        warehouse.set_statement_timeout(limit).await?;
    }
    info!("connected");

    Ok((catalog, warehouse, statement_timeout))
}

async fn provision_and_close<D: Database>(
    mut database: D,
    catalog: &Catalog,
    statement_timeout: Option<Duration>,
) -> Result<usize, Error> {
    let result = pipeline::provision(&mut database, catalog, statement_timeout).await;
    close(database).await;
    result
}

async fn etl_and_close<D: Database>(
    mut database: D,
    catalog: &Catalog,
    statement_timeout: Option<Duration>,
) -> Result<usize, Error> {
    let result = pipeline::etl(&mut database, catalog, statement_timeout).await;
    if result.is_ok() {
        log_row_counts(&mut database, catalog).await;
    }
    close(database).await;
    result
}

async fn close<D: Database>(database: D) {
    match database.close().await {
        Ok(()) => info!("connection closed"),
        Err(e) => warn!("connection did not close gracefully: {}", e),
    }
}

async fn log_row_counts<D: Database>(database: &mut D, catalog: &Catalog) {
    for request in catalog.requests(Stage::Create) {
        for table in table_names(request) {
            match database.row_count(&table).await {
                Ok(count) => info!("{} contains {} rows", table, count),
                Err(e) => warn!("unable to count rows of {}: {}", table, e),
            }
        }
    }
}
