use anyhow::Context;
use bb8_postgres::bb8::Pool;
use bb8_postgres::tokio_postgres::NoTls;
use bb8_postgres::PostgresConnectionManager;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;

use crate::config::Config;

pub mod config;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod models;
pub mod repositories;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    let manager = PostgresConnectionManager::new_from_stringlike(&config.database_url, NoTls)
        .context("Invalid postgres connection string")?;
    let postgres_connection = Pool::builder()
        .build(manager)
        .await
        .context("Error building the postgres connection pool")?;

    info!("Starting parking backend in {} mode", config.environment);
    controller::serve(postgres_connection, &config).await
}
