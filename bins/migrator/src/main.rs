//! Migration runner binary.
//!
//! Usage: `caja-migrate up|down|status|fresh` with `DATABASE_URL` set.

use sea_orm_migration::prelude::*;

use caja_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(Migrator).await;
}
