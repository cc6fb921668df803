use golf_league::args::{self, CleanArgs};
use golf_league::controller::cache::StandingsCache;
use golf_league::controller::{db_prefill, http_handlers as h};
use golf_league::storage::SqlStorage;
use golf_league::telemetry;
use sql_middleware::middleware::{ConfigAndPool, SqliteOptions};

use actix_files::Files;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use tracing::info;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let raw_args = args::args_checks()?;
    telemetry::init(&raw_args.log_level)?;
    let args = CleanArgs::new(raw_args);

    let config_and_pool = ConfigAndPool::new_sqlite(SqliteOptions::new(args.db_name.clone())).await?;
    let storage = SqlStorage::new(config_and_pool);
    run_startup_tasks(&args, &storage).await?;

    let cache = StandingsCache::new();
    info!(bind = %args.bind, db = %args.db_name, "starting server");

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(storage.clone()))
            .app_data(Data::new(cache.clone()))
            .configure(h::routes)
            .service(Files::new("/static", "./static").show_files_listing())
    })
    .bind(args.bind.as_str())?
    .run()
    .await?;
    Ok(())
}

async fn run_startup_tasks(
    args: &CleanArgs,
    storage: &SqlStorage,
) -> Result<(), Box<dyn std::error::Error>> {
    storage.create_schema().await?;

    if !args.combined_sql_script.is_empty() {
        storage.execute_batch(&args.combined_sql_script).await?;
        info!("startup script applied");
    }

    if let Some(json_data) = &args.db_populate_json {
        db_prefill::db_prefill(json_data, storage).await?;
        info!("database prefilled");
    }

    Ok(())
}
