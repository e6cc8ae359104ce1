mod config;
mod db;
mod error;
mod middleware;
mod migrator;
mod models;
mod routes;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use sea_orm_migration::MigratorTrait;

use crate::config::AppConfig;
use crate::migrator::Migrator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();

    println!("🔌 Connecting to database...");
    let db = db::establish_connection(&config.database_url)
        .await
        .expect("Failed to connect to database");
    println!("✅ Database connected!");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    println!(
        "🚀 Starting server on http://{}:{}",
        config.server_host, config.server_port
    );

    let bind_addr = (config.server_host.clone(), config.server_port);

    let db_data = web::Data::new(db);

    HttpServer::new(move || {
        let cors = if config.cors_allowed_origin == "*" {
            Cors::permissive()
        } else {
            Cors::default()
                .allowed_origin(&config.cors_allowed_origin)
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
                .allow_any_header()
                .max_age(3600)
        };

        App::new()
            .app_data(db_data.clone())
            .app_data(web::Data::new(config.clone()))
            .wrap(cors)
            .configure(routes::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
