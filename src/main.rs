use actix_web::{middleware::Logger, web, App, HttpServer};

use warbler::api;
use warbler::config::Config;
use warbler::db::create_pool;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().expect("Failed to load configuration");

    let pool = create_pool(&config)
        .await
        .expect("Failed to connect to the database");

    log::info!("Database connection established");

    let addr = config.server_addr();
    log::info!("Starting server on {}", addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(pool.clone()))
            .configure(api::configure)
    })
    .bind(addr)?
    .run()
    .await
}
