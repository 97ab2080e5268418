use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;

use busho_master::db::BushoStore;
use busho_master::handlers::{self, cors, graphql};
use busho_master::utils::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    let store = Arc::new(BushoStore::open(config.data_file.clone()));
    let schema = graphql::build_schema(Arc::clone(&store), config.strict_mutations);

    info!(
        "Starting server at http://{}:{}{} (store: {})",
        config.host,
        config.port,
        graphql::GRAPHQL_PATH,
        store.path().display()
    );

    let bind_addr = config.bind_addr();
    let config = web::Data::new(config);
    let schema = web::Data::new(schema);

    HttpServer::new(move || {
        App::new()
            .wrap(cors::cors_headers())
            .app_data(schema.clone())
            .app_data(config.clone())
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
