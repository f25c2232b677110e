#[macro_use]
extern crate rocket;
#[macro_use]
extern crate revolt_rocket_okapi;
#[macro_use]
extern crate log;
#[cfg(test)]
#[macro_use]
extern crate serde_json;

pub mod routes;
pub mod util;

use civica_database::DatabaseInfo;
use rocket::{Build, Rocket};
use revolt_rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};
use std::str::FromStr;

/// Build the Rocket instance serving the API
pub async fn web() -> Rocket<Build> {
    let config = civica_config::config().await;

    // Setup database
    let db = DatabaseInfo::Auto.connect().await.expect("database");
    db.migrate_database().await.expect("migrations");

    let cors = rocket_cors::CorsOptions {
        allowed_origins: rocket_cors::AllowedOrigins::All,
        allowed_methods: ["Get", "Put", "Post", "Delete", "Options", "Head", "Patch"]
            .iter()
            .map(|s| FromStr::from_str(s).unwrap())
            .collect(),
        ..Default::default()
    }
    .to_cors()
    .expect("Failed to create CORS.");

    let figment = rocket::Config::figment()
        .merge(("address", config.api.host.clone()))
        .merge(("port", config.api.port));

    let mut rocket = routes::mount(rocket::custom(figment));

    if config.api.swagger {
        rocket = rocket.mount(
            "/swagger/",
            make_swagger_ui(&SwaggerUIConfig {
                url: "../openapi.json".to_owned(),
                ..Default::default()
            }),
        );
    }

    rocket
        .register("/", util::catchers::all_catchers())
        .manage(db)
        .attach(cors)
}

#[launch]
async fn rocket() -> _ {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    pretty_env_logger::init();

    info!(
        "Starting Civica server [version {}].",
        env!("CARGO_PKG_VERSION")
    );

    web().await
}
