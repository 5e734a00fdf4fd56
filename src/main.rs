use rocket::figment::Figment;
use rocket::fs::FileServer;
use rocket::http::Status;
use rocket::request::Request;
use rocket::serde::json::{json, Json, Value};
use rocket::{catch, catchers, routes, Build, Rocket};
use tracing_subscriber::EnvFilter;

use std::error::Error;

mod api_error;
mod auth;
mod config;
mod cors;
mod data;
mod progress;
mod tasks;
mod uploads;


use auth::token::TokenKeys;
use config::AppConfig;

#[catch(default)]
fn default_catcher(status: Status, _request: &Request) -> (Status, Json<Value>) {
    let message = match status.code {
        404 => "Not found".to_string(),
        _ => status.reason_lossy().to_string(),
    };

    (status, Json(json!({ "error": message })))
}

fn build_rocket(figment: Figment) -> Result<Rocket<Build>, Box<dyn Error>> {
    let config: AppConfig = figment.extract()?;
    tracing::info!(?config, "loaded configuration");

    let connection = data::open_database(&config.database_path)?;
    uploads::prepare_upload_dir(&config.upload_dir)?;
    let token_keys = TokenKeys::from_config(&config);

    let rocket = rocket::custom(figment)
        .manage(connection)
        .manage(token_keys)
        .mount(
            "/",
            routes![
                auth::endpoints::register,
                auth::endpoints::register_json,
                auth::endpoints::login,
                tasks::endpoints::get_tasks,
                tasks::endpoints::post_task,
                tasks::endpoints::put_task,
                tasks::endpoints::remove_task,
                progress::endpoints::get_streak,
                progress::endpoints::get_garden,
                cors::preflight,
            ],
        )
        .mount("/uploads", FileServer::from(&config.upload_dir))
        .register("/", catchers![default_catcher])
        .attach(cors::Cors)
        .manage(config);

    Ok(rocket)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let rocket = build_rocket(rocket::Config::figment())?;
    rocket.launch().await?;

    Ok(())
}
