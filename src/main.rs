use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use pow_ledger::api::{self, AppState};
use pow_ledger::blockchain::CancelToken;
use pow_ledger::config::Settings;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let settings = Settings::from_env();
    let cancel = CancelToken::new();

    println!(
        "⛓️ Starting ledger API at http://{}:{}",
        settings.host, settings.port
    );
    if let Some(max) = settings.pow_max_attempts {
        info!("proof-of-work search capped at {max} attempts per block");
    }

    let state = web::Data::new(AppState::new(settings.search_bounds(cancel.clone())));

    let result = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await;

    // Stop any proof search still running on the blocking pool.
    cancel.cancel();
    info!("server stopped");
    result
}
