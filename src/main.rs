use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use dotenv::dotenv;
use log::{error, info};

use lp_batch::api::{configure, payload_config, AppState};
use lp_batch::build_coordinator;
use lp_batch::config::Config;

/// GET / - Redirect to the problem registry
async fn root_redirect() -> impl Responder {
    HttpResponse::Found()
        .append_header(("Location", "/problems"))
        .finish()
}

fn invalid_input(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
}

// ---------- Server bootstrap ----------
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        error!("invalid configuration: {}", e);
        invalid_input(e)
    })?;

    let _sentry = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let coordinator = build_coordinator(&config).map_err(|e| {
        error!("failed to load problem registry: {}", e);
        invalid_input(e)
    })?;

    let state = AppState {
        coordinator,
        api_key: config.api_key.clone(),
    };
    let json_limit = config.json_limit;

    info!("Starting server on http://127.0.0.1:{}", config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(sentry_actix::Sentry::new())
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(payload_config(json_limit))
            .route("/", web::get().to(root_redirect))
            .configure(configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
