use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use std::sync::Arc;

mod aggregator;
mod api;
mod biotime;
mod config;
mod docs;
mod error;
mod model;
mod routes;
mod utils;

use biotime::{AttendanceSource, BiotimeClient};
use config::Config;
use routes::Limiters;
use utils::period::{Clock, SystemClock};

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "BioTime attendance reports"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        server_addr = %config.server_addr,
        biotime_base = %config.biotime_base,
        biotime_username = %config.biotime_username,
        work_start_time = %config.rules.work_start_time,
        late_after_time = %config.rules.late_after_time,
        early_leave_time = %config.rules.early_leave_time,
        working_weekdays = ?config.rules.working_weekdays.names(),
        "Server starting..."
    );

    let client = BiotimeClient::from_config(&config).context("Failed to build BioTime client")?;
    let source: Arc<dyn AttendanceSource> = Arc::new(client);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let limiters = Limiters::from_config(&config)?;

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(config.clone()))
            .app_data(Data::from(source.clone()))
            .app_data(Data::from(clock.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, &limiters))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
