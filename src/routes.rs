use crate::{
    api::{attendance, employee, report, transaction},
    config::Config,
    error::ApiError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::{Context, Result};
use std::sync::Arc;

type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-IP rate limiters, built once and shared by every worker.
#[derive(Clone)]
pub struct Limiters {
    reports: Limiter,
}

impl Limiters {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            reports: Arc::new(build_limiter(config.rate_reports_per_min)?),
        })
    }
}

fn build_limiter(requests_per_min: u32) -> Result<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = 60_000 / u64::from(requests_per_min.max(1));
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .context("invalid rate limit configuration")?;
    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, limiters: &Limiters) {
    // Query string errors answer with the same JSON shape as handler errors
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    );

    cfg.service(
        web::resource("/employees")
            .wrap(limiters.reports.clone())
            .route(web::get().to(employee::list_employees)),
    );

    cfg.service(
        web::scope("/transactions")
            .wrap(limiters.reports.clone())
            // /transactions
            .service(web::resource("").route(web::get().to(transaction::list_transactions)))
            // /transactions/today
            .service(web::resource("/today").route(web::get().to(transaction::todays_transactions))),
    );

    cfg.service(
        web::scope("/attendance")
            .wrap(limiters.reports.clone())
            .service(
                web::scope("/today")
                    .service(web::resource("").route(web::get().to(attendance::today)))
                    .service(web::resource("/present").route(web::get().to(attendance::today_present)))
                    .service(web::resource("/absent").route(web::get().to(attendance::today_absent)))
                    .service(web::resource("/late").route(web::get().to(attendance::today_late)))
                    .service(
                        web::resource("/early-leave")
                            .route(web::get().to(attendance::today_early_leave)),
                    ),
            )
            .service(web::resource("/week").route(web::get().to(attendance::last_7_days)))
            .service(web::resource("/month").route(web::get().to(attendance::month_to_date)))
            .service(
                web::scope("/report")
                    .service(web::resource("/weekly").route(web::get().to(report::weekly)))
                    .service(
                        web::resource("/weekly-previous")
                            .route(web::get().to(report::weekly_previous)),
                    )
                    .service(web::resource("/monthly").route(web::get().to(report::monthly)))
                    .service(
                        web::resource("/monthly-previous")
                            .route(web::get().to(report::monthly_previous)),
                    ),
            ),
    );
}
