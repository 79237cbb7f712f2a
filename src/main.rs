use std::time::Instant;

use astra::{Request, Server};
use http::header::ORIGIN;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::db::Database;
use crate::responses::{error_to_response, Cors};
use crate::router::handle;

mod config;
mod db;
mod domain;
mod errors;
mod query;
mod responses;
mod router;


fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("listing_insights=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let addr = match config.bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "invalid bind address");
            std::process::exit(1);
        }
    };

    let db = Database::new(config.db_path.clone());
    if let Err(e) = db.ping() {
        // Keep serving; /health reports the store as unavailable until it appears.
        tracing::warn!(path = db.path(), error = %e, "store not reachable at startup");
    }

    let cors = Cors::new(config.cors_origins.clone());

    tracing::info!(%addr, workers = config.max_workers, db = db.path(), "starting server");
    let server = Server::bind(&addr).max_workers(config.max_workers);

    let result = server.serve(move |req: Request, _info| {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let origin = req
            .headers()
            .get(ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let mut resp = match handle(req, &db) {
            Ok(resp) => resp,
            Err(err) => error_to_response(&err),
        };
        cors.apply(origin.as_deref(), &mut resp);

        tracing::info!(
            %method,
            path = %path,
            status = resp.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request"
        );
        resp
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down");
}
