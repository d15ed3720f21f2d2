mod cache;
mod cli;
mod server;
mod upstream;

use std::{env, io};

use log::info;
use tokio::{net::TcpListener, signal};

use crate::cache::{Config, RowCache};
use crate::server::AppState;

const LOG_ENV: &str = "LOG";
const DEFAULT_LOG_FILTER: &str = "event_layout_proxy=info,event_layout=info";

fn setup_logging() {
    if env::var(LOG_ENV).is_err() {
        env::set_var(LOG_ENV, DEFAULT_LOG_FILTER);
    }

    pretty_env_logger::init_custom_env(LOG_ENV);
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    setup_logging();

    let args = cli::parse(env::args().skip(1).collect());

    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(io::Error::other)?;

    let state = AppState {
        client,
        upstream: args.upstream,
        cache: RowCache::new(Config {
            enabled: args.enable_cache,
            ttl: args.cache_ttl,
        }),
    };

    let listener = TcpListener::bind(args.address).await?;
    info!("Listening at http://{}", args.address);

    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}
