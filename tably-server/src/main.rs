use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tably_server::core::hub::OrderHub;
use tably_server::server::{self, Params};
use tably_server::types::SharedHub;
use tokio::sync::Mutex;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .with_thread_ids(true)
        .compact()
        .init();

    let params = Params::parse();
    info!("Tably starting with params: {:?}", params);

    // The hub is built here and injected; it owns the active-order registry
    // for the lifetime of the process. Orders do not survive a restart.
    let hub: SharedHub = Arc::new(Mutex::new(OrderHub::new()));

    tokio::select! {
        result = server::start(params, hub) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received, active orders are discarded");
            Ok(())
        }
    }
}
