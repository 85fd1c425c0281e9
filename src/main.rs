mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod transaction;

use actix_web::{App, HttpServer, rt, web};
use dotenvy::dotenv;
use log::{info, warn};
use std::time::Duration;

use api::AppState;
use config::Config;

/// Periodically run consensus against the registered peers.
fn spawn_periodic_resolution(state: web::Data<AppState>, period: Duration) {
    rt::spawn(async move {
        let mut ticker = rt::time::interval(period);
        loop {
            ticker.tick().await;
            let peers = {
                let registry = state.registry.read().expect("registry lock poisoned");
                if registry.is_empty() {
                    continue;
                }
                registry.list_peers()
            };
            state.resolver.resolve(&peers, &state.ledger).await;
        }
    });
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();
    let state = AppState::new(&config).map_err(std::io::Error::other)?;

    let boot_peers = {
        let mut registry = state.registry.write().expect("registry lock poisoned");
        for peer in &config.peers {
            if let Err(e) = registry.add_peer(peer) {
                warn!("ignoring configured peer: {e}");
            }
        }
        registry.len()
    };

    info!(
        "⛓️ Starting node {} at http://{}:{} (difficulty={}, peers={})",
        config.node_id,
        config.host,
        config.port,
        config.difficulty,
        boot_peers
    );

    let state = web::Data::new(state);
    if let Some(period) = config.resolve_interval {
        info!("consensus will run every {}s", period.as_secs());
        spawn_periodic_resolution(state.clone(), period);
    }

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
