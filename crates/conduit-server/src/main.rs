mod config;
mod proxy;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use conduit_mappings::{MappingRegistry, MappingsConfig};
use conduit_session::{diagnostics, CoreConfig, SessionRegistry, TranslatorRegistry};

use config::ProxyConfig;

#[tokio::main]
async fn main() {
    let config = match ProxyConfig::load("conduit.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load conduit.toml: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "Conduit v{} listening on {}:{}, backend {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.proxy.address,
        config.proxy.port,
        config.proxy.backend_address,
        config.proxy.backend_port
    );

    // Mapping tables are a precondition for serving anything; a broken
    // bundle aborts startup before the listener binds.
    let mappings_config = MappingsConfig {
        extended_world_height: config.translation.extended_world_height,
        add_non_native_items: config.translation.add_non_native_items,
    };
    let mappings = match MappingRegistry::load(&mappings_config) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            error!("mapping registry construction failed: {e}");
            std::process::exit(1);
        }
    };

    let core_config = Arc::new(CoreConfig {
        extended_world_height: config.translation.extended_world_height,
        add_non_native_items: config.translation.add_non_native_items,
        debug_mode: config.translation.debug_mode,
        default_locale: config.translation.default_locale.clone(),
        backend_address: config.proxy.backend_address.clone(),
        backend_port: config.proxy.backend_port,
    });
    let translators = Arc::new(TranslatorRegistry::with_defaults());
    let sessions = SessionRegistry::new();

    if core_config.debug_mode {
        let report = diagnostics(&mappings, &core_config, &sessions);
        match serde_json::to_string_pretty(&report) {
            Ok(json) => info!("startup diagnostics:\n{json}"),
            Err(e) => error!("diagnostics serialization failed: {e}"),
        }
    }

    let addr: SocketAddr = match format!("{}:{}", config.proxy.address, config.proxy.port).parse()
    {
        Ok(addr) => addr,
        Err(e) => {
            error!("invalid bind address: {e}");
            std::process::exit(1);
        }
    };
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("cannot bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        info!(%peer, "client connected");
                        tokio::spawn(proxy::handle_connection(
                            stream,
                            mappings.clone(),
                            core_config.clone(),
                            translators.clone(),
                            sessions.clone(),
                        ));
                    }
                    Err(e) => {
                        error!("accept failed: {e}");
                    }
                }
            }
        }
    }

    let report = diagnostics(&mappings, &core_config, &sessions);
    info!(
        sessions = report.sessions,
        "shutdown requested; draining sessions"
    );
}
