use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use kube_status_console::clients::directory::StaticDirectory;
use kube_status_console::clients::{ClusterDirectory, StatusApiClient};
use kube_status_console::navigation::Navigator;
use kube_status_console::{AppState, config, routes};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kube_status_console=info")),
        )
        .init();

    let config_path = std::env::args()
        .skip(1)
        .zip(std::env::args().skip(2))
        .find_map(|(k, v)| {
            if k == "-config" || k == "--config" {
                Some(v)
            } else {
                None
            }
        })
        .or_else(|| std::env::args().nth(1).filter(|a| !a.starts_with('-')))
        .unwrap_or_else(|| "/etc/kube-status-console/config.yaml".to_string());

    let cfg = config::Config::load(&PathBuf::from(&config_path)).unwrap_or_else(|e| {
        eprintln!("error loading config: {}", e);
        std::process::exit(1);
    });

    let api_base = cfg.api_base().unwrap_or_else(|e| {
        eprintln!("error loading config: {}", e);
        std::process::exit(1);
    });
    let api = StatusApiClient::new(api_base, cfg.request_timeout()).unwrap_or_else(|e| {
        eprintln!("failed to create HTTP client: {}", e);
        std::process::exit(1);
    });
    let api = Arc::new(api);

    let directory: Arc<dyn ClusterDirectory> = if cfg.clusters.is_empty() {
        info!("listing clusters from {}", cfg.api_url);
        api.clone()
    } else {
        info!("serving {} clusters from config", cfg.clusters.len());
        Arc::new(StaticDirectory::new(cfg.clusters.clone()))
    };

    let navigator = Navigator::new(directory, api, cfg.volume_capacity);
    let router = routes::build_router(AppState::new(navigator));

    let listen_addr = cfg.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await.unwrap_or_else(|e| {
        eprintln!("failed to bind {}: {}", listen_addr, e);
        std::process::exit(1);
    });

    info!("kube-status-console listening on {}", listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            eprintln!("server error: {}", e);
            std::process::exit(1);
        });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutting down");
}
