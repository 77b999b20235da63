use phrasal_lab::config::Config;
use phrasal_lab::logging;
use phrasal_lab::workers::WorkerManager;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level, logging::file_log_dir());

    let addr = config.bind_addr();
    let cleanup_schedule = config.session_cleanup_schedule.clone();
    let idle_ttl = config.session_idle_ttl;

    let state = phrasal_lab::build_state(config).await;

    if let Err(err) = state.catalog().entries().await {
        tracing::error!(
            source = %state.catalog().source().describe(),
            error = %err,
            "phrasal verb dataset not loaded; sessions will retry on start"
        );
    }

    let worker_manager = match WorkerManager::new(state.sessions()).await {
        Ok(manager) => {
            if let Err(e) = manager.start(&cleanup_schedule, idle_ttl).await {
                tracing::error!(error = %e, "failed to start workers");
            }
            Some(manager)
        }
        Err(e) => {
            tracing::warn!(error = %e, "worker manager not initialized");
            None
        }
    };

    let app = phrasal_lab::create_app(state);

    tracing::info!(%addr, "phrasal-lab listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    if let Some(ref manager) = worker_manager {
        manager.stop().await;
    }

    tracing::info!("Graceful shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
