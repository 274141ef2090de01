use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::Handle;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kitchenprint_core::{
    create_notice_system, load_config, validate_config, ConfigStore, CupsPrintSink, FtpTransport,
    LocalDirTransport, LogPrintSink, PeriodicScheduler, PipelineConfig, PrintBackend,
    PrintPipeline, PrintSink, RemoteBackend, RemoteTransport, SecretCipher, SqliteConfigStore,
};
use kitchenprint_server::api::create_router;
use kitchenprint_server::state::AppState;

/// Buffer size for the notice channel
const NOTICE_BUFFER_SIZE: usize = 256;

/// Notices kept for the control API
const NOTICE_HISTORY: usize = 200;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("KITCHENPRINT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Settings database: {:?}", config.storage.path);

    let cipher = SecretCipher::from_passphrase(&config.storage.secret_key)
        .context("Failed to derive the settings encryption key")?;
    let store: Arc<dyn ConfigStore> = Arc::new(
        SqliteConfigStore::new(&config.storage.path, cipher)
            .context("Failed to open settings store")?,
    );
    info!("Settings store initialized");

    let (notify, notice_writer, recent_notices) =
        create_notice_system(NOTICE_BUFFER_SIZE, NOTICE_HISTORY);
    let writer_handle = tokio::spawn(notice_writer.run());

    let transport: Arc<dyn RemoteTransport> = match config.remote.backend {
        RemoteBackend::Ftp => {
            info!(
                "Using FTP transport (default port {}, timeout {}s)",
                config.remote.ftp.port, config.remote.ftp.timeout_secs
            );
            Arc::new(FtpTransport::new(config.remote.ftp.clone()))
        }
        RemoteBackend::Local => {
            let local = config
                .remote
                .local
                .as_ref()
                .context("remote.backend is \"local\" but [remote.local] is missing")?;
            info!("Using local drop folder at {:?}", local.root);
            Arc::new(LocalDirTransport::new(local.root.clone()))
        }
    };

    let sink: Arc<dyn PrintSink> = match config.printing.backend {
        PrintBackend::Cups => {
            info!("Printing through CUPS ({})", config.printing.lp_command);
            Arc::new(CupsPrintSink::new(&config.printing))
        }
        PrintBackend::Log => {
            info!(
                "Dry-run printing, devices: {:?}",
                config.printing.log_devices
            );
            Arc::new(LogPrintSink::new(config.printing.log_devices.clone()))
        }
    };

    let pipeline = Arc::new(PrintPipeline::new(
        PipelineConfig::from(&config),
        Arc::clone(&store),
        transport,
        Arc::clone(&sink),
        notify.clone(),
    ));
    info!(
        "Watching {} for {}_<timestamp>.pdf, staging in {:?}",
        config.remote.directory, config.remote.prefix, config.printing.staging_dir
    );

    let scheduler =
        Arc::new(PeriodicScheduler::new(Handle::current()).with_notifier(notify.clone()));

    let state = Arc::new(AppState::new(
        config.clone(),
        store,
        sink,
        pipeline,
        Arc::clone(&scheduler),
        notify.clone(),
        recent_notices,
    ));

    if config.scheduler.autostart {
        match state.launch().await {
            Ok(interval_secs) => info!("Autostarted polling every {}s", interval_secs),
            Err(e) => warn!("Autostart skipped: {}", e),
        }
    }

    let app = create_router(Arc::clone(&state));

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    scheduler.kill().await;

    // The writer stops once every notify handle is gone.
    drop(state);
    drop(scheduler);
    drop(notify);
    if tokio::time::timeout(Duration::from_secs(2), writer_handle)
        .await
        .is_err()
    {
        warn!("Notice writer did not stop in time");
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
