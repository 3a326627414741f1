use anyhow::{Context, Result};
use clap::Parser;
use todo_server::{
    init_telemetry, initialize_app, log_shutdown_info, log_startup_info, Config,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "todo-server")]
#[command(about = "TODO REST API server")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CONFIG_FILE")]
    config: Option<String>,

    /// SQLite database path override
    #[arg(long, env = "DB_PATH")]
    db_path: Option<String>,

    /// Port override (`8080`, `:8080` or `host:8080`)
    #[arg(long, env = "PORT")]
    port: Option<String>,

    /// Listen address override
    #[arg(long, env = "LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// Log level override
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Display offset override, e.g. `+09:00`
    #[arg(long, env = "UTC_OFFSET")]
    utc_offset: Option<String>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(config_file) => Config::from_file(config_file)?,
        None => Config::from_env()?,
    };

    if let Some(ref db_path) = cli.db_path {
        config.database.path = db_path.clone();
    }

    if let Some(ref listen_addr) = cli.listen_addr {
        config.server.listen_addr = listen_addr.clone();
    }

    // After listen_addr so `host:port` forms win
    if let Some(ref port) = cli.port {
        config.apply_port(port)?;
    }

    if let Some(ref log_level) = cli.log_level {
        config.logging.level = log_level.clone();
    }

    if let Some(ref utc_offset) = cli.utc_offset {
        config.display.utc_offset = utc_offset.clone();
    }

    Ok(config)
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, initiating graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = load_config(&cli).context("Failed to load configuration")?;

    init_telemetry(&config.logging).context("Failed to initialize telemetry")?;

    if let Err(e) = config.validate() {
        error!(error = %e, "Configuration validation failed");
        std::process::exit(1);
    }

    log_startup_info(&config);

    let (server, service) = initialize_app(&config)
        .await
        .context("Failed to initialize application")?;

    let addr = config.server_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let result = server.serve_with_shutdown(listener, shutdown_signal()).await;

    service.close().await;

    match result {
        Ok(()) => {
            log_shutdown_info();
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "TODO server error");
            std::process::exit(3);
        }
    }
}
