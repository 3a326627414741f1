use anyhow::{Context, Result};
use database::SqliteTodoService;
use std::path::Path;
use std::sync::Arc;
use todo_api::TodoServer;
use tracing::info;

use crate::config::Config;

/// Open the SQLite store named by the configuration and bring its schema up
/// to date
pub async fn create_service(config: &Config) -> Result<Arc<SqliteTodoService>> {
    let database_path = &config.database.path;
    info!(database_path = %database_path, "Opening TODO store");

    ensure_database_directory(database_path)?;

    let service = SqliteTodoService::with_settings(database_path, config.pool_settings())
        .await
        .with_context(|| format!("Failed to open database at {database_path}"))?;

    service
        .migrate()
        .await
        .context("Failed to run database migrations")?;

    Ok(Arc::new(service))
}

/// Build the HTTP server on top of an opened store
pub fn create_server(
    service: Arc<SqliteTodoService>,
    config: &Config,
) -> Result<TodoServer<SqliteTodoService>> {
    let options = config.server_options()?;
    Ok(TodoServer::new(service, options))
}

/// Initialize the complete application
///
/// The service handle is returned alongside the server so the caller can
/// close the pool once serving stops.
pub async fn initialize_app(
    config: &Config,
) -> Result<(TodoServer<SqliteTodoService>, Arc<SqliteTodoService>)> {
    let service = create_service(config)
        .await
        .context("Failed to create TODO service")?;

    let server = create_server(Arc::clone(&service), config)
        .context("Failed to create server")?;

    info!("Application initialized successfully");
    Ok((server, service))
}

/// Ensure the database directory exists and lock down permissions
///
/// In-memory databases are left alone.
pub fn ensure_database_directory(database_path: &str) -> Result<()> {
    if database_path.contains(":memory:") || database_path.contains("mode=memory") {
        return Ok(());
    }

    let db_path = Path::new(
        database_path
            .strip_prefix("sqlite://")
            .unwrap_or(database_path),
    );

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating database directory: {}", parent.display());
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let permissions = std::fs::Permissions::from_mode(0o700);
                std::fs::set_permissions(parent, permissions)
                    .context("Failed to set directory permissions")?;
            }
        }
    }

    if db_path.exists() {
        set_secure_file_permissions(db_path)?;
    }

    Ok(())
}

/// Owner-only access on Unix
fn set_secure_file_permissions(file_path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(file_path, permissions)
            .with_context(|| format!("Failed to set permissions for {}", file_path.display()))?;
    }

    #[cfg(not(unix))]
    let _ = file_path;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use database::{CancellationToken, TodoService};

    fn config_for(path: String) -> Config {
        let mut config = Config::default();
        config.database.path = path;
        config
    }

    #[tokio::test]
    async fn test_create_service_creates_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join(".sqlite3").join("todo.db");

        let service = create_service(&config_for(db_path.display().to_string()))
            .await
            .unwrap();

        assert!(db_path.exists());
        let cancel = CancellationToken::new();
        let todo = service.create(&cancel, "buy milk", "").await.unwrap();
        assert_eq!(todo.id, 1);
    }

    #[tokio::test]
    async fn test_create_service_accepts_sqlite_url() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("url.db");

        let service = create_service(&config_for(format!("sqlite://{}", db_path.display())))
            .await;
        assert!(service.is_ok());
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_create_service_in_memory() {
        let service = create_service(&config_for(":memory:".to_string())).await.unwrap();
        let cancel = CancellationToken::new();
        assert!(service.health_check(&cancel).await.is_ok());
    }

    #[test]
    fn test_ensure_database_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("subdir").join("test.db");

        ensure_database_directory(&db_path.display().to_string()).unwrap();
        assert!(db_path.parent().unwrap().exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(db_path.parent().unwrap())
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }

    #[test]
    fn test_ensure_database_directory_ignores_memory_and_bare_names() {
        assert!(ensure_database_directory(":memory:").is_ok());
        assert!(ensure_database_directory("sqlite::memory:").is_ok());
        assert!(ensure_database_directory("todo.db").is_ok());
    }

    #[tokio::test]
    async fn test_initialize_app_rejects_bad_offset() {
        let mut config = config_for(":memory:".to_string());
        config.display.utc_offset = "Mars/Olympus".to_string();

        assert!(initialize_app(&config).await.is_err());
    }
}
