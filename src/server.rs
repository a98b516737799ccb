//! Server runtime.
//!
//! [`ServerHandle`] owns the whole lifecycle: metrics recorder, database and
//! migrations, repositories and services, the REST API, and graceful
//! shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::UserService;
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, InMemoryRepositoryProvider, SeaOrmRepositoryProvider};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup.
    pub auto_migrate: bool,
    /// Use the in-memory store instead of the configured database.
    pub in_memory: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            in_memory: false,
        }
    }
}

/// Handle to a running server.
///
/// ```rust,no_run
/// use postboard::server::{ServerHandle, ServerOptions};
///
/// # async fn run() -> Result<(), postboard::server::BoxError> {
/// let handle = ServerHandle::start(ServerOptions::default()).await?;
/// handle.install_signal_handler();
/// handle.shutdown_signal().wait().await;
/// handle.wait().await;
/// # Ok(())
/// # }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Address the API is bound to
    pub local_addr: std::net::SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
}

/// The global recorder can only be installed once per process, so a restart
/// within the same process reuses the first handle.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Metrics disabled: could not install recorder: {}", e);
                None
            }
        })
        .clone()
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, BoxError> {
        let config = opts.config;
        config.validate()?;

        info!("Starting postboard...");
        let metrics_handle = prometheus_handle();

        let (repos, db): (Arc<dyn RepositoryProvider>, Option<DatabaseConnection>) =
            if opts.in_memory {
                warn!("Using the in-memory store; data is lost on exit");
                (Arc::new(InMemoryRepositoryProvider::new()), None)
            } else {
                let db = init_database(&config.database_config()).await?;
                if opts.auto_migrate {
                    info!("Running database migrations...");
                    Migrator::up(&db, None).await?;
                    info!("Migrations completed");
                }
                (Arc::new(SeaOrmRepositoryProvider::new(db.clone())), Some(db))
            };

        let jwt = config.jwt_config();
        info!("JWT configured with {}h token expiration", jwt.expiration_hours);
        let users = UserService::new(repos.clone(), jwt);
        let state = AppState::new(repos.clone(), users, config.pagination_policy(), db.clone());
        let router = create_api_router(state, metrics_handle);

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let signal = shutdown.signal();

        let addr = config.server.address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async move {
                signal.wait().await;
                info!("REST API received shutdown signal");
            });
            if let Err(e) = server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the API task to drain (bounded by `server.shutdown_timeout`),
    /// then close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            mut api_task,
            ..
        } = self;

        let drained = shutdown
            .drain(async {
                if let Err(e) = (&mut api_task).await {
                    error!("REST API task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            api_task.abort();
        }

        if let Some(db) = db {
            match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!("Error closing database connection: {}", e),
            }
        }
        info!("postboard shutdown complete");
    }

    pub async fn shutdown(self) {
        info!("Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_before_binding() {
        let mut config = AppConfig::default();
        config.security.jwt_secret = String::new();

        let result = ServerHandle::start(ServerOptions {
            config,
            auto_migrate: false,
            in_memory: true,
        })
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn serves_health_until_shutdown() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = free_port();

        let handle = ServerHandle::start(ServerOptions {
            config,
            auto_migrate: false,
            in_memory: true,
        })
        .await
        .unwrap();
        assert!(handle.is_running());

        let mut stream = tokio::net::TcpStream::connect(handle.local_addr).await.unwrap();
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));

        handle.shutdown().await;
    }
}
