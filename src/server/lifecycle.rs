//! Server lifecycle: the control surface a host application drives.
//!
//! A [`FileServer`] moves through `Stopped -> Starting -> Running ->
//! Stopping -> Stopped`. Start and stop hold one async lock for their whole
//! duration, so two transitions can never overlap; the current [`Status`]
//! lives in a watch channel that readers and the accept loop observe
//! without taking that lock.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::http::connection::ServeContext;
use crate::resolver::DocumentRoot;
use crate::server::listener::{self, PoolOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Stopped,
    Starting,
    Running,
    Stopping,
}

/// Outcome of [`FileServer::start`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StartResult {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Outcome of [`FileServer::stop`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StopResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Snapshot returned by [`FileServer::info`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub is_running: bool,
    pub port: Option<u16>,
    pub document_root: Option<String>,
}

/// Tunables that apply to every run of a [`FileServer`].
#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    pub workers: usize,
    pub read_timeout: Duration,
    pub shutdown_grace: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for ServerOptions {
    fn from(cfg: &ServerConfig) -> Self {
        Self {
            workers: cfg.workers,
            read_timeout: cfg.read_timeout(),
            shutdown_grace: cfg.shutdown_grace(),
        }
    }
}

/// What exists only while the server is running.
struct RunningServer {
    addr: SocketAddr,
    root: DocumentRoot,
    accept_task: JoinHandle<()>,
}

/// An embeddable static file server.
pub struct FileServer {
    options: ServerOptions,
    lifecycle: Mutex<Option<RunningServer>>,
    status: watch::Sender<Status>,
}

impl Default for FileServer {
    fn default() -> Self {
        Self::new(ServerOptions::default())
    }
}

impl FileServer {
    pub fn new(options: ServerOptions) -> Self {
        let (status, _) = watch::channel(Status::Stopped);
        Self {
            options,
            lifecycle: Mutex::new(None),
            status,
        }
    }

    /// The process-wide server, created with default options on first use.
    pub fn global() -> &'static FileServer {
        static SERVER: OnceLock<FileServer> = OnceLock::new();
        SERVER.get_or_init(FileServer::default)
    }

    /// Binds `0.0.0.0:port` and starts serving `document_root`.
    ///
    /// Returns once the socket is bound; connections are accepted on a
    /// background task. Port 0 picks a free port, reported in the result.
    pub async fn start(&self, port: u16, document_root: impl AsRef<Path>) -> StartResult {
        let mut running = self.lifecycle.lock().await;

        if running.is_some() {
            warn!("Start requested while already running");
            return StartResult::failed("Server is already running");
        }

        self.status.send_replace(Status::Starting);

        match self.launch(port, document_root.as_ref()).await {
            Ok(server) => {
                let port = server.addr.port();
                let root = server.root.path().display().to_string();
                info!(port, document_root = %root, "Server started");

                *running = Some(server);
                StartResult {
                    success: true,
                    url: Some(format!("http://0.0.0.0:{}", port)),
                    local_url: Some(format!("http://127.0.0.1:{}", port)),
                    port: Some(port),
                    document_root: Some(root),
                    error: None,
                }
            }
            Err(e) => {
                self.status.send_replace(Status::Stopped);
                error!(port, error = %format!("{:#}", e), "Server failed to start");
                StartResult::failed(format!("{:#}", e))
            }
        }
    }

    async fn launch(&self, port: u16, document_root: &Path) -> anyhow::Result<RunningServer> {
        let root = DocumentRoot::open(document_root).await?;

        let socket = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind port {}: {}", port, e))?;
        let addr = socket.local_addr()?;

        let ctx = Arc::new(ServeContext {
            root: root.clone(),
            read_timeout: self.options.read_timeout,
        });
        let pool = PoolOptions {
            workers: self.options.workers,
            shutdown_grace: self.options.shutdown_grace,
        };

        // Running must be visible before the loop first looks at it.
        self.status.send_replace(Status::Running);
        let accept_task = tokio::spawn(listener::run(socket, ctx, pool, self.status.subscribe()));

        Ok(RunningServer {
            addr,
            root,
            accept_task,
        })
    }

    /// Stops the server. Succeeds without doing anything when not running.
    ///
    /// Returns after the listening socket is closed and in-flight
    /// connections have finished or been aborted after the grace period.
    pub async fn stop(&self) -> StopResult {
        let mut running = self.lifecycle.lock().await;

        let Some(server) = running.take() else {
            return StopResult {
                success: true,
                error: None,
            };
        };

        self.status.send_replace(Status::Stopping);
        let joined = server.accept_task.await;
        self.status.send_replace(Status::Stopped);

        match joined {
            Ok(()) => {
                info!(port = server.addr.port(), "Server stopped");
                StopResult {
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, "Accept loop ended abnormally");
                StopResult {
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.status() == Status::Running
    }

    pub fn status(&self) -> Status {
        *self.status.borrow()
    }

    /// The bound address, while running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.lifecycle.lock().await.as_ref().map(|s| s.addr)
    }

    pub async fn info(&self) -> ServerInfo {
        let running = self.lifecycle.lock().await;
        ServerInfo {
            is_running: self.is_running(),
            port: running.as_ref().map(|s| s.addr.port()),
            document_root: running
                .as_ref()
                .map(|s| s.root.path().display().to_string()),
        }
    }
}
