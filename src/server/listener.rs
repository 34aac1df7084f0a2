use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::http::connection::{Connection, ServeContext};
use crate::server::lifecycle::Status;

/// Pause after a failed accept before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Worker pool limits and shutdown behaviour for one accept loop.
#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
    /// Connections handled concurrently; extra ones wait for a free slot.
    pub workers: usize,
    /// How long a stop waits for in-flight connections before aborting them.
    pub shutdown_grace: Duration,
}

/// Accepts connections until `status` leaves [`Status::Running`].
///
/// Every connection is spawned at once and then waits for one of
/// `pool.workers` permits, so a saturated pool queues work instead of
/// refusing it and the loop never waits on a handler. The listener is
/// dropped, freeing the port, before in-flight handlers are drained.
pub async fn run(
    listener: TcpListener,
    ctx: Arc<ServeContext>,
    pool: PoolOptions,
    mut status: watch::Receiver<Status>,
) {
    let permits = Arc::new(Semaphore::new(pool.workers.max(1)));
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            res = listener.accept() => match res {
                Ok((socket, peer)) => {
                    debug!(%peer, "Accepted connection");

                    let permits = Arc::clone(&permits);
                    let ctx = Arc::clone(&ctx);
                    tasks.spawn(async move {
                        let Ok(_permit) = permits.acquire_owned().await else {
                            return;
                        };
                        let mut conn = Connection::new(socket, ctx);
                        if let Err(e) = conn.run().await {
                            error!(%peer, error = %format!("{:#}", e), "Connection error");
                        }
                    });
                }
                Err(e) => {
                    if *status.borrow() != Status::Running {
                        break;
                    }
                    error!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },

            changed = status.changed() => {
                if changed.is_err() || *status.borrow_and_update() != Status::Running {
                    break;
                }
            }

            Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = res {
                    if e.is_panic() {
                        error!("Connection handler panicked");
                    }
                }
            }
        }
    }

    let addr = listener.local_addr().ok();
    drop(listener);
    info!(addr = ?addr, "Listener closed");

    drain(tasks, pool.shutdown_grace).await;
}

/// Lets running handlers finish within `grace`, then aborts the rest.
async fn drain(mut tasks: JoinSet<()>, grace: Duration) {
    if tasks.is_empty() {
        return;
    }

    debug!(in_flight = tasks.len(), "Waiting for connections to finish");
    let finished = tokio::time::timeout(grace, async {
        while tasks.join_next().await.is_some() {}
    })
    .await;

    if finished.is_err() {
        warn!(remaining = tasks.len(), "Aborting connections still running after grace period");
        tasks.shutdown().await;
    }
}
