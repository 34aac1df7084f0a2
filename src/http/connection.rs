use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::timeout;

use crate::http::mime;
use crate::http::reader::{read_request, Incoming};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::http::writer::write_response;
use crate::resolver::{DocumentRoot, ResolveError, ResolvedTarget};

/// Read-only state every connection handler sees.
#[derive(Debug, Clone)]
pub struct ServeContext {
    pub root: DocumentRoot,
    /// Upper bound on reading the request line and header block.
    pub read_timeout: Duration,
}

/// Handles exactly one request on one connection, then closes it.
pub struct Connection<S> {
    stream: BufReader<S>,
    ctx: Arc<ServeContext>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, ctx: Arc<ServeContext>) -> Self {
        Self {
            stream: BufReader::new(stream),
            ctx,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => self.read().await?,

                ConnectionState::Processing(req) => {
                    let response = self.respond(&req).await;
                    tracing::info!(
                        method = %req.method,
                        path = %req.path,
                        version = req.version.as_deref().unwrap_or("-"),
                        status = response.status.as_u16(),
                        "Request handled"
                    );
                    ConnectionState::Writing(response)
                }

                ConnectionState::Writing(response) => {
                    write_response(self.stream.get_mut(), response)
                        .await
                        .context("sending response")?;
                    // Best effort: the peer may already be gone.
                    let _ = self.stream.get_mut().shutdown().await;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    async fn read(&mut self) -> anyhow::Result<ConnectionState> {
        let incoming = match timeout(self.ctx.read_timeout, read_request(&mut self.stream)).await {
            Ok(res) => res.context("reading request")?,
            Err(_) => {
                tracing::debug!("Timed out waiting for request, closing");
                return Ok(ConnectionState::Closed);
            }
        };

        Ok(match incoming {
            Incoming::Nothing => {
                tracing::debug!("Connection closed without a request");
                ConnectionState::Closed
            }
            Incoming::Malformed(e) => {
                tracing::warn!(error = %e, "Bad request line");
                ConnectionState::Writing(Response::bad_request())
            }
            Incoming::Request(req) => ConnectionState::Processing(req),
        })
    }

    /// Method dispatch and the GET pipeline.
    async fn respond(&self, req: &Request) -> Response {
        if req.method != Method::GET {
            tracing::warn!(method = %req.method, "Method not allowed");
            return Response::method_not_allowed();
        }

        let target = match self.ctx.root.resolve(&req.path).await {
            Ok(target) => target,
            Err(ResolveError::Forbidden) => {
                tracing::warn!(path = %req.path, "Rejected path outside document root");
                return Response::forbidden();
            }
            Err(ResolveError::NotFound) => {
                tracing::debug!(path = %req.path, "No such file");
                return Response::not_found();
            }
        };

        serve_file(&target).await
    }
}

/// Opens a resolved file for streaming; 500 when that fails.
async fn serve_file(target: &ResolvedTarget) -> Response {
    match open_target(target).await {
        Ok((file, len)) => Response::file(file, len, mime::content_type(&target.file_name)),
        Err(e) => {
            tracing::error!(path = %target.path.display(), error = %e, "Failed to open file");
            Response::internal_error()
        }
    }
}

async fn open_target(target: &ResolvedTarget) -> anyhow::Result<(File, u64)> {
    let file = File::open(&target.path).await?;
    let len = file.metadata().await?.len();
    Ok((file, len))
}
