//! # Update Server
//!
//! TCP front end for the controller. Each connection is served by its own
//! task; a semaphore caps how many run at once. A permit is taken before
//! `accept`, so surplus clients wait in the listen backlog.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Semaphore};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;
use veriflow_telemetry::{metric_inc, COMMANDS, CONNECTIONS_ACTIVE};

use crate::config::ChannelConfig;
use crate::error::{ChannelError, CommandError};
use crate::ports::CommandDispatcher;
use crate::protocol::{parse_command, Response};

/// Controller-facing server.
pub struct UpdateServer {
    config: ChannelConfig,
    dispatcher: Arc<dyn CommandDispatcher>,
}

impl UpdateServer {
    pub fn new(config: ChannelConfig, dispatcher: Arc<dyn CommandDispatcher>) -> Self {
        Self { config, dispatcher }
    }

    /// Validate the configuration and bind the listener.
    pub async fn bind(&self) -> Result<TcpListener, ChannelError> {
        self.config.validate()?;
        let addr = self.config.listen_addr();
        TcpListener::bind(&addr)
            .await
            .map_err(|source| ChannelError::Bind { addr, source })
    }

    /// Accept connections until `shutdown` flips to `true` or its sender is
    /// dropped. Connections already being served finish on their own.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), ChannelError> {
        let local = listener.local_addr()?;
        info!(
            addr = %local,
            workers = self.config.max_connections,
            "[vf-02] Update channel listening"
        );

        let permits = Arc::new(Semaphore::new(self.config.max_connections));
        loop {
            let permit = tokio::select! {
                permit = permits.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
                _ = shutdown.changed() => break,
            };

            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "[vf-02] Accept failed");
                        continue;
                    }
                },
                _ = shutdown.changed() => break,
            };

            let dispatcher = self.dispatcher.clone();
            let max_line_bytes = self.config.max_line_bytes;
            let span = info_span!("connection", id = %Uuid::new_v4(), peer = %peer);
            tokio::spawn(
                async move {
                    let _permit = permit;
                    CONNECTIONS_ACTIVE.inc();
                    let served = serve_connection(stream, peer, dispatcher, max_line_bytes).await;
                    if let Err(e) = served {
                        warn!(error = %e, "[vf-02] Connection ended with error");
                    }
                    CONNECTIONS_ACTIVE.dec();
                }
                .instrument(span),
            );
        }

        info!("[vf-02] Update channel stopped accepting");
        Ok(())
    }
}

/// Serve one controller connection: read a line, dispatch, reply.
async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    dispatcher: Arc<dyn CommandDispatcher>,
    max_line_bytes: usize,
) -> Result<(), ChannelError> {
    info!(peer = %peer, "[vf-02] Connection accepted");
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = Vec::with_capacity(256);

    loop {
        line.clear();
        let read = (&mut reader)
            .take(max_line_bytes as u64 + 1)
            .read_until(b'\n', &mut line)
            .await?;
        if read == 0 {
            break;
        }

        let body_len = line.strip_suffix(b"\n").map_or(line.len(), <[u8]>::len);
        if body_len > max_line_bytes {
            if !line.ends_with(b"\n") {
                discard_line(&mut reader).await?;
            }
            let response =
                Response::Rejected(format!("command exceeds {max_line_bytes} bytes"));
            warn!(peer = %peer, "[vf-02] Oversized command dropped");
            metric_inc!(COMMANDS, &["invalid", response.outcome()]);
            writer.write_all(format!("{response}\n").as_bytes()).await?;
            continue;
        }

        let parsed = match std::str::from_utf8(&line) {
            Ok(text) => parse_command(text),
            Err(_) => Err(CommandError::InvalidUtf8),
        };
        let response = match parsed {
            Ok(command) => dispatcher.dispatch(command).await,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                let input = String::from_utf8_lossy(&line);
                debug!(input = %input.trim(), error = %e, "[vf-02] Unparseable command");
                let response = Response::Rejected(e.to_string());
                metric_inc!(COMMANDS, &["invalid", response.outcome()]);
                response
            }
        };
        writer.write_all(format!("{response}\n").as_bytes()).await?;
    }

    info!(peer = %peer, "[vf-02] Connection closed");
    Ok(())
}

/// Skip input up to and including the next newline without buffering it.
async fn discard_line<R>(reader: &mut R) -> Result<(), ChannelError>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let chunk = reader.fill_buf().await?;
        if chunk.is_empty() {
            return Ok(());
        }
        match chunk.iter().position(|&b| b == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let len = chunk.len();
                reader.consume(len);
            }
        }
    }
}
