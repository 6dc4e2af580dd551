//! TCP server: accepts connections and answers newline-delimited requests.

use std::future::Future;
use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::Instrument;
use uuid::Uuid;

use devicehub_app::ports::EventPublisher;

use crate::dispatcher::Dispatcher;
use crate::error::{ProtocolError, TransportError};
use crate::protocol::Response;

/// Longest request line accepted, excluding the newline. Longer lines are
/// discarded and answered with a malformed-message failure.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Serve until the process ends.
pub async fn serve<P>(listener: TcpListener, dispatcher: Dispatcher<P>)
where
    P: EventPublisher + Send + Sync + 'static,
{
    serve_with_shutdown(listener, dispatcher, std::future::pending()).await;
}

/// Accept connections until `shutdown` resolves.
///
/// Each connection runs on its own task and keeps running after the accept
/// loop stops. Accept failures are logged and do not stop the loop.
pub async fn serve_with_shutdown<P, F>(
    listener: TcpListener,
    dispatcher: Dispatcher<P>,
    shutdown: F,
) where
    P: EventPublisher + Send + Sync + 'static,
    F: Future<Output = ()>,
{
    let mut shutdown = std::pin::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                tracing::info!("shutdown signal received, no longer accepting connections");
                return;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let connection_id = Uuid::new_v4();
                    let span = tracing::info_span!("connection", %connection_id, %peer);
                    let dispatcher = dispatcher.clone();
                    tokio::spawn(
                        async move {
                            if let Err(err) = handle_connection(stream, &dispatcher).await {
                                tracing::warn!(error = %err, "connection ended with error");
                            }
                        }
                        .instrument(span),
                    );
                }
                Err(err) => tracing::warn!(error = %err, "failed to accept connection"),
            },
        }
    }
}

async fn handle_connection<P: EventPublisher>(
    stream: TcpStream,
    dispatcher: &Dispatcher<P>,
) -> Result<(), TransportError> {
    tracing::info!("client connected");
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        let read = (&mut reader)
            .take(MAX_LINE_BYTES as u64 + 1)
            .read_until(b'\n', &mut buffer)
            .await?;
        if read == 0 {
            break;
        }

        if buffer.len() > MAX_LINE_BYTES && buffer.last() != Some(&b'\n') {
            tracing::warn!(limit = MAX_LINE_BYTES, "request line too long, discarding");
            discard_rest_of_line(&mut reader).await?;
            let err = ProtocolError::MalformedMessage(format!(
                "request line exceeds {MAX_LINE_BYTES} bytes"
            ));
            let mut response = Response::error(&err).to_string();
            response.push('\n');
            writer.write_all(response.as_bytes()).await?;
            continue;
        }

        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut response = dispatcher.handle_request(line);
        response.push('\n');
        writer.write_all(response.as_bytes()).await?;
    }

    tracing::info!("client disconnected");
    Ok(())
}

/// Skip input up to and including the next newline without buffering it.
async fn discard_rest_of_line<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&byte| byte == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}
