//! Async line-framed client for the device server.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use devicehub_domain::device::{DeviceAction, DeviceType, SensorType};
use devicehub_domain::id::DeviceId;

use crate::error::TransportError;
use crate::protocol::{Request, Response};

/// One connection to a device server. Requests are answered in order.
pub struct DeviceClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl DeviceClient {
    /// Connect to a server.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] when the connection cannot be opened.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, TransportError> {
        let (reader, writer) = TcpStream::connect(addr).await?.into_split();
        Ok(Self {
            reader: BufReader::new(reader),
            writer,
        })
    }

    /// Send an arbitrary JSON message and wait for its response.
    ///
    /// # Errors
    ///
    /// Fails on socket errors, when the server closes the connection, or when
    /// the reply is not a response envelope.
    pub async fn send(&mut self, message: &Value) -> Result<Response, TransportError> {
        self.send_line(&message.to_string()).await
    }

    /// Send one raw line (a trailing newline is added).
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub async fn send_line(&mut self, line: &str) -> Result<Response, TransportError> {
        let mut framed = String::with_capacity(line.len() + 1);
        framed.push_str(line);
        framed.push('\n');
        self.writer.write_all(framed.as_bytes()).await?;

        let mut reply = String::new();
        if self.reader.read_line(&mut reply).await? == 0 {
            return Err(TransportError::Closed);
        }
        serde_json::from_str(&reply).map_err(TransportError::Decode)
    }

    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub async fn request(&mut self, request: &Request) -> Result<Response, TransportError> {
        tracing::debug!(?request, "sending request");
        self.send(&request.to_message()).await
    }

    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub async fn create_device(
        &mut self,
        device_type: DeviceType,
        device_id: DeviceId,
        sensor_type: Option<SensorType>,
    ) -> Result<Response, TransportError> {
        self.request(&Request::Create {
            device_id,
            device_type,
            sensor_type,
        })
        .await
    }

    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub async fn control_device(
        &mut self,
        device_id: DeviceId,
        action: DeviceAction,
        value: Option<i64>,
    ) -> Result<Response, TransportError> {
        self.request(&Request::Control {
            device_id,
            action,
            value: value.map(|value| value.to_string()),
        })
        .await
    }

    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub async fn get_state(&mut self, device_id: DeviceId) -> Result<Response, TransportError> {
        self.request(&Request::GetState { device_id }).await
    }
}
