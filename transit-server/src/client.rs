//! Async client for the session protocol.
//!
//! Performs the bind handoff and wraps each command in a typed call:
//!
//! ```no_run
//! # async fn demo() -> Result<(), transit_server::client::ClientError> {
//! use transit_server::client::SessionClient;
//!
//! let mut client = SessionClient::connect("127.0.0.1:55600".parse().unwrap()).await?;
//! let stations = client.stations_beginning_with("Grand").await?;
//! let legs = client.route(33, 30).await?;
//! client.close().await?;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;

use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::debug;

use crate::planner::RouteLeg;
use crate::protocol::{FrameReader, Request, fields, reply, send};

/// Errors from talking to the server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Socket operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server closed the connection before replying
    #[error("connection closed by server")]
    Closed,

    /// The server rejected the session key
    #[error("session key rejected: {0}")]
    Rejected(String),

    /// A route query named an unknown station
    #[error("invalid station")]
    InvalidStation,

    /// The stations are not connected
    #[error("no route found")]
    NoRoute,

    /// A route reply was not valid JSON
    #[error("malformed route: {0}")]
    Json(#[from] serde_json::Error),

    /// Any reply the client did not expect
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),
}

/// A connection to one session port.
#[derive(Debug)]
pub struct SessionClient {
    frames: FrameReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    port: u16,
}

impl SessionClient {
    /// Bind a session through the rendezvous listener, connect to it and
    /// authenticate.
    pub async fn connect(rendezvous: SocketAddr) -> Result<Self, ClientError> {
        let (port, secret) = Self::bind(rendezvous).await?;
        let mut client = Self::open(SocketAddr::new(rendezvous.ip(), port)).await?;
        client.authenticate(&secret).await?;
        Ok(client)
    }

    /// Ask the rendezvous listener for a session, returning its port and
    /// secret.
    pub async fn bind(rendezvous: SocketAddr) -> Result<(u16, String), ClientError> {
        let mut stream = TcpStream::connect(rendezvous).await?;
        let (read, mut write) = stream.split();

        send(&mut write, &Request::Bind.to_frame()).await?;
        let response = FrameReader::new(read)
            .next_message()
            .await?
            .ok_or(ClientError::Closed)?;

        let (port, secret) = reply::parse_bind(&response).ok_or(ClientError::UnexpectedReply(response))?;
        debug!(port, "Bound session");
        Ok((port, secret))
    }

    /// Connect to a session port without authenticating.
    pub async fn open(addr: SocketAddr) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        let (read, writer) = stream.into_split();
        Ok(Self {
            frames: FrameReader::new(read),
            writer,
            port: addr.port(),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Present the session secret.
    pub async fn authenticate(&mut self, secret: &str) -> Result<(), ClientError> {
        let response = self.request(&Request::Authenticate(secret.to_string())).await?;
        if response == reply::OK {
            Ok(())
        } else {
            Err(ClientError::Rejected(response))
        }
    }

    /// Descriptors of up to five stations whose name starts with `prefix`.
    pub async fn stations_beginning_with(&mut self, prefix: &str) -> Result<Vec<String>, ClientError> {
        let response = self
            .request(&Request::StationsBeginningWith(prefix.to_string()))
            .await?;
        Ok(fields(&response))
    }

    /// Whether a station has exactly this name.
    pub async fn is_valid_station(&mut self, name: &str) -> Result<bool, ClientError> {
        let response = self.request(&Request::IsValidStation(name.to_string())).await?;
        match fields(&response).as_slice() {
            [answer] if answer == "True" => Ok(true),
            [answer] if answer == "False" => Ok(false),
            _ => Err(ClientError::UnexpectedReply(response)),
        }
    }

    /// Route between two station ids. An empty list means the stations are
    /// the same.
    pub async fn route(&mut self, start: u32, end: u32) -> Result<Vec<RouteLeg>, ClientError> {
        let response = self
            .request(&Request::GetRoute {
                start: start.to_string(),
                end: end.to_string(),
            })
            .await?;

        match response.as_str() {
            reply::INVALID_STATION => Err(ClientError::InvalidStation),
            reply::NO_ROUTE => Err(ClientError::NoRoute),
            _ => {
                let json = response
                    .strip_prefix('<')
                    .and_then(|r| r.strip_suffix('>'))
                    .ok_or_else(|| ClientError::UnexpectedReply(response.clone()))?;
                Ok(serde_json::from_str(json)?)
            }
        }
    }

    /// Send an arbitrary message and return the raw reply.
    pub async fn send_raw(&mut self, message: &str) -> Result<String, ClientError> {
        send(&mut self.writer, message).await?;
        self.frames.next_message().await?.ok_or(ClientError::Closed)
    }

    /// End the session and wait for the server to hang up.
    pub async fn close(mut self) -> Result<(), ClientError> {
        send(&mut self.writer, &Request::EndOfSession.to_frame()).await?;
        match self.frames.next_message().await? {
            None => Ok(()),
            Some(response) => Err(ClientError::UnexpectedReply(response)),
        }
    }

    async fn request(&mut self, request: &Request) -> Result<String, ClientError> {
        self.send_raw(&request.to_frame()).await
    }
}
