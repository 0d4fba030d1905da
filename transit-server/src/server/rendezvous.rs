//! The rendezvous listener: the well-known port that hands out sessions.
//!
//! A client connects, sends `<bind>`, and receives a session port and a
//! secret. The rendezvous connection is then closed and the client carries on
//! over the session port. Nothing but binding is served here. Connections are
//! accepted in a loop and each is answered in its own task.

use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};

use rand::Rng;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::logging::SUCCESS;
use crate::protocol::{FrameReader, Request, reply, send};

use super::error::ServerError;
use super::session::Session;
use super::state::AppState;

/// The bound rendezvous listener.
#[derive(Debug)]
pub struct RendezvousServer {
    listener: TcpListener,
    state: AppState,
}

impl RendezvousServer {
    /// Bind the rendezvous address from the configuration.
    ///
    /// Failure to bind is never fatal: the attempt is logged and retried
    /// after `bind_retry_delay`, for as long as it takes.
    pub async fn bind(state: AppState) -> Self {
        let addr = state.config.rendezvous_addr;
        let delay = state.config.bind_retry_delay;

        loop {
            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    let bound = listener.local_addr().unwrap_or(addr);
                    info!(target: SUCCESS, addr = %bound, "Rendezvous listener started");
                    return Self { listener, state };
                }
                Err(err) => {
                    error!(
                        addr = %addr,
                        error = %err,
                        retry_in = ?delay,
                        "Failed to start rendezvous listener, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept clients forever, answering each in its own task.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    info!(peer = %peer, "Rendezvous accepted connection");
                    let ip = match stream.local_addr() {
                        Ok(local) => local.ip(),
                        Err(err) => {
                            warn!(peer = %peer, error = %err, "Rendezvous connection has no local address");
                            continue;
                        }
                    };
                    tokio::spawn(serve(self.state.clone(), ip, stream, peer));
                }
                Err(err) => {
                    error!(error = %err, "Failed to accept rendezvous connection");
                }
            }
        }
    }
}

/// Answer one client until it binds, ends, or disconnects.
async fn serve(state: AppState, ip: IpAddr, mut stream: TcpStream, peer: SocketAddr) {
    let (read, mut write) = stream.split();
    let mut frames = FrameReader::new(read);

    loop {
        let message = match frames.next_message().await {
            Ok(Some(message)) => message,
            Ok(None) => {
                debug!(peer = %peer, "Client left the rendezvous");
                return;
            }
            Err(err) => {
                debug!(peer = %peer, error = %err, "Rendezvous read failed");
                return;
            }
        };

        let reply = match Request::parse(&message) {
            Ok(Request::EndOfSession) => {
                debug!(peer = %peer, "Client ended the rendezvous");
                return;
            }
            Ok(Request::Bind) => {
                info!(peer = %peer, "Received bind request");
                match open_session(&state, ip).await {
                    Ok((session, secret)) => {
                        let port = session.port();
                        if let Err(err) = send(&mut write, &reply::bind(port, &secret)).await {
                            warn!(peer = %peer, port, error = %err, "Failed to send session key, discarding it");
                            state.keys.redeem(port, &secret).await;
                            return;
                        }
                        tokio::spawn(session.run());
                        return;
                    }
                    Err(err) => {
                        error!(peer = %peer, error = %err, "Failed to open session");
                        reply::error(&err)
                    }
                }
            }
            Ok(request) => {
                warn!(peer = %peer, ?request, "Session command sent to the rendezvous port");
                reply::SESSION_COMMAND_ON_RENDEZVOUS.to_string()
            }
            Err(err) => {
                warn!(peer = %peer, request = %message, error = %err, "Malformed request on rendezvous port");
                reply::error(&err)
            }
        };

        if let Err(err) = send(&mut write, &reply).await {
            debug!(peer = %peer, error = %err, "Failed to contact client, most likely closed");
            return;
        }
    }
}

/// Bind a session listener on `ip` and issue its key.
async fn open_session(state: &AppState, ip: IpAddr) -> Result<(Session, String), ServerError> {
    let (listener, port) = allocate(ip, state).await?;
    let secret = state.keys.issue(port).await;
    info!(port, "Generated key for session");

    Ok((Session::new(listener, port, state.clone()), secret))
}

/// Bind a listener on a random free session port.
///
/// Ports are drawn at random from the configured range; each port is tried
/// at most once.
async fn allocate(ip: IpAddr, state: &AppState) -> Result<(TcpListener, u16), ServerError> {
    let range = state.config.session_ports.clone();
    let total = range.clone().count();
    let mut attempted = HashSet::with_capacity(total.min(64));

    while attempted.len() < total {
        let port = rand::rng().random_range(range.clone());
        if !attempted.insert(port) {
            continue;
        }
        match TcpListener::bind((ip, port)).await {
            Ok(listener) => return Ok((listener, port)),
            Err(err) => debug!(port, error = %err, "Session port unavailable"),
        }
    }

    Err(ServerError::PortsExhausted {
        low: *range.start(),
        high: *range.end(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::config::ServerConfig;
    use crate::network::fixtures;

    fn state_with(ports: std::ops::RangeInclusive<u16>) -> AppState {
        let config = ServerConfig {
            rendezvous_addr: "127.0.0.1:0".parse().unwrap(),
            session_ports: ports,
            ..ServerConfig::default()
        };
        AppState::new(fixtures::network(), config)
    }

    #[tokio::test]
    async fn allocate_skips_taken_ports() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let taken_port = taken.local_addr().unwrap().port();
        let free = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let free_port = free.local_addr().unwrap().port();
        drop(free);

        let state = state_with(free_port..=free_port);
        let (_listener, port) = allocate("127.0.0.1".parse().unwrap(), &state).await.unwrap();
        assert_eq!(port, free_port);

        let state = state_with(taken_port..=taken_port);
        let err = allocate("127.0.0.1".parse().unwrap(), &state).await.unwrap_err();
        assert!(matches!(err, ServerError::PortsExhausted { low, high } if low == taken_port && high == taken_port));
    }

    #[tokio::test]
    async fn bind_retries_until_the_port_frees_up() {
        let blocker = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = blocker.local_addr().unwrap();

        let config = ServerConfig {
            rendezvous_addr: addr,
            bind_retry_delay: Duration::from_millis(20),
            ..ServerConfig::default()
        };
        let state = AppState::new(fixtures::network(), config);

        let binding = tokio::spawn(RendezvousServer::bind(state));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!binding.is_finished());

        drop(blocker);
        let server = tokio::time::timeout(Duration::from_secs(5), binding)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(server.local_addr().unwrap(), addr);
    }

    #[tokio::test]
    async fn open_session_issues_a_key() {
        let state = state_with(crate::config::EPHEMERAL_PORTS);
        let keys = Arc::clone(&state.keys);

        let (session, secret) = open_session(&state, "127.0.0.1".parse().unwrap()).await.unwrap();
        assert!(crate::config::EPHEMERAL_PORTS.contains(&session.port()));
        assert_eq!(keys.len().await, 1);
        assert!(keys.redeem(session.port(), &secret).await);
    }

    #[tokio::test]
    async fn idle_client_does_not_block_binds() {
        let server = RendezvousServer::bind(state_with(crate::config::EPHEMERAL_PORTS)).await;
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());

        let _idle = TcpStream::connect(addr).await.unwrap();
        let bound = tokio::time::timeout(Duration::from_secs(5), crate::client::SessionClient::bind(addr))
            .await
            .unwrap()
            .unwrap();
        assert!(crate::config::EPHEMERAL_PORTS.contains(&bound.0));
    }
}
