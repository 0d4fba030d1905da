//! Per-client sessions on a dedicated port.
//!
//! A session accepts exactly one connection. The client must first present
//! the secret it was given at bind time; after that it may send any number
//! of lookup and routing commands until it sends `<EOF>` or disconnects.

use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::logging::SUCCESS;
use crate::network::StationId;
use crate::protocol::{FrameReader, Request, reply, send};

use super::state::AppState;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a valid key.
    Unauthenticated,
    /// Serving commands.
    Authenticated,
}

/// A session listener waiting for its client.
#[derive(Debug)]
pub struct Session {
    listener: TcpListener,
    port: u16,
    state: AppState,
}

impl Session {
    pub fn new(listener: TcpListener, port: u16, state: AppState) -> Self {
        Self {
            listener,
            port,
            state,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Accept the client and serve it until the session ends.
    ///
    /// Transport errors end the session quietly; nothing is propagated.
    pub async fn run(self) {
        let Session {
            listener,
            port,
            state,
        } = self;

        let (mut stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!(port, error = %err, "Session listener failed to accept");
                return;
            }
        };
        drop(listener);
        info!(port, peer = %peer, "Session accepted connection");

        let mut handler = Handler::new(port, state);
        let (read, mut write) = stream.split();
        let mut frames = FrameReader::new(read);

        loop {
            let message = match frames.next_message().await {
                Ok(Some(message)) => message,
                Ok(None) => {
                    debug!(port, "Client disconnected");
                    break;
                }
                Err(err) => {
                    debug!(port, error = %err, "Session read failed");
                    break;
                }
            };

            let Some(reply) = handler.respond(&message).await else {
                debug!(port, "Client ended the session");
                break;
            };

            if let Err(err) = send(&mut write, &reply).await {
                debug!(port, error = %err, "Failed to contact client, most likely closed");
                break;
            }
        }

        info!(port, "Session closed");
    }
}

/// Protocol state for one connection.
#[derive(Debug)]
pub(crate) struct Handler {
    port: u16,
    state: AppState,
    phase: Phase,
}

impl Handler {
    pub(crate) fn new(port: u16, state: AppState) -> Self {
        Self {
            port,
            state,
            phase: Phase::Unauthenticated,
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    /// The reply to one message, or `None` once the session should close.
    pub(crate) async fn respond(&mut self, message: &str) -> Option<String> {
        let port = self.port;
        let request = Request::parse(message);

        if request == Ok(Request::EndOfSession) {
            return None;
        }

        match (self.phase, request) {
            (Phase::Unauthenticated, Ok(Request::Authenticate(secret))) => {
                if self.state.keys.redeem(port, &secret).await {
                    self.phase = Phase::Authenticated;
                    info!(target: SUCCESS, port, "Key for session was valid");
                    Some(reply::OK.to_string())
                } else {
                    warn!(port, "Key for session was invalid");
                    Some(reply::RETRY.to_string())
                }
            }
            (Phase::Unauthenticated, _) => {
                warn!(port, "No key was sent on first interaction with session");
                Some(reply::RETRY.to_string())
            }
            (Phase::Authenticated, Ok(request)) => answer(&self.state, request),
            (Phase::Authenticated, Err(err)) => {
                warn!(port, request = message, error = %err, "Malformed request");
                Some(reply::error(&err))
            }
        }
    }
}

/// Serve one command for an authenticated client.
pub(crate) fn answer(state: &AppState, request: Request) -> Option<String> {
    let reply = match request {
        Request::EndOfSession => return None,
        Request::Authenticate(_) => reply::ALREADY_AUTHENTICATED.to_string(),
        Request::Bind => reply::BIND_ON_SESSION.to_string(),
        Request::StationsBeginningWith(prefix) => {
            info!(prefix = %prefix, "Stations beginning with");
            reply::stations(&state.index.find_prefix(&prefix))
        }
        Request::IsValidStation(name) => {
            info!(name = %name, "Is valid station");
            reply::boolean(state.index.is_valid_name(&name))
        }
        Request::GetRoute { start, end } => {
            info!(start = %start, end = %end, "Get route");
            route(state, &start, &end)
        }
    };
    Some(reply)
}

fn route(state: &AppState, start: &str, end: &str) -> String {
    let (Some(from), Some(to)) = (station_id(state, start), station_id(state, end)) else {
        return reply::INVALID_STATION.to_string();
    };

    match state.planner.route(from, to) {
        Some(route) => reply::route(&route.legs).unwrap_or_else(|err| {
            error!(error = %err, "Failed to serialise route");
            reply::error(&err)
        }),
        None => reply::NO_ROUTE.to_string(),
    }
}

/// Resolve a station id sent by the client.
fn station_id(state: &AppState, raw: &str) -> Option<StationId> {
    let Ok(id) = raw.trim().parse::<u32>() else {
        warn!(id = raw, "Station id is not a number");
        return None;
    };
    state.index.by_id(StationId(id)).map(|station| station.id)
}
