//! Server replies. Every reply is a single frame.

use std::fmt::Display;

use crate::network::Station;
use crate::planner::RouteLeg;

use super::frame::{DELIMITER, encode, fields};

/// Authentication accepted.
pub const OK: &str = "<200>";

/// A route query named a station id that does not exist.
pub const INVALID_STATION: &str = "<Invalid Station>";

/// Both stations exist but are not connected.
pub const NO_ROUTE: &str = "<No route found>";

/// Anything other than a valid key before authentication.
pub const RETRY: &str = "<No valid key was sent on first interaction with this session. Please retry, or send EOF to end the connection>";

/// A key sent to a session that is already authenticated.
pub const ALREADY_AUTHENTICATED: &str = "<This session is already authenticated>";

/// A bind sent to a session port.
pub const BIND_ON_SESSION: &str = "<Bind requests must be sent to the rendezvous port>";

/// A session command sent to the rendezvous port.
pub const SESSION_COMMAND_ON_RENDEZVOUS: &str =
    "<Only bind requests are accepted here. Connect to your session port instead>";

/// `<True>` or `<False>`.
pub fn boolean(value: bool) -> String {
    encode(&[if value { "True" } else { "False" }])
}

/// Station descriptors, `<>` when there are none.
pub fn stations(stations: &[&Station]) -> String {
    let descriptors: Vec<String> = stations.iter().map(ToString::to_string).collect();
    encode(&descriptors)
}

/// A route as a JSON array of legs.
pub fn route(legs: &[RouteLeg]) -> Result<String, serde_json::Error> {
    Ok(encode(&[serde_json::to_string(legs)?]))
}

/// Framed error message.
pub fn error(err: &impl Display) -> String {
    encode(&[err.to_string()])
}

/// Session handoff: the port to reconnect to and the secret to present.
pub fn bind(port: u16, secret: &str) -> String {
    format!("<Port:{DELIMITER}{port}{DELIMITER}Key:{DELIMITER}{secret}>")
}

/// Read a [`bind`] reply back into its port and secret.
pub fn parse_bind(frame: &str) -> Option<(u16, String)> {
    match fields(frame).as_slice() {
        [label, port, key, secret] if label == "Port:" && key == "Key:" => {
            Some((port.parse().ok()?, secret.clone()))
        }
        _ => None,
    }
}
