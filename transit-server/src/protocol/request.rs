//! Request grammar.

use super::frame::{body, decode};

/// Marker that ends a session wherever it appears in a message.
pub const END_OF_SESSION: &str = "<EOF>";

/// A parsed client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `<bind>`: ask the rendezvous listener for a session.
    Bind,
    /// `<Key:{}secret>`: present the session secret.
    Authenticate(String),
    /// `<SBW:{}text>`: stations whose name starts with `text`.
    StationsBeginningWith(String),
    /// `<IVS:{}name>`: whether a station has this exact name.
    IsValidStation(String),
    /// `<GR:{}start{}end>`: route between two station ids.
    GetRoute { start: String, end: String },
    /// `<EOF>`: close the connection.
    EndOfSession,
}

/// Why a message is not a valid request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("No command was found or the request was malformed")]
    Unrecognised,

    #[error("No parameters were sent with the {0} command")]
    MissingArguments(&'static str),
}

impl Request {
    /// Parse one message read off the wire.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::protocol::{ProtocolError, Request};
    ///
    /// assert_eq!(Request::parse("<bind>"), Ok(Request::Bind));
    /// assert_eq!(
    ///     Request::parse("<GR:{}33{}30>"),
    ///     Ok(Request::GetRoute { start: "33".into(), end: "30".into() })
    /// );
    /// assert_eq!(Request::parse("<IVS>"), Err(ProtocolError::MissingArguments("IVS")));
    /// ```
    pub fn parse(message: &str) -> Result<Self, ProtocolError> {
        let message = message.trim();
        if message.contains(END_OF_SESSION) {
            return Ok(Request::EndOfSession);
        }
        if !(message.starts_with('<') && message.ends_with('>')) {
            return Err(ProtocolError::Unrecognised);
        }

        let body = body(message);
        let verb = match body.split_once(':') {
            Some((verb, _)) => verb,
            None if body == "bind" => return Ok(Request::Bind),
            None => body,
        };
        let verb = Verb::parse(verb).ok_or(ProtocolError::Unrecognised)?;

        let missing = ProtocolError::MissingArguments(verb.name());
        let arguments = if body.contains(':') {
            decode(message).ok_or(missing.clone())?
        } else {
            return Err(missing);
        };
        let mut arguments = arguments.into_iter();
        let mut next = || arguments.next().ok_or(missing.clone());

        Ok(match verb {
            Verb::Key => Request::Authenticate(next()?),
            Verb::StationsBeginningWith => Request::StationsBeginningWith(next()?),
            Verb::IsValidStation => Request::IsValidStation(next()?),
            Verb::GetRoute => {
                let start = next()?;
                let end = next()?;
                Request::GetRoute { start, end }
            }
        })
    }

    /// The frame a client sends for this request.
    pub fn to_frame(&self) -> String {
        match self {
            Request::Bind => "<bind>".to_string(),
            Request::Authenticate(secret) => format!("<Key:{{}}{secret}>"),
            Request::StationsBeginningWith(text) => format!("<SBW:{{}}{text}>"),
            Request::IsValidStation(name) => format!("<IVS:{{}}{name}>"),
            Request::GetRoute { start, end } => format!("<GR:{{}}{start}{{}}{end}>"),
            Request::EndOfSession => END_OF_SESSION.to_string(),
        }
    }
}

/// Verbs that take arguments.
#[derive(Debug, Clone, Copy)]
enum Verb {
    Key,
    StationsBeginningWith,
    IsValidStation,
    GetRoute,
}

impl Verb {
    fn parse(verb: &str) -> Option<Self> {
        match verb {
            "Key" => Some(Verb::Key),
            "SBW" => Some(Verb::StationsBeginningWith),
            "IVS" => Some(Verb::IsValidStation),
            "GR" => Some(Verb::GetRoute),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Verb::Key => "Key",
            Verb::StationsBeginningWith => "SBW",
            Verb::IsValidStation => "IVS",
            Verb::GetRoute => "GR",
        }
    }
}
