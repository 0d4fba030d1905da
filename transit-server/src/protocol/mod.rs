//! Text wire protocol shared by the server and the client.
//!
//! Messages are framed as `<` + fields joined by `{}` + `>`. Requests carry a
//! verb before the first `:`; replies are bare field lists, except route
//! replies which carry one JSON array.

mod frame;
pub mod reply;
mod request;

pub use frame::{CLOSE, DELIMITER, FrameReader, OPEN, decode, encode, fields, send};
pub use request::{END_OF_SESSION, ProtocolError, Request};
