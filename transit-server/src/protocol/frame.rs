//! Message framing: `<field{}field{}...>`.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Separator between the fields of a frame.
pub const DELIMITER: &str = "{}";

/// Start of a frame.
pub const OPEN: char = '<';

/// End of a frame.
pub const CLOSE: char = '>';

/// Longest run of bytes buffered without a frame ending. Anything longer is
/// handed on as one (malformed) message.
const MAX_FRAME_LEN: usize = 8 * 1024;

const READ_CHUNK: usize = 1024;

/// Frame a list of fields.
///
/// # Examples
///
/// ```
/// use transit_server::protocol::encode;
///
/// assert_eq!(encode(&["test", "test2"]), "<test{}test2>");
/// assert_eq!(encode(&["test"]), "<test>");
/// assert_eq!(encode::<&str>(&[]), "<>");
/// ```
pub fn encode<S: AsRef<str>>(fields: &[S]) -> String {
    let body: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();
    format!("{OPEN}{}{CLOSE}", body.join(DELIMITER))
}

/// Pull the fields out of a frame.
///
/// A request frame `<VERB:{}a{}b>` yields its arguments `["a", "b"]`; the
/// verb is discarded and `None` means no arguments were sent. A frame with
/// no `:` is a bare field list and yields every field, so `decode` undoes
/// [`encode`] for fields free of `:` and the delimiter.
///
/// # Examples
///
/// ```
/// use transit_server::protocol::decode;
///
/// assert_eq!(decode("<Key:{}xyz>"), Some(vec!["xyz".to_string()]));
/// assert_eq!(decode("<GR:{}12{}30>\r\n"), Some(vec!["12".to_string(), "30".to_string()]));
/// assert_eq!(decode("<IVS:>"), None);
/// ```
pub fn decode(frame: &str) -> Option<Vec<String>> {
    let body = body(frame);

    match body.split_once(':') {
        Some((_verb, arguments)) => {
            let fields: Vec<String> = arguments
                .split(DELIMITER)
                .skip(1)
                .map(str::to_string)
                .collect();
            (!fields.is_empty()).then_some(fields)
        }
        None => Some(fields(frame)),
    }
}

/// Split a reply frame into its fields, colons and all.
///
/// ```
/// use transit_server::protocol::fields;
///
/// assert_eq!(fields("<Port:{}50123{}Key:{}abc>"), ["Port:", "50123", "Key:", "abc"]);
/// assert!(fields("<>").is_empty());
/// ```
pub fn fields(frame: &str) -> Vec<String> {
    let body = body(frame);
    if body.is_empty() {
        return Vec::new();
    }
    body.split(DELIMITER).map(str::to_string).collect()
}

/// The text between the frame markers, if present.
pub(crate) fn body(frame: &str) -> &str {
    let frame = frame.trim();
    let frame = frame.strip_prefix(OPEN).unwrap_or(frame);
    frame.strip_suffix(CLOSE).unwrap_or(frame)
}

/// Write one frame and flush it.
pub async fn send<W>(writer: &mut W, frame: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(frame.as_bytes()).await?;
    writer.flush().await
}

/// Splits a byte stream into messages.
///
/// Each message ends at `>`. Line breaks inside a frame are kept, but a line
/// that never opened a frame is returned on its own so the peer still gets
/// an answer to it.
#[derive(Debug)]
pub struct FrameReader<R> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
        }
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read the next message.
    ///
    /// Returns `Ok(None)` once the stream has ended and nothing but
    /// whitespace is left over.
    pub async fn next_message(&mut self) -> std::io::Result<Option<String>> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Some(message) = self.take_buffered() {
                return Ok(Some(message));
            }

            let read = self.reader.read(&mut chunk).await?;
            if read == 0 {
                let rest = lossy(&std::mem::take(&mut self.buffer));
                return Ok((!rest.is_empty()).then_some(rest));
            }
            self.buffer.extend_from_slice(&chunk[..read]);
        }
    }

    fn take_buffered(&mut self) -> Option<String> {
        loop {
            let close = self.buffer.iter().position(|&b| b == CLOSE as u8);
            let newline = self.buffer.iter().position(|&b| b == b'\n');

            match (close, newline) {
                (_, Some(end))
                    if close.is_none_or(|c| end < c) && !self.buffer[..end].contains(&(OPEN as u8)) =>
                {
                    let line: Vec<u8> = self.buffer.drain(..=end).collect();
                    let line = lossy(&line);
                    if !line.is_empty() {
                        return Some(line);
                    }
                }
                (Some(end), _) => {
                    let frame: Vec<u8> = self.buffer.drain(..=end).collect();
                    return Some(lossy(&frame));
                }
                _ if self.buffer.len() > MAX_FRAME_LEN => {
                    return Some(lossy(&std::mem::take(&mut self.buffer)));
                }
                _ => return None,
            }
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}
