//! Opportunistic-encryption upgrade: an SMTP-style STARTTLS negotiation
//! run on the not-yet-encrypted connection.
//!
//! Sequence: read the server greeting, send `EHLO`, drain its (possibly
//! multiline) reply, send `STARTTLS`, read the go-ahead. Each reply's
//! code is validated; a non-affirmative code aborts the upgrade. Once
//! `negotiate` returns the caller owns a socket positioned exactly at the
//! start of the TLS handshake: replies are read one byte at a time, so
//! nothing past the final CRLF is ever consumed from the stream.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Upper bound on a single reply line. Lines are assembled regardless of
/// how the peer fragments them; this only caps their length.
const MAX_REPLY_LINE: usize = 2048;

/// Domain announced in EHLO. The peer only needs a syntactically valid
/// name to proceed; no mail is ever exchanged.
const EHLO_DOMAIN: &str = "example.com";

/// Errors produced by the STARTTLS negotiation.
#[derive(Debug, thiserror::Error)]
pub enum StarttlsError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed reply line: {0:?}")]
    Malformed(String),

    #[error("reply line longer than {MAX_REPLY_LINE} bytes")]
    LineTooLong,

    #[error("{command} refused with {code}: {text}")]
    Refused {
        command: &'static str,
        code: u16,
        text: String,
    },
}

/// Run the STARTTLS negotiation on a plaintext stream.
///
/// On success the stream is ready for an immediate TLS client handshake.
pub async fn negotiate<S>(stream: &mut S) -> Result<(), StarttlsError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    expect_reply(stream, "greeting", 220).await?;

    stream
        .write_all(format!("EHLO {EHLO_DOMAIN}\r\n").as_bytes())
        .await?;
    stream.flush().await?;
    expect_reply(stream, "EHLO", 250).await?;

    stream.write_all(b"STARTTLS\r\n").await?;
    stream.flush().await?;
    expect_reply(stream, "STARTTLS", 220).await?;

    debug!("peer agreed to STARTTLS");
    Ok(())
}

/// Read one full reply and require the given code.
async fn expect_reply<R>(
    reader: &mut R,
    command: &'static str,
    expected: u16,
) -> Result<(), StarttlsError>
where
    R: AsyncRead + Unpin,
{
    let (code, text) = read_reply(reader).await?;
    if code != expected {
        return Err(StarttlsError::Refused {
            command,
            code,
            text,
        });
    }
    Ok(())
}

/// Read a reply, draining `250-`-style continuation lines, and return the
/// final line's code and text.
async fn read_reply<R>(reader: &mut R) -> Result<(u16, String), StarttlsError>
where
    R: AsyncRead + Unpin,
{
    loop {
        let line = read_line(reader).await?;
        debug!(reply = %line, "starttls reply");
        let (code, last) = parse_reply_line(&line)?;
        if last {
            return Ok((code, line));
        }
    }
}

/// Read bytes until LF, one byte at a time, stripping an optional CR.
///
/// Single-byte reads are deliberate: buffering here could swallow the
/// first bytes of the TLS handshake that follows the final reply.
async fn read_line<R>(reader: &mut R) -> Result<String, StarttlsError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(64);
    loop {
        let byte = reader.read_u8().await?;
        if byte == b'\n' {
            break;
        }
        buf.push(byte);
        if buf.len() > MAX_REPLY_LINE {
            return Err(StarttlsError::LineTooLong);
        }
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    String::from_utf8(buf).map_err(|e| StarttlsError::Malformed(format!("{e}")))
}

/// Parse the 3-digit reply code; the fourth character distinguishes a
/// final line (space or end) from a `-` continuation.
fn parse_reply_line(line: &str) -> Result<(u16, bool), StarttlsError> {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(StarttlsError::Malformed(line.to_string()));
    }
    let code = bytes[..3]
        .iter()
        .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'));
    let last = bytes.get(3) != Some(&b'-');
    Ok((code, last))
}
