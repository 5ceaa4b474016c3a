//! Length-prefixed CBOR framing for the monitor stream.
//!
//! Each frame is a 4-byte big-endian body length followed by one CBOR-encoded
//! [`CrossConnectEvent`]. Bodies are capped at [`MAX_FRAME_LEN`] bytes so a
//! corrupt prefix cannot trigger an unbounded allocation.

use std::io;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::event::CrossConnectEvent;

/// Largest accepted frame body, in bytes.
pub const MAX_FRAME_LEN: usize = 65536;

const FRAME_HEADER_LEN: usize = 4;

/// Failures while encoding or decoding monitor-stream frames.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Frame body exceeds [`MAX_FRAME_LEN`].
    #[error("frame of {0} bytes exceeds limit")]
    FrameTooLarge(usize),

    /// Length prefix disagrees with the bytes actually present.
    #[error("frame declares {expected} bytes but carries {actual}")]
    LengthMismatch {
        /// Body length announced by the prefix.
        expected: usize,
        /// Body length found in the frame.
        actual: usize,
    },

    /// CBOR serialization failed.
    #[error("encode: {0}")]
    Encode(#[from] ciborium::ser::Error<io::Error>),

    /// CBOR deserialization failed.
    #[error("decode: {0}")]
    Decode(#[from] ciborium::de::Error<io::Error>),

    /// Underlying transport failed.
    #[error("transport: {0}")]
    Io(#[from] io::Error),
}

/// Encodes `event` into a complete frame, length prefix included.
///
/// # Errors
///
/// Returns [`CodecError::FrameTooLarge`] when the CBOR body exceeds
/// [`MAX_FRAME_LEN`], or [`CodecError::Encode`] when serialization fails.
pub fn encode_event(event: &CrossConnectEvent) -> Result<Bytes, CodecError> {
    let mut body = Vec::new();
    ciborium::into_writer(event, &mut body)?;
    if body.len() > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge(body.len()));
    }
    let header = u32::try_from(body.len()).map_err(|_| CodecError::FrameTooLarge(body.len()))?;

    let mut frame = BytesMut::with_capacity(FRAME_HEADER_LEN + body.len());
    frame.put_u32(header);
    frame.extend_from_slice(&body);
    Ok(frame.freeze())
}

/// Decodes one complete frame, length prefix included.
///
/// # Errors
///
/// Returns [`CodecError::LengthMismatch`] when the prefix and the supplied
/// bytes disagree, [`CodecError::FrameTooLarge`] for an oversized prefix, or
/// [`CodecError::Decode`] when the body is not a valid event.
pub fn decode_event(frame: &[u8]) -> Result<CrossConnectEvent, CodecError> {
    if frame.len() < FRAME_HEADER_LEN {
        return Err(CodecError::LengthMismatch {
            expected: FRAME_HEADER_LEN,
            actual: frame.len(),
        });
    }
    let mut cursor = frame;
    let declared = cursor.get_u32() as usize;
    if declared > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge(declared));
    }
    if declared != cursor.len() {
        return Err(CodecError::LengthMismatch { expected: declared, actual: cursor.len() });
    }
    Ok(ciborium::from_reader(cursor)?)
}

/// Writes one framed event to `writer`.
///
/// # Errors
///
/// Returns [`CodecError::Io`] when the write fails, otherwise the same
/// failures as [`encode_event`].
pub async fn write_event<W>(writer: &mut W, event: &CrossConnectEvent) -> Result<(), CodecError>
where
    W: AsyncWrite + Unpin,
{
    let frame = encode_event(event)?;
    writer.write_all(&frame).await?;
    Ok(())
}

/// Reads one framed event from `reader`.
///
/// Returns `Ok(None)` when the stream ends cleanly on a frame boundary. End
/// of input inside a frame is reported as [`CodecError::Io`].
///
/// # Errors
///
/// Returns [`CodecError::FrameTooLarge`] for an oversized prefix,
/// [`CodecError::Decode`] for a malformed body, or [`CodecError::Io`] when
/// the read fails.
pub async fn read_event<R>(reader: &mut R) -> Result<Option<CrossConnectEvent>, CodecError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0_u8; FRAME_HEADER_LEN];
    match reader.read_exact(&mut header).await {
        Ok(_) => {},
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(error) => return Err(error.into()),
    }

    let declared = u32::from_be_bytes(header) as usize;
    if declared > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge(declared));
    }
    let mut body = vec![0_u8; declared];
    reader.read_exact(&mut body).await?;
    Ok(Some(ciborium::from_reader(body.as_slice())?))
}
