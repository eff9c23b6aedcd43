//! Wire Framing
//!
//! Every [`WireMessage`] travels over TCP as one frame: a big-endian `u32` byte
//! length followed by the bincode encoding of the message. Frames are read whole
//! before decoding, so a half-written message can never be mistaken for a
//! complete one.

use super::error::ClusterError;
use super::types::WireMessage;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Size of the length prefix in bytes.
pub const FRAME_HEADER_BYTES: usize = 4;
/// Largest frame accepted from a peer (256M samples of `f32` plus envelope).
pub const MAX_FRAME_BYTES: usize = 1 << 30;

pub fn encode_frame(msg: &WireMessage) -> Result<Vec<u8>, ClusterError> {
    let body = bincode::serialize(msg)?;
    if body.len() > MAX_FRAME_BYTES {
        return Err(ClusterError::FrameTooLarge {
            size: body.len(),
            limit: MAX_FRAME_BYTES,
        });
    }

    let mut frame = Vec::with_capacity(FRAME_HEADER_BYTES + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

pub async fn write_frame<W>(writer: &mut W, msg: &WireMessage) -> Result<(), ClusterError>
where
    W: AsyncWrite + Unpin,
{
    let frame = encode_frame(msg)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;

    tracing::trace!("Wrote {} frame ({} bytes)", msg.kind(), frame.len());
    Ok(())
}

/// Reads one frame. A clean end of stream before the header maps to
/// [`ClusterError::Disconnected`] so callers can tell a vanished peer from corruption.
pub async fn read_frame<R>(reader: &mut R, peer: &str) -> Result<WireMessage, ClusterError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; FRAME_HEADER_BYTES];
    match reader.read_exact(&mut header).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ClusterError::Disconnected {
                peer: peer.to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    }

    let size = u32::from_be_bytes(header) as usize;
    if size > MAX_FRAME_BYTES {
        return Err(ClusterError::FrameTooLarge {
            size,
            limit: MAX_FRAME_BYTES,
        });
    }

    let mut body = vec![0u8; size];
    reader.read_exact(&mut body).await?;

    let msg: WireMessage = bincode::deserialize(&body)?;
    tracing::trace!("Read {} frame ({} bytes) from {}", msg.kind(), size, peer);
    Ok(msg)
}
