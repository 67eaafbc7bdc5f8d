//! Unified error type for terraview.

use terraview_protocol::ProtocolError;
use terraview_raster::CodecError;
use terraview_scene::RenderError;
use terraview_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Inside a running view these never reach the host: each one is turned
/// into a [`Diagnostic`](crate::Diagnostic) and the offending frame is
/// dropped. They surface directly only from setup calls and
/// [`ViewHandle`](crate::ViewHandle) methods.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// Connection dropped or unavailable.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Envelope or payload could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Raster decompression failed or had the wrong size.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The renderer could not allocate or present.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The view task is no longer running.
    #[error("live view has stopped")]
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err: ViewError = TransportError::ConnectionClosed("gone".into()).into();
        assert!(matches!(err, ViewError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err: ViewError = ProtocolError::MissingKind.into();
        assert!(matches!(err, ViewError::Protocol(_)));
    }

    #[test]
    fn test_from_codec_error() {
        let err: ViewError = CodecError::Oversized { expected: 4 }.into();
        assert!(matches!(err, ViewError::Codec(_)));
    }

    #[test]
    fn test_from_render_error() {
        let err: ViewError = RenderError::TornDown.into();
        assert!(matches!(err, ViewError::Render(_)));
        assert_eq!(err.to_string(), "scene has been torn down");
    }
}
