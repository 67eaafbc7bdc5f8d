//! Structured reporting of dropped frames and failures.
//!
//! A running view never returns errors to the host. Every failure becomes
//! a [`Diagnostic`] handed to the configured [`DiagnosticSink`].

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use terraview_protocol::ProtocolError;
use terraview_raster::CodecError;
use tracing::warn;

use crate::ViewError;

/// Where in the pipeline a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Transport,
    Protocol,
    Codec,
    Render,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Protocol => write!(f, "protocol"),
            Self::Codec => write!(f, "codec"),
            Self::Render => write!(f, "render"),
        }
    }
}

/// One reported failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: Stage,
    /// The message `type`, when it was known.
    pub message_kind: Option<String>,
    /// Size of the raw inbound frame in bytes (0 when there was no frame).
    pub raw_size: usize,
    /// Expected decompressed raster size, for size failures.
    pub expected_size: Option<usize>,
    pub detail: String,
}

impl Diagnostic {
    /// Describes `error` hit while handling a frame of `raw_size` bytes.
    pub fn from_error(error: &ViewError, message_kind: Option<&str>, raw_size: usize) -> Self {
        let (stage, expected_size) = match error {
            ViewError::Transport(_) | ViewError::Stopped => (Stage::Transport, None),
            ViewError::Protocol(_) => (Stage::Protocol, None),
            ViewError::Codec(e) => (Stage::Codec, expected_size(e)),
            ViewError::Render(_) => (Stage::Render, None),
        };
        Self {
            stage,
            message_kind: message_kind.map(str::to_owned),
            raw_size,
            expected_size,
            detail: error.to_string(),
        }
    }

    /// Describes a failure of the channel itself.
    pub fn transport(error: &dyn std::error::Error) -> Self {
        Self {
            stage: Stage::Transport,
            message_kind: None,
            raw_size: 0,
            expected_size: None,
            detail: error.to_string(),
        }
    }
}

fn expected_size(error: &CodecError) -> Option<usize> {
    match error {
        CodecError::Oversized { expected } | CodecError::SizeMismatch { expected, .. } => {
            Some(*expected)
        }
        CodecError::Corrupt(_) | CodecError::CellOutOfBounds { .. } => None,
    }
}

/// The kind carried by a protocol error, if decoding got that far.
pub(crate) fn protocol_kind(error: &ProtocolError) -> Option<&str> {
    match error {
        ProtocolError::Malformed { kind, .. } => Some(kind.as_str()),
        _ => None,
    }
}

/// Receives diagnostics from a live view.
pub trait DiagnosticSink: Send + 'static {
    fn report(&self, diagnostic: Diagnostic);
}

/// Emits each diagnostic as a `tracing` warning. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, d: Diagnostic) {
        warn!(
            stage = %d.stage,
            kind = d.message_kind.as_deref().unwrap_or("-"),
            raw_size = d.raw_size,
            expected_size = ?d.expected_size,
            detail = %d.detail,
            "frame dropped"
        );
    }
}

/// Collects diagnostics in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<Diagnostic>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}
