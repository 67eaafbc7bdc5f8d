//! Error types for the scene layer.

use std::fmt;

/// The kind of renderer resource an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Texture,
    Surface,
    Overlay,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Texture => write!(f, "texture"),
            Self::Surface => write!(f, "surface"),
            Self::Overlay => write!(f, "overlay"),
        }
    }
}

/// Errors raised by a [`Renderer`](crate::Renderer) or the reconciler.
///
/// A failed reconcile step skips the current frame; whatever was last
/// displayed stays displayed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The backend could not allocate a resource.
    #[error("failed to allocate {kind}: {reason}")]
    Allocation { kind: ResourceKind, reason: String },

    /// A handle that the backend does not know (never created or already
    /// released).
    #[error("unknown {kind} handle {id}")]
    UnknownHandle { kind: ResourceKind, id: u64 },

    /// The scene was torn down; nothing may touch the renderer any more.
    #[error("scene has been torn down")]
    TornDown,
}
