//! Error handling for DraftKit
//!
//! Provides the error types shared by all layers of the engine:
//! - Session errors (transform session lifecycle violations)
//! - Store errors (entity/layer lookup and mutation)
//! - Geometry errors (degenerate or non-finite input)
//!
//! All error types use `thiserror` for ergonomic error handling.
//!
//! The engine never surfaces predictable "nothing there" conditions as
//! errors: an empty pick, an empty snap, or a missing entity in a query
//! is represented by `Option`/empty collections. The types below cover
//! the remaining cases, of which only [`SessionError::AlreadyActive`] is
//! a programmer error by contract.

use thiserror::Error;

/// Transform session error type
///
/// Represents violations of the session lifecycle. A session is the
/// bounded lifetime of one user gesture; at most one may be active.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A session was begun while another is still active.
    ///
    /// This is the one contract violation in the engine: callers must
    /// commit or cancel the active session before beginning a new one.
    #[error("Transform session already active")]
    AlreadyActive,

    /// A session was begun with no participants.
    #[error("Transform session requires at least one participant")]
    NoParticipants,

    /// A vertex or edge drag referenced an out-of-range index.
    #[error("Sub-index {index} out of range for entity {entity_id}")]
    SubIndexOutOfRange {
        /// The entity whose control points were indexed.
        entity_id: u64,
        /// The offending index.
        index: usize,
    },

    /// A resize was begun with a handle index outside 0..4.
    #[error("Invalid resize handle index {handle}")]
    InvalidHandle {
        /// The offending handle index.
        handle: usize,
    },
}

/// Entity store error type
///
/// Represents failed mutations of authoritative entity or layer state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The entity id is not present in the store.
    #[error("Entity {id} not found")]
    EntityNotFound {
        /// The missing entity id.
        id: u64,
    },

    /// The layer id is not present in the layer table.
    #[error("Layer {id} not found")]
    LayerNotFound {
        /// The missing layer id.
        id: u64,
    },

    /// An insert reused an id already present in the store.
    #[error("Entity {id} already exists")]
    DuplicateEntity {
        /// The duplicated entity id.
        id: u64,
    },
}

/// Geometry error type
///
/// Represents inputs the math layer refuses to operate on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate was NaN or infinite.
    #[error("Non-finite coordinate ({x}, {y})")]
    NonFinite {
        /// The offending x coordinate.
        x: f64,
        /// The offending y coordinate.
        y: f64,
    },

    /// A shape was constructed with fewer points than its kind requires.
    #[error("{kind} requires at least {required} points, got {actual}")]
    TooFewPoints {
        /// The shape kind name.
        kind: String,
        /// The minimum point count for the kind.
        required: usize,
        /// The supplied point count.
        actual: usize,
    },
}

/// Main error type for DraftKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Transform session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Entity store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a session lifecycle error
    pub fn is_session_error(&self) -> bool {
        matches!(self, Error::Session(_))
    }

    /// Check if this is an entity store error
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
