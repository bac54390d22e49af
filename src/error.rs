//! Recoverable errors.
//!
//! Only input-facing failures live here (malformed edge lists, bad
//! configuration, worker pool setup). Contract violations inside a traversal,
//! such as an out-of-range vertex id handed to a subset, are assertions.

use core::fmt;

use crate::graph::VertexId;

/// Result alias used across the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors surfaced while building graphs, engines or jobs.
#[derive(Debug)]
pub enum Error {
    /// An edge endpoint is not below the declared vertex count.
    VertexOutOfRange {
        /// Source of the offending edge.
        src: VertexId,
        /// Destination of the offending edge.
        dst: VertexId,
        /// Declared vertex count.
        vertices: usize,
    },
    /// The vertex count does not fit below the reserved sentinel id.
    TooManyVertices(usize),
    /// An edge-list byte stream is not a whole number of records.
    TruncatedEdgeList {
        /// Length of the stream in bytes.
        bytes: usize,
        /// Size of one record in bytes.
        record: usize,
    },
    /// A configuration value is out of its valid range.
    InvalidConfig(String),
    /// A job description cannot be instantiated against the graph.
    InvalidJob(String),
    /// The worker pool could not be started.
    ThreadPool(rayon::ThreadPoolBuildError),
    /// Reading input failed.
    Io(std::io::Error),
    /// Decoding a JSON document failed.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::VertexOutOfRange { src, dst, vertices } => {
                write!(f, "edge {src}->{dst} is out of bounds for {vertices} vertices")
            }
            Error::TooManyVertices(n) => {
                write!(f, "{n} vertices exceed the addressable id range")
            }
            Error::TruncatedEdgeList { bytes, record } => write!(
                f,
                "edge list of {bytes} bytes is not a multiple of the {record}-byte record"
            ),
            Error::InvalidConfig(msg) => write!(f, "invalid engine configuration: {msg}"),
            Error::InvalidJob(msg) => write!(f, "invalid job: {msg}"),
            Error::ThreadPool(e) => write!(f, "failed to start worker pool: {e}"),
            Error::Io(e) => write!(f, "i/o error: {e}"),
            Error::Json(e) => write!(f, "malformed json: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ThreadPool(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(e)
    }
}
