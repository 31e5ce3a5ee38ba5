//! Error types for navcam.

use thiserror::Error;

/// The main error type for navcam operations.
#[derive(Error, Debug)]
pub enum NavCamError {
    /// A transition was configured with a zero maximum duration.
    #[error("transition max duration must be greater than zero")]
    InvalidTransitionDuration,

    /// The configured zoom bounds contradict each other.
    #[error("min following zoom ({min}) exceeds max zoom ({max})")]
    ConflictingZoomBounds { min: f64, max: f64 },

    /// A polyline could not be sliced.
    ///
    /// This is absorbed at the slicing boundary and never reaches callers
    /// of the public API; the unsliced point set is used instead.
    #[error("malformed polyline: {0}")]
    MalformedPolyline(String),
}

/// A specialized Result type for navcam operations.
pub type Result<T> = std::result::Result<T, NavCamError>;
