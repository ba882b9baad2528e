//! Error handling for the gizmo engine
//!
//! Only construction and binding surface errors to the caller. Pointer and
//! frame entry points absorb geometric edge cases locally and log them.

use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Result type for gizmo operations
pub type GizmoResult<T> = Result<T, GizmoError>;

/// Errors that can occur while configuring or binding the gizmo
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GizmoError {
    /// Configuration values are out of range
    #[error("Invalid gizmo configuration: {reason}")]
    InvalidConfig {
        /// Which setting was rejected and why
        reason: String,
    },

    /// The object offered to `bind` cannot be manipulated
    #[error("Object cannot be manipulated: {reason}")]
    UnsupportedObject {
        /// Why the object was rejected
        reason: String,
    },

    /// A matrix could not be inverted or decomposed
    #[error("Degenerate matrix: {reason}")]
    DegenerateMatrix {
        /// The operation that hit the degenerate matrix
        reason: String,
    },

    /// The engine was destroyed and no longer accepts objects
    #[error("Gizmo has been destroyed")]
    Destroyed,
}

impl GizmoError {
    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        #[cfg(feature = "tracing")]
        warn!("Invalid gizmo configuration: {}", reason);
        Self::InvalidConfig { reason }
    }

    /// Create an unsupported object error
    pub fn unsupported_object(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        #[cfg(feature = "tracing")]
        warn!("Rejected object: {}", reason);
        Self::UnsupportedObject { reason }
    }

    /// Create a degenerate matrix error
    pub fn degenerate_matrix(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        #[cfg(feature = "tracing")]
        debug!("Degenerate matrix: {}", reason);
        Self::DegenerateMatrix { reason }
    }
}

/// Macro for conditional tracing
#[macro_export]
macro_rules! gizmo_trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}

/// Macro for conditional debug logging
#[macro_export]
macro_rules! gizmo_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    };
}

/// Macro for conditional info logging
#[macro_export]
macro_rules! gizmo_info {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::info!($($arg)*);
    };
}

/// Macro for conditional warning logging
#[macro_export]
macro_rules! gizmo_warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::warn!($($arg)*);
    };
}

/// Macro for conditional error logging
#[macro_export]
macro_rules! gizmo_error {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::error!($($arg)*);
    };
}
