//! Error handling types

use std::fmt;

use thiserror::Error;

use crate::service_type::ServiceType;

/// Result type alias for resolution operations
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors raised while resolving services from a provider
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No registration exists for the requested service type
    #[error("No service for type '{service}' has been registered")]
    NotRegistered {
        /// The requested service type
        service: ServiceType,
    },

    /// A registration produced an instance of an unexpected type
    #[error("Service '{service}' did not produce an instance of '{expected}'")]
    TypeMismatch {
        /// The requested service type
        service: ServiceType,
        /// Type name the caller asked for
        expected: &'static str,
    },

    /// The provider a handle was borrowed from has been dropped
    #[error("Cannot resolve '{service}': the owning scope has been disposed")]
    ScopeDisposed {
        /// The requested service type
        service: ServiceType,
    },

    /// A scoped service was requested from the root provider with scope validation on
    #[error("Cannot resolve scoped service '{service}' from the root provider")]
    ScopedFromRoot {
        /// The requested service type
        service: ServiceType,
    },

    /// The registration catalog backing the provider could not be read
    #[error("Service catalog lookup failed: {reason}")]
    Catalog {
        /// The catalog's own error message
        reason: String,
    },
}

impl ResolveError {
    /// Create a not-registered error for the given service type
    pub fn not_registered(service: ServiceType) -> Self {
        Self::NotRegistered { service }
    }

    /// Wrap a failed `dill` catalog lookup
    pub fn catalog(err: impl fmt::Display) -> Self {
        Self::Catalog {
            reason: err.to_string(),
        }
    }
}
