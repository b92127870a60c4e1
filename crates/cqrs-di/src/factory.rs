//! Container-backed handler factories
//!
//! Both factories forward straight to the provider they were created from.
//! They hold a weak handle so a factory cached inside a scope does not keep
//! that scope alive.

use std::fmt;

use cqrs_container::{Instance, ResolveError, ServiceProvider, ServiceType, WeakServiceProvider};
use cqrs_core::{CommandHandlerFactory, QueryHandlerFactory};

fn resolve_through(
    provider: &WeakServiceProvider,
    handler_type: ServiceType,
) -> Result<Instance, ResolveError> {
    let provider = provider
        .upgrade()
        .ok_or(ResolveError::ScopeDisposed {
            service: handler_type,
        })?;
    provider.resolve(handler_type)
}

/// [`CommandHandlerFactory`] that resolves handlers from a [`ServiceProvider`]
#[derive(Clone)]
pub struct ContainerCommandHandlerFactory {
    provider: WeakServiceProvider,
}

impl ContainerCommandHandlerFactory {
    /// Create a factory resolving through `provider`
    pub fn new(provider: &ServiceProvider) -> Self {
        Self {
            provider: provider.downgrade(),
        }
    }
}

impl CommandHandlerFactory for ContainerCommandHandlerFactory {
    fn create_handler(&self, handler_type: ServiceType) -> Result<Instance, ResolveError> {
        resolve_through(&self.provider, handler_type)
    }
}

impl fmt::Debug for ContainerCommandHandlerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerCommandHandlerFactory")
            .field("provider", &self.provider)
            .finish()
    }
}

/// [`QueryHandlerFactory`] that resolves handlers from a [`ServiceProvider`]
#[derive(Clone)]
pub struct ContainerQueryHandlerFactory {
    provider: WeakServiceProvider,
}

impl ContainerQueryHandlerFactory {
    /// Create a factory resolving through `provider`
    pub fn new(provider: &ServiceProvider) -> Self {
        Self {
            provider: provider.downgrade(),
        }
    }
}

impl QueryHandlerFactory for ContainerQueryHandlerFactory {
    fn create_handler(&self, handler_type: ServiceType) -> Result<Instance, ResolveError> {
        resolve_through(&self.provider, handler_type)
    }
}

impl fmt::Debug for ContainerQueryHandlerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerQueryHandlerFactory")
            .field("provider", &self.provider)
            .finish()
    }
}
