//! Handler factory contracts
//!
//! Executors never see the container directly; they ask a factory for the
//! handler of a given message type. The traits are object-safe so a factory
//! can be registered and resolved as `dyn CommandHandlerFactory`; the typed
//! entry points live on the trait object itself.
//!
//! ```rust,ignore
//! let factory = scope.get::<dyn CommandHandlerFactory>()?;
//! let handler = factory.create_command_handler::<CreateOrder>()?;
//! handler.handle(CreateOrder { .. }).await?;
//! ```

use std::sync::Arc;

use cqrs_container::{Instance, ResolveError, ServiceType, downcast_instance};

use crate::handler::{CommandHandler, QueryHandler};
use crate::message::{Command, Query};

/// Creates command handlers by handler interface type
pub trait CommandHandlerFactory: Send + Sync {
    /// Produce the registered implementation of `handler_type`
    ///
    /// `handler_type` is always a `dyn CommandHandler<C>` tag and the
    /// returned instance wraps an `Arc` of that trait object.
    fn create_handler(&self, handler_type: ServiceType) -> Result<Instance, ResolveError>;
}

impl dyn CommandHandlerFactory {
    /// Create the handler registered for command `C`
    pub fn create_command_handler<C: Command>(
        &self,
    ) -> Result<Arc<dyn CommandHandler<C>>, ResolveError> {
        let handler_type = ServiceType::of::<dyn CommandHandler<C>>();
        let instance = self.create_handler(handler_type)?;
        downcast_instance::<dyn CommandHandler<C>>(handler_type, &instance)
    }
}

/// Creates query handlers by handler interface type
pub trait QueryHandlerFactory: Send + Sync {
    /// Produce the registered implementation of `handler_type`
    fn create_handler(&self, handler_type: ServiceType) -> Result<Instance, ResolveError>;
}

impl dyn QueryHandlerFactory {
    /// Create the handler registered for query `Q`
    pub fn create_query_handler<Q: Query>(&self) -> Result<Arc<dyn QueryHandler<Q>>, ResolveError> {
        let handler_type = ServiceType::of::<dyn QueryHandler<Q>>();
        let instance = self.create_handler(handler_type)?;
        downcast_instance::<dyn QueryHandler<Q>>(handler_type, &instance)
    }
}
