//! CQRS Dependency Injection Integration
//!
//! Registers the command and query handlers discovered in an assembly with a
//! [`ServiceCollection`], together with container-backed handler factories
//! and the default executors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cqrs_di::{ServiceCollectionExt, add_command_handlers};
//!
//! let mut services = ServiceCollection::new();
//! add_command_handlers!(&mut services)
//!     .add_query_handlers_from(&Assembly::named("reporting"));
//!
//! let provider = services.build_provider(ProviderOptions::default());
//! let scope = provider.create_scope();
//! let executor = scope.get::<CommandExecutor>()?;
//! executor.execute(CreateOrder { .. }).await?;
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod factory;
pub mod logging;
pub mod registration;

pub use config::{ConfigLoader, DiConfig, LoggingConfig, RegistrationOptions};
pub use error::{Error, Result};
pub use factory::{ContainerCommandHandlerFactory, ContainerQueryHandlerFactory};
pub use registration::ServiceCollectionExt;

pub use cqrs_container::{
    Component, Lifetime, ProviderOptions, ResolveError, ServiceCollection, ServiceProvider,
    ServiceType,
};
pub use cqrs_core::{
    Assembly, Command, CommandExecutor, CommandHandler, CommandHandlerFactory, ExecutionError,
    HandlerDescriptor, Query, QueryExecutor, QueryHandler, QueryHandlerFactory, calling_assembly,
};

/// Register the command handlers declared in the calling crate
///
/// Expands to [`ServiceCollectionExt::add_command_handlers_from`] with the
/// caller's [`Assembly`] and evaluates to the same `&mut ServiceCollection`.
#[macro_export]
macro_rules! add_command_handlers {
    ($services:expr) => {
        $crate::ServiceCollectionExt::add_command_handlers_from(
            $services,
            &$crate::calling_assembly!(),
        )
    };
}

/// Register the query handlers declared in the calling crate
#[macro_export]
macro_rules! add_query_handlers {
    ($services:expr) => {
        $crate::ServiceCollectionExt::add_query_handlers_from(
            $services,
            &$crate::calling_assembly!(),
        )
    };
}
