//! Handler registration extensions
//!
//! Adds every handler discovered in an [`Assembly`] to a
//! [`ServiceCollection`], then makes sure a handler factory and an executor
//! are available.
//!
//! ## Registration Pass
//!
//! ```text
//! assembly.command_handler_descriptors()
//!        │  for each: dyn CommandHandler<C> → H        (handler lifetime)
//!        ▼
//! dyn CommandHandlerFactory absent? → ContainerCommandHandlerFactory
//!        ▼
//! CommandExecutor absent?           → CommandExecutor
//! ```
//!
//! Within one pass a message type gets at most one handler: the first
//! descriptor found wins and later ones are skipped with a warning. Across
//! passes nothing is deduplicated, so scanning the same assembly twice binds
//! every handler twice and resolution picks the last binding. The factory and
//! executor are only added when no registration exists, so caller-supplied
//! ones are kept.

use std::collections::HashMap;
use std::sync::Arc;

use cqrs_container::{Lifetime, ServiceCollection, ServiceProvider, ServiceType};
use cqrs_core::{
    Assembly, CommandExecutor, CommandHandlerFactory, HandlerDescriptor, QueryExecutor,
    QueryHandlerFactory,
};
use tracing::{debug, info, warn};

use crate::config::RegistrationOptions;
use crate::factory::{ContainerCommandHandlerFactory, ContainerQueryHandlerFactory};

/// Handler registration methods on [`ServiceCollection`]
pub trait ServiceCollectionExt {
    /// Add the command handlers found in `assembly` with default options
    fn add_command_handlers_from(&mut self, assembly: &Assembly) -> &mut Self;

    /// Add the command handlers found in `assembly`
    fn add_command_handlers_with(
        &mut self,
        assembly: &Assembly,
        options: &RegistrationOptions,
    ) -> &mut Self;

    /// Add the query handlers found in `assembly` with default options
    fn add_query_handlers_from(&mut self, assembly: &Assembly) -> &mut Self;

    /// Add the query handlers found in `assembly`
    fn add_query_handlers_with(
        &mut self,
        assembly: &Assembly,
        options: &RegistrationOptions,
    ) -> &mut Self;
}

impl ServiceCollectionExt for ServiceCollection {
    fn add_command_handlers_from(&mut self, assembly: &Assembly) -> &mut Self {
        self.add_command_handlers_with(assembly, &RegistrationOptions::default())
    }

    fn add_command_handlers_with(
        &mut self,
        assembly: &Assembly,
        options: &RegistrationOptions,
    ) -> &mut Self {
        warn_on_captive_lifetimes(options);
        let registered = register_descriptors(
            self,
            assembly.command_handler_descriptors(),
            options.handler_lifetime,
        );

        if self.contains_service::<dyn CommandHandlerFactory>() {
            debug!("Command handler factory already registered");
        } else {
            self.add_factory::<dyn CommandHandlerFactory, _>(
                options.factory_lifetime,
                |provider: &ServiceProvider| {
                    let factory: Arc<dyn CommandHandlerFactory> =
                        Arc::new(ContainerCommandHandlerFactory::new(provider));
                    Ok(factory)
                },
            );
        }

        if self.contains_service::<CommandExecutor>() {
            debug!("Command executor already registered");
        } else {
            self.add_component::<CommandExecutor>(options.executor_lifetime);
        }

        info!(
            assembly = %assembly,
            handlers = registered,
            "Registered command handlers"
        );
        self
    }

    fn add_query_handlers_from(&mut self, assembly: &Assembly) -> &mut Self {
        self.add_query_handlers_with(assembly, &RegistrationOptions::default())
    }

    fn add_query_handlers_with(
        &mut self,
        assembly: &Assembly,
        options: &RegistrationOptions,
    ) -> &mut Self {
        warn_on_captive_lifetimes(options);
        let registered = register_descriptors(
            self,
            assembly.query_handler_descriptors(),
            options.handler_lifetime,
        );

        if self.contains_service::<dyn QueryHandlerFactory>() {
            debug!("Query handler factory already registered");
        } else {
            self.add_factory::<dyn QueryHandlerFactory, _>(
                options.factory_lifetime,
                |provider: &ServiceProvider| {
                    let factory: Arc<dyn QueryHandlerFactory> =
                        Arc::new(ContainerQueryHandlerFactory::new(provider));
                    Ok(factory)
                },
            );
        }

        if self.contains_service::<QueryExecutor>() {
            debug!("Query executor already registered");
        } else {
            self.add_component::<QueryExecutor>(options.executor_lifetime);
        }

        info!(
            assembly = %assembly,
            handlers = registered,
            "Registered query handlers"
        );
        self
    }
}

fn warn_on_captive_lifetimes(options: &RegistrationOptions) {
    if let Err(err) = options.validate() {
        warn!(error = %err, "Registering handlers with captive lifetimes");
    }
}

/// Bind each descriptor, keeping the first handler per message type
fn register_descriptors<'a>(
    services: &mut ServiceCollection,
    descriptors: impl Iterator<Item = &'a HandlerDescriptor>,
    lifetime: Lifetime,
) -> usize {
    let mut bound: HashMap<ServiceType, ServiceType> = HashMap::new();
    for descriptor in descriptors {
        let handler = descriptor.handler_type();
        if let Some(kept) = bound.get(&handler) {
            warn!(
                handler = %handler,
                kept = %kept,
                skipped = %descriptor.implementing_type(),
                "Message type already has a handler in this pass"
            );
            continue;
        }

        debug!(
            module = descriptor.module(),
            handler = %handler,
            implementation = %descriptor.implementing_type(),
            %lifetime,
            "Registering handler"
        );
        descriptor.register(services, lifetime);
        bound.insert(handler, descriptor.implementing_type());
    }
    bound.len()
}
