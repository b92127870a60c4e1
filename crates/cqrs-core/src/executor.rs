//! Default command and query executors
//!
//! Executors resolve the handler for a message through the handler factory
//! and forward the message to it. They add no retries, validation or error
//! translation beyond tagging handler failures with the message type.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use cqrs_container::{Component, ResolveError, ServiceProvider};
use thiserror::Error;
use tracing::debug;

use crate::factory::{CommandHandlerFactory, QueryHandlerFactory};
use crate::message::{Command, Query};

/// Errors raised while executing a command or query
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The handler could not be created
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The handler ran and failed
    #[error("Handler for '{message_type}' failed: {source}")]
    Handler {
        /// Type name of the command or query
        message_type: &'static str,
        /// The handler's error
        #[source]
        source: anyhow::Error,
    },
}

/// Executes commands through a [`CommandHandlerFactory`]
#[derive(Clone)]
pub struct CommandExecutor {
    factory: Arc<dyn CommandHandlerFactory>,
}

impl CommandExecutor {
    pub fn new(factory: Arc<dyn CommandHandlerFactory>) -> Self {
        Self { factory }
    }

    /// Create the handler for `C` and run it
    pub async fn execute<C: Command>(&self, command: C) -> Result<(), ExecutionError> {
        let handler = self.factory.create_command_handler::<C>()?;
        debug!(command = type_name::<C>(), "Executing command");
        handler
            .handle(command)
            .await
            .map_err(|source| ExecutionError::Handler {
                message_type: type_name::<C>(),
                source,
            })
    }
}

impl Component for CommandExecutor {
    fn build(provider: &ServiceProvider) -> cqrs_container::Result<Self> {
        Ok(Self::new(provider.get::<dyn CommandHandlerFactory>()?))
    }
}

impl fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandExecutor").finish_non_exhaustive()
    }
}

/// Executes queries through a [`QueryHandlerFactory`]
#[derive(Clone)]
pub struct QueryExecutor {
    factory: Arc<dyn QueryHandlerFactory>,
}

impl QueryExecutor {
    pub fn new(factory: Arc<dyn QueryHandlerFactory>) -> Self {
        Self { factory }
    }

    /// Create the handler for `Q`, run it and return its output
    pub async fn execute<Q: Query>(&self, query: Q) -> Result<Q::Output, ExecutionError> {
        let handler = self.factory.create_query_handler::<Q>()?;
        debug!(query = type_name::<Q>(), "Executing query");
        handler
            .handle(query)
            .await
            .map_err(|source| ExecutionError::Handler {
                message_type: type_name::<Q>(),
                source,
            })
    }
}

impl Component for QueryExecutor {
    fn build(provider: &ServiceProvider) -> cqrs_container::Result<Self> {
        Ok(Self::new(provider.get::<dyn QueryHandlerFactory>()?))
    }
}

impl fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryExecutor").finish_non_exhaustive()
    }
}
