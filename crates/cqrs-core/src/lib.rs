//! Command/Query Abstractions
//!
//! Message and handler contracts, the handler-factory seam used by the
//! executors, and link-time discovery of handler implementations.
//!
//! ## Registration Flow
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  1. Handler crate: #[linkme::distributed_slice(COMMAND_HANDLERS)] │
//! │                    static X: HandlerDescriptor = ...              │
//! │                              ↓                                    │
//! │  2. Scanner:       Assembly::named("orders")                      │
//! │                        .command_handler_descriptors()             │
//! │                              ↓                                    │
//! │  3. Registration:  descriptor.register(&mut services, Scoped)     │
//! │                              ↓                                    │
//! │  4. Runtime:       CommandExecutor → dyn CommandHandlerFactory    │
//! │                        → dyn CommandHandler<C>                    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod discovery;
pub mod executor;
pub mod factory;
pub mod handler;
pub mod message;

pub use discovery::{Assembly, COMMAND_HANDLERS, HandlerDescriptor, HandlerKind, QUERY_HANDLERS};
pub use executor::{CommandExecutor, ExecutionError, QueryExecutor};
pub use factory::{CommandHandlerFactory, QueryHandlerFactory};
pub use handler::{CommandHandler, QueryHandler};
pub use message::{Command, Query};

// Re-exported so handler crates can name container types through one path
pub use cqrs_container;
