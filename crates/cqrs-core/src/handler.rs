//! Handler contracts

use async_trait::async_trait;

use crate::message::{Command, Query};

/// Handles command `C`
///
/// Implement this on a [`Component`](cqrs_container::Component) and declare
/// a [`HandlerDescriptor`](crate::HandlerDescriptor) so the registration
/// extensions can find it.
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, command: C) -> anyhow::Result<()>;
}

/// Handles query `Q`
#[async_trait]
pub trait QueryHandler<Q>: Send + Sync
where
    Q: Query,
{
    async fn handle(&self, query: Q) -> anyhow::Result<Q::Output>;
}
