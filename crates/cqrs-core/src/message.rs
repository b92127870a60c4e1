//! Message marker traits

/// A request to change state, handled by exactly one [`CommandHandler`](crate::CommandHandler)
pub trait Command: Send + 'static {}

/// A request for data, handled by exactly one [`QueryHandler`](crate::QueryHandler)
pub trait Query: Send + 'static {
    /// What the query produces
    type Output: Send + 'static;
}
