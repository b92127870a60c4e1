//! Constructor injection seam

use crate::error::Result;
use crate::provider::ServiceProvider;

/// A concrete type the container knows how to build
///
/// Dependencies are pulled from the resolving provider, so a component
/// registered as scoped sees the scoped instances of the scope it is
/// built in.
///
/// ```rust,ignore
/// impl Component for OrderService {
///     fn build(provider: &ServiceProvider) -> Result<Self> {
///         Ok(Self { repository: provider.get::<dyn OrderRepository>()? })
///     }
/// }
/// ```
pub trait Component: Send + Sync + Sized + 'static {
    /// Build an instance, resolving dependencies from `provider`
    fn build(provider: &ServiceProvider) -> Result<Self>;
}
