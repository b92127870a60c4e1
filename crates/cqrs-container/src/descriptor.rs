//! Service descriptors
//!
//! A descriptor binds a service type to the closure that builds it and the
//! lifetime its instances live for.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{ResolveError, Result};
use crate::lifetime::Lifetime;
use crate::provider::ServiceProvider;
use crate::service_type::ServiceType;

/// Type-erased resolved instance
///
/// Always wraps an `Arc<I>` where `I` is the registered service type, so
/// callers recover the typed handle with [`downcast_instance`].
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Builds an erased instance from the resolving provider
pub type InstanceFactory = Arc<dyn Fn(&ServiceProvider) -> Result<Instance> + Send + Sync>;

/// One registration entry in a [`ServiceCollection`](crate::ServiceCollection)
#[derive(Clone)]
pub struct ServiceDescriptor {
    service_type: ServiceType,
    implementation_type: Option<ServiceType>,
    lifetime: Lifetime,
    factory: InstanceFactory,
}

impl ServiceDescriptor {
    /// Create a descriptor from an already-erased factory
    pub fn new(
        service_type: ServiceType,
        implementation_type: Option<ServiceType>,
        lifetime: Lifetime,
        factory: InstanceFactory,
    ) -> Self {
        Self {
            service_type,
            implementation_type,
            lifetime,
            factory,
        }
    }

    /// Descriptor for `I` built by a typed closure
    pub fn from_factory<I, F>(lifetime: Lifetime, factory: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<I>> + Send + Sync + 'static,
    {
        let erased: InstanceFactory = Arc::new(move |provider: &ServiceProvider| {
            let service = factory(provider)?;
            Ok(Arc::new(service) as Instance)
        });
        Self::new(ServiceType::of::<I>(), None, lifetime, erased)
    }

    /// Singleton descriptor for an existing instance
    pub fn from_instance<I>(instance: Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let erased: Instance = Arc::new(instance);
        Self::new(
            ServiceType::of::<I>(),
            None,
            Lifetime::Singleton,
            Arc::new(move |_: &ServiceProvider| Ok(Arc::clone(&erased))),
        )
    }

    /// The service type this entry answers for
    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    /// Concrete type bound to the service, if registered by type
    pub fn implementation_type(&self) -> Option<ServiceType> {
        self.implementation_type
    }

    /// Instance lifetime
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub(crate) fn create(&self, provider: &ServiceProvider) -> Result<Instance> {
        (self.factory)(provider)
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("service_type", &self.service_type)
            .field("implementation_type", &self.implementation_type)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

/// Recover the typed handle from an erased instance
pub fn downcast_instance<I>(service: ServiceType, instance: &Instance) -> Result<Arc<I>>
where
    I: ?Sized + Send + Sync + 'static,
{
    instance
        .downcast_ref::<Arc<I>>()
        .cloned()
        .ok_or(ResolveError::TypeMismatch {
            service,
            expected: type_name::<I>(),
        })
}
