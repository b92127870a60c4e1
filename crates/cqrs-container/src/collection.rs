//! Service registration set
//!
//! The mutable list of registrations owned by the composition root. Entries
//! are only ever appended. `build_provider` freezes them into the `dill`
//! catalog behind a [`ServiceProvider`], which resolves the last registration
//! for a service type and exposes all of them through `get_all`.

use std::sync::Arc;

use tracing::debug;

use crate::component::Component;
use crate::descriptor::{InstanceFactory, ServiceDescriptor};
use crate::error::Result;
use crate::lifetime::Lifetime;
use crate::provider::{ProviderOptions, ServiceProvider};
use crate::service_type::ServiceType;

/// Ordered set of service registrations
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
}

impl ServiceCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no service has been registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Registrations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.descriptors.iter()
    }

    /// Append a registration unconditionally
    pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        debug!(
            service = %descriptor.service_type(),
            lifetime = %descriptor.lifetime(),
            "Adding service registration"
        );
        self.descriptors.push(descriptor);
        self
    }

    /// Bind the interface `I` to the component `T`
    ///
    /// `upcast` turns the built component into the interface handle; for a
    /// trait object it is the identity closure `|component| component`.
    pub fn add_implementation<I, T>(
        &mut self,
        lifetime: Lifetime,
        upcast: fn(Arc<T>) -> Arc<I>,
    ) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
        T: Component,
    {
        let factory: InstanceFactory = Arc::new(move |provider: &ServiceProvider| {
            let component = T::build(provider)?;
            Ok(Arc::new(upcast(Arc::new(component))) as crate::Instance)
        });
        self.add(ServiceDescriptor::new(
            ServiceType::of::<I>(),
            Some(ServiceType::of::<T>()),
            lifetime,
            factory,
        ))
    }

    /// Register the component `T` as its own service type
    pub fn add_component<T: Component>(&mut self, lifetime: Lifetime) -> &mut Self {
        self.add_implementation::<T, T>(lifetime, |component| component)
    }

    /// Register `I` with a construction closure
    pub fn add_factory<I, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<I>> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::from_factory::<I, F>(lifetime, factory))
    }

    /// Register an existing instance as a singleton
    pub fn add_instance<I>(&mut self, instance: Arc<I>) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::from_instance(instance))
    }

    /// Whether any registration exists for `service`
    pub fn contains(&self, service: ServiceType) -> bool {
        self.descriptors
            .iter()
            .any(|descriptor| descriptor.service_type() == service)
    }

    /// Typed form of [`contains`](Self::contains)
    pub fn contains_service<I: ?Sized + 'static>(&self) -> bool {
        self.contains(ServiceType::of::<I>())
    }

    /// Number of registrations for `service`
    pub fn count(&self, service: ServiceType) -> usize {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.service_type() == service)
            .count()
    }

    /// Freeze the registrations into a root provider backed by a `dill` catalog
    pub fn build_provider(&self, options: ProviderOptions) -> ServiceProvider {
        ServiceProvider::new(self.descriptors.clone(), options)
    }
}

impl<'a> IntoIterator for &'a ServiceCollection {
    type Item = &'a ServiceDescriptor;
    type IntoIter = std::slice::Iter<'a, ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}
