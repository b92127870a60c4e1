//! Service provider and scopes
//!
//! `build_provider` freezes the registration ledger into a `dill` catalog.
//! Every scope is a catalog chained onto that root catalog: it sees the same
//! registrations and carries its own [`ScopeId`]. Instance caches live next
//! to the catalogs rather than inside them, so factories can hold weak
//! handles without keeping a scope alive.
//!
//! ## Lifetimes
//!
//! | Lifetime | Cached in | Built with |
//! |----------|-----------|------------|
//! | Singleton | root | root provider |
//! | Scoped | current scope | current scope |
//! | Transient | nowhere | current scope |
//!
//! The root provider acts as its own scope unless
//! [`ProviderOptions::validate_scopes`] is set.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use dill::{Catalog, CatalogBuilder};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::descriptor::{Instance, ServiceDescriptor, downcast_instance};
use crate::error::{ResolveError, Result};
use crate::lifetime::Lifetime;
use crate::service_type::ServiceType;

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Provider behaviour switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// Reject scoped services resolved from the root provider
    pub validate_scopes: bool,
}

/// Frozen registration ledger, the value the root catalog is built from
#[derive(Clone)]
struct Registrations {
    descriptors: Vec<ServiceDescriptor>,
    by_service: HashMap<ServiceType, Vec<usize>>,
    options: ProviderOptions,
}

impl Registrations {
    fn new(descriptors: Vec<ServiceDescriptor>, options: ProviderOptions) -> Self {
        let mut by_service: HashMap<ServiceType, Vec<usize>> = HashMap::new();
        for (index, descriptor) in descriptors.iter().enumerate() {
            by_service
                .entry(descriptor.service_type())
                .or_default()
                .push(index);
        }
        Self {
            descriptors,
            by_service,
            options,
        }
    }

    fn indices(&self, service: ServiceType) -> &[usize] {
        self.by_service
            .get(&service)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Identity of a child scope, added to its chained catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScopeId(u64);

type InstanceCache = DashMap<usize, Instance>;

struct Root {
    catalog: Catalog,
    singletons: InstanceCache,
    // Scoped services resolved from the root when scopes are not validated
    scoped: InstanceCache,
}

#[derive(Clone)]
struct Scope {
    catalog: Catalog,
    instances: Arc<InstanceCache>,
}

/// Resolver over a frozen set of registrations
///
/// Cloning is cheap and yields a handle to the same scope.
#[derive(Clone)]
pub struct ServiceProvider {
    root: Arc<Root>,
    scope: Option<Scope>,
}

impl ServiceProvider {
    pub(crate) fn new(descriptors: Vec<ServiceDescriptor>, options: ProviderOptions) -> Self {
        let catalog = CatalogBuilder::new()
            .add_value(Registrations::new(descriptors, options))
            .build();

        Self {
            root: Arc::new(Root {
                catalog,
                singletons: DashMap::new(),
                scoped: DashMap::new(),
            }),
            scope: None,
        }
    }

    /// Open a child scope with its own scoped-instance cache
    pub fn create_scope(&self) -> ServiceProvider {
        let id = ScopeId(NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed));
        trace!(scope = id.0, "Created service scope");
        let catalog = self.root.catalog.builder_chained().add_value(id).build();

        Self {
            root: Arc::clone(&self.root),
            scope: Some(Scope {
                catalog,
                instances: Arc::default(),
            }),
        }
    }

    /// Whether any registration exists for `service`
    pub fn contains(&self, service: ServiceType) -> bool {
        self.registrations()
            .is_ok_and(|registrations| !registrations.indices(service).is_empty())
    }

    /// Resolve the last registration of `service`, type-erased
    pub fn resolve(&self, service: ServiceType) -> Result<Instance> {
        let registrations = self.registrations()?;
        let index = *registrations
            .indices(service)
            .last()
            .ok_or(ResolveError::NotRegistered { service })?;
        self.instantiate(&registrations, index)
    }

    /// Resolve every registration of `service` in registration order
    pub fn resolve_all(&self, service: ServiceType) -> Result<Vec<Instance>> {
        let registrations = self.registrations()?;
        registrations
            .indices(service)
            .iter()
            .map(|&index| self.instantiate(&registrations, index))
            .collect()
    }

    /// Resolve `I`, failing if it is not registered
    pub fn get<I>(&self) -> Result<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let service = ServiceType::of::<I>();
        let instance = self.resolve(service)?;
        downcast_instance::<I>(service, &instance)
    }

    /// Resolve `I` if it is registered
    pub fn get_optional<I>(&self) -> Result<Option<Arc<I>>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        if self.contains(ServiceType::of::<I>()) {
            self.get::<I>().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Resolve every registration of `I`
    pub fn get_all<I>(&self) -> Result<Vec<Arc<I>>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let service = ServiceType::of::<I>();
        self.resolve_all(service)?
            .iter()
            .map(|instance| downcast_instance::<I>(service, instance))
            .collect()
    }

    /// Non-owning handle to this provider
    pub fn downgrade(&self) -> WeakServiceProvider {
        WeakServiceProvider {
            root: Arc::downgrade(&self.root),
            scope: self.scope.as_ref().map(|scope| WeakScope {
                catalog: scope.catalog.clone(),
                instances: Arc::downgrade(&scope.instances),
            }),
        }
    }

    fn catalog(&self) -> &Catalog {
        self.scope
            .as_ref()
            .map_or(&self.root.catalog, |scope| &scope.catalog)
    }

    fn registrations(&self) -> Result<Arc<Registrations>> {
        self.catalog()
            .get_one::<Registrations>()
            .map_err(ResolveError::catalog)
    }

    fn scope_id(&self) -> Option<u64> {
        let scope = self.scope.as_ref()?;
        scope.catalog.get_one::<ScopeId>().ok().map(|id| id.0)
    }

    fn root(&self) -> ServiceProvider {
        Self {
            root: Arc::clone(&self.root),
            scope: None,
        }
    }

    fn instantiate(&self, registrations: &Registrations, index: usize) -> Result<Instance> {
        let descriptor = &registrations.descriptors[index];
        let service = descriptor.service_type();
        trace!(
            service = %service,
            lifetime = %descriptor.lifetime(),
            scope = ?self.scope_id(),
            "Resolving service"
        );

        match descriptor.lifetime() {
            Lifetime::Transient => descriptor.create(self),
            Lifetime::Singleton => {
                let root = self.root();
                cached(&self.root.singletons, index, || descriptor.create(&root))
            }
            Lifetime::Scoped => match &self.scope {
                Some(scope) => cached(&scope.instances, index, || descriptor.create(self)),
                None if registrations.options.validate_scopes => {
                    Err(ResolveError::ScopedFromRoot { service })
                }
                None => cached(&self.root.scoped, index, || descriptor.create(self)),
            },
        }
    }
}

/// Look up a cached instance, building it outside any map lock on a miss
fn cached<F>(cache: &InstanceCache, index: usize, build: F) -> Result<Instance>
where
    F: FnOnce() -> Result<Instance>,
{
    if let Some(existing) = cache.get(&index) {
        return Ok(Arc::clone(existing.value()));
    }
    let built = build()?;
    let entry = cache.entry(index).or_insert(built);
    Ok(Arc::clone(entry.value()))
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("scope", &self.scope_id())
            .field("singletons", &self.root.singletons.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
struct WeakScope {
    catalog: Catalog,
    instances: Weak<InstanceCache>,
}

/// Borrowed handle to a provider that does not keep its scope alive
#[derive(Clone)]
pub struct WeakServiceProvider {
    root: Weak<Root>,
    scope: Option<WeakScope>,
}

impl WeakServiceProvider {
    /// Recover the provider if its scope is still alive
    pub fn upgrade(&self) -> Option<ServiceProvider> {
        let root = self.root.upgrade()?;
        let scope = match &self.scope {
            Some(scope) => Some(Scope {
                catalog: scope.catalog.clone(),
                instances: scope.instances.upgrade()?,
            }),
            None => None,
        };
        Some(ServiceProvider { root, scope })
    }
}

impl fmt::Debug for WeakServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alive = self.root.strong_count() > 0
            && self
                .scope
                .as_ref()
                .is_none_or(|scope| scope.instances.strong_count() > 0);
        f.debug_struct("WeakServiceProvider")
            .field("alive", &alive)
            .finish()
    }
}
