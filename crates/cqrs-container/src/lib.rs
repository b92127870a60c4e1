//! Typed Service Container
//!
//! Registration ledger and resolver keyed by [`ServiceType`] tags instead of
//! runtime reflection. Services are registered into a [`ServiceCollection`]
//! during composition; `build_provider` freezes them into a `dill` catalog
//! and scopes are catalogs chained onto it.
//!
//! ## Architecture
//!
//! ```text
//! ServiceCollection (composition)        ServiceProvider (runtime)
//! ───────────────────────────────        ─────────────────────────
//! add_implementation::<dyn I, T>()  →    build_provider(options)
//! add_factory::<dyn I, _>(..)                    ↓
//! add_instance(Arc<..>)                  CatalogBuilder::add_value(ledger)
//!                                                ↓
//!                                        create_scope() → builder_chained()
//!                                                ↓
//!                                        get::<dyn I>() → Arc<dyn I>
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut services = ServiceCollection::new();
//! services.add_implementation::<dyn Clock, SystemClock>(Lifetime::Singleton, |c| c);
//!
//! let provider = services.build_provider(ProviderOptions::default());
//! let scope = provider.create_scope();
//! let clock: Arc<dyn Clock> = scope.get()?;
//! ```

pub mod collection;
pub mod component;
pub mod descriptor;
pub mod error;
pub mod lifetime;
pub mod provider;
pub mod service_type;

pub use collection::ServiceCollection;
pub use component::Component;
pub use descriptor::{Instance, ServiceDescriptor, downcast_instance};
pub use error::{ResolveError, Result};
pub use lifetime::Lifetime;
pub use provider::{ProviderOptions, ServiceProvider, WeakServiceProvider};
pub use service_type::ServiceType;
