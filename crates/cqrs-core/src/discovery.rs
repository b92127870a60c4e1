//! Handler Discovery
//!
//! Handler implementations announce themselves through `linkme` distributed
//! slices. An [`Assembly`] selects the descriptors that belong to one crate
//! or module subtree, which is what the registration extensions scan.
//!
//! ## Declaring a Handler
//!
//! ```rust,ignore
//! use cqrs_core::{COMMAND_HANDLERS, HandlerDescriptor};
//!
//! #[linkme::distributed_slice(COMMAND_HANDLERS)]
//! static CREATE_ORDER: HandlerDescriptor =
//!     HandlerDescriptor::command::<CreateOrder, CreateOrderHandler>(module_path!());
//! ```
//!
//! ## Scanning
//!
//! ```rust,ignore
//! let assembly = Assembly::named("orders");          // whole crate
//! let assembly = Assembly::named("orders::billing"); // module subtree
//! let assembly = cqrs_core::calling_assembly!();     // the caller's crate
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use cqrs_container::{Component, Lifetime, ServiceCollection, ServiceType};
use linkme::distributed_slice;

use crate::handler::{CommandHandler, QueryHandler};
use crate::message::{Command, Query};

/// Command handler descriptors linked into the binary
#[distributed_slice]
pub static COMMAND_HANDLERS: [HandlerDescriptor] = [..];

/// Query handler descriptors linked into the binary
#[distributed_slice]
pub static QUERY_HANDLERS: [HandlerDescriptor] = [..];

/// Which handler family a descriptor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Command,
    Query,
}

/// A handler interface paired with the concrete type implementing it
pub struct HandlerDescriptor {
    module: &'static str,
    kind: HandlerKind,
    handler_type: fn() -> ServiceType,
    implementing_type: fn() -> ServiceType,
    register: fn(&mut ServiceCollection, Lifetime),
}

impl HandlerDescriptor {
    /// Descriptor binding `dyn CommandHandler<C>` to `H`
    ///
    /// `module` is the declaring module path, normally `module_path!()`.
    pub const fn command<C, H>(module: &'static str) -> Self
    where
        C: Command,
        H: CommandHandler<C> + Component,
    {
        Self {
            module,
            kind: HandlerKind::Command,
            handler_type: ServiceType::of::<dyn CommandHandler<C>>,
            implementing_type: ServiceType::of::<H>,
            register: register_command_handler::<C, H>,
        }
    }

    /// Descriptor binding `dyn QueryHandler<Q>` to `H`
    pub const fn query<Q, H>(module: &'static str) -> Self
    where
        Q: Query,
        H: QueryHandler<Q> + Component,
    {
        Self {
            module,
            kind: HandlerKind::Query,
            handler_type: ServiceType::of::<dyn QueryHandler<Q>>,
            implementing_type: ServiceType::of::<H>,
            register: register_query_handler::<Q, H>,
        }
    }

    /// Module that declared the descriptor
    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    /// The handler interface, e.g. `dyn CommandHandler<CreateOrder>`
    pub fn handler_type(&self) -> ServiceType {
        (self.handler_type)()
    }

    /// The concrete handler type
    pub fn implementing_type(&self) -> ServiceType {
        (self.implementing_type)()
    }

    /// Bind the handler interface to the implementation in `services`
    pub fn register(&self, services: &mut ServiceCollection, lifetime: Lifetime) {
        (self.register)(services, lifetime);
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("module", &self.module)
            .field("kind", &self.kind)
            .field("handler_type", &self.handler_type())
            .field("implementing_type", &self.implementing_type())
            .finish()
    }
}

fn register_command_handler<C, H>(services: &mut ServiceCollection, lifetime: Lifetime)
where
    C: Command,
    H: CommandHandler<C> + Component,
{
    services
        .add_implementation::<dyn CommandHandler<C>, H>(lifetime, upcast_command_handler::<C, H>);
}

fn upcast_command_handler<C, H>(handler: Arc<H>) -> Arc<dyn CommandHandler<C>>
where
    C: Command,
    H: CommandHandler<C> + Component,
{
    handler
}

fn register_query_handler<Q, H>(services: &mut ServiceCollection, lifetime: Lifetime)
where
    Q: Query,
    H: QueryHandler<Q> + Component,
{
    services.add_implementation::<dyn QueryHandler<Q>, H>(lifetime, upcast_query_handler::<Q, H>);
}

fn upcast_query_handler<Q, H>(handler: Arc<H>) -> Arc<dyn QueryHandler<Q>>
where
    Q: Query,
    H: QueryHandler<Q> + Component,
{
    handler
}

#[derive(Clone)]
enum Source {
    Linked,
    Explicit(&'static [HandlerDescriptor]),
}

/// A unit of handler discovery
///
/// Either a module-path prefix matched against the linked descriptor slices,
/// or an explicit descriptor list.
#[derive(Clone)]
pub struct Assembly {
    name: Cow<'static, str>,
    source: Source,
}

impl Assembly {
    /// Descriptors declared in the crate or module subtree `name`
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            source: Source::Linked,
        }
    }

    /// The crate that `module_path` belongs to
    pub fn of_module(module_path: &str) -> Self {
        let crate_name = module_path.split("::").next().unwrap_or(module_path);
        Self::named(crate_name.to_string())
    }

    /// An assembly made of exactly `descriptors`, ignoring the linked slices
    pub fn from_descriptors(
        name: impl Into<Cow<'static, str>>,
        descriptors: &'static [HandlerDescriptor],
    ) -> Self {
        Self {
            name: name.into(),
            source: Source::Explicit(descriptors),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `module` lies inside this assembly's module subtree
    pub fn contains_module(&self, module: &str) -> bool {
        module
            .strip_prefix(&*self.name)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    }

    /// Command handler descriptors found in this assembly
    pub fn command_handler_descriptors(
        &self,
    ) -> impl Iterator<Item = &'static HandlerDescriptor> + '_ {
        self.descriptors(HandlerKind::Command)
    }

    /// Query handler descriptors found in this assembly
    pub fn query_handler_descriptors(
        &self,
    ) -> impl Iterator<Item = &'static HandlerDescriptor> + '_ {
        self.descriptors(HandlerKind::Query)
    }

    fn descriptors(
        &self,
        kind: HandlerKind,
    ) -> impl Iterator<Item = &'static HandlerDescriptor> + '_ {
        let (pool, by_module): (&'static [HandlerDescriptor], bool) = match &self.source {
            Source::Linked => {
                let slice: &'static [HandlerDescriptor] = match kind {
                    HandlerKind::Command => &COMMAND_HANDLERS,
                    HandlerKind::Query => &QUERY_HANDLERS,
                };
                (slice, true)
            }
            Source::Explicit(descriptors) => (*descriptors, false),
        };

        pool.iter().filter(move |descriptor| {
            descriptor.kind() == kind && (!by_module || self.contains_module(descriptor.module()))
        })
    }
}

impl fmt::Debug for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match self.source {
            Source::Linked => "linked",
            Source::Explicit(_) => "explicit",
        };
        f.debug_struct("Assembly")
            .field("name", &self.name)
            .field("source", &source)
            .finish()
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The [`Assembly`] of the crate invoking the macro
#[macro_export]
macro_rules! calling_assembly {
    () => {
        $crate::Assembly::of_module(::core::module_path!())
    };
}
