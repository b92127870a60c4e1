//! Tests for the container-backed handler factories

use std::sync::Arc;

use async_trait::async_trait;
use cqrs_di::{
    Assembly, Command, CommandHandler, CommandHandlerFactory, Component,
    ContainerCommandHandlerFactory, ContainerQueryHandlerFactory, HandlerDescriptor,
    ProviderOptions, Query, QueryHandler, QueryHandlerFactory, ResolveError, ServiceCollection,
    ServiceCollectionExt, ServiceProvider, ServiceType,
};

struct ShipOrder;
impl Command for ShipOrder {}

struct Unhandled;
impl Command for Unhandled {}

struct ShippingStatus;
impl Query for ShippingStatus {
    type Output = &'static str;
}

struct ShipOrderHandler;

#[async_trait]
impl CommandHandler<ShipOrder> for ShipOrderHandler {
    async fn handle(&self, _: ShipOrder) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Component for ShipOrderHandler {
    fn build(_: &ServiceProvider) -> Result<Self, ResolveError> {
        Ok(Self)
    }
}

struct ShippingStatusHandler;

#[async_trait]
impl QueryHandler<ShippingStatus> for ShippingStatusHandler {
    async fn handle(&self, _: ShippingStatus) -> anyhow::Result<&'static str> {
        Ok("in transit")
    }
}

impl Component for ShippingStatusHandler {
    fn build(_: &ServiceProvider) -> Result<Self, ResolveError> {
        Ok(Self)
    }
}

static SHIPPING: [HandlerDescriptor; 2] = [
    HandlerDescriptor::command::<ShipOrder, ShipOrderHandler>("shipping"),
    HandlerDescriptor::query::<ShippingStatus, ShippingStatusHandler>("shipping"),
];

fn shipping_provider() -> ServiceProvider {
    let assembly = Assembly::from_descriptors("shipping", &SHIPPING);
    let mut services = ServiceCollection::new();
    services
        .add_command_handlers_from(&assembly)
        .add_query_handlers_from(&assembly);
    services.build_provider(ProviderOptions::default())
}

#[test]
fn test_factory_returns_the_resolver_instance() {
    let scope = shipping_provider().create_scope();
    let factory = scope
        .get::<dyn CommandHandlerFactory>()
        .expect("factory registered");

    let via_factory = factory
        .create_command_handler::<ShipOrder>()
        .expect("handler registered");
    let direct = scope
        .get::<dyn CommandHandler<ShipOrder>>()
        .expect("handler registered");

    assert!(Arc::ptr_eq(&via_factory, &direct));
}

#[test]
fn test_factory_instances_are_per_scope() {
    let provider = shipping_provider();
    let scope_a = provider.create_scope();
    let scope_b = provider.create_scope();

    let a = ContainerCommandHandlerFactory::new(&scope_a);
    let b = ContainerCommandHandlerFactory::new(&scope_b);
    let a_first = a
        .create_handler(ServiceType::of::<dyn CommandHandler<ShipOrder>>())
        .expect("handler registered");
    let a_again = a
        .create_handler(ServiceType::of::<dyn CommandHandler<ShipOrder>>())
        .expect("handler registered");
    let b_first = b
        .create_handler(ServiceType::of::<dyn CommandHandler<ShipOrder>>())
        .expect("handler registered");

    assert!(Arc::ptr_eq(&a_first, &a_again));
    assert!(!Arc::ptr_eq(&a_first, &b_first));
}

#[test]
fn test_unregistered_handler_error_is_passed_through() {
    let scope = shipping_provider().create_scope();
    let factory = scope
        .get::<dyn CommandHandlerFactory>()
        .expect("factory registered");

    let from_factory = factory
        .create_command_handler::<Unhandled>()
        .err()
        .expect("no handler for Unhandled");
    let from_resolver = scope
        .get::<dyn CommandHandler<Unhandled>>()
        .err()
        .expect("no handler for Unhandled");

    assert!(matches!(
        from_factory,
        ResolveError::NotRegistered { service }
            if service == ServiceType::of::<dyn CommandHandler<Unhandled>>()
    ));
    assert_eq!(from_factory.to_string(), from_resolver.to_string());
}

#[test]
fn test_factory_fails_after_scope_is_dropped() {
    let provider = shipping_provider();
    let scope = provider.create_scope();
    let factory = ContainerCommandHandlerFactory::new(&scope);

    drop(scope);

    let err = factory
        .create_handler(ServiceType::of::<dyn CommandHandler<ShipOrder>>())
        .err()
        .expect("scope is gone");
    assert!(matches!(err, ResolveError::ScopeDisposed { .. }));
}

#[test]
fn test_query_factory_creates_query_handler() {
    let scope = shipping_provider().create_scope();
    let factory = scope
        .get::<dyn QueryHandlerFactory>()
        .expect("factory registered");

    let handler = factory
        .create_query_handler::<ShippingStatus>()
        .expect("handler registered");
    let direct = ContainerQueryHandlerFactory::new(&scope)
        .create_handler(ServiceType::of::<dyn QueryHandler<ShippingStatus>>())
        .expect("handler registered");

    let direct: &Arc<dyn QueryHandler<ShippingStatus>> =
        direct.downcast_ref().expect("typed handle");
    assert!(Arc::ptr_eq(&handler, direct));
}
