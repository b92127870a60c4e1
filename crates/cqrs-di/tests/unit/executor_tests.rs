//! End-to-end tests: registration, scopes and the default executors

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cqrs_core::{COMMAND_HANDLERS, QUERY_HANDLERS};
use cqrs_di::{
    Assembly, Command, CommandExecutor, CommandHandler, Component, ExecutionError,
    HandlerDescriptor, ProviderOptions, Query, QueryExecutor, QueryHandler, ResolveError,
    ServiceCollection, ServiceCollectionExt, ServiceProvider,
};

/// Shared state the handlers write to and read from
#[derive(Default)]
struct Ledger {
    entries: Mutex<Vec<u32>>,
}

struct Deposit {
    amount: u32,
}
impl Command for Deposit {}

struct Withdraw {
    amount: u32,
}
impl Command for Withdraw {}

struct Refund;
impl Command for Refund {}

struct Balance;
impl Query for Balance {
    type Output = u32;
}

mod banking {
    use super::*;

    pub struct DepositHandler {
        ledger: Arc<Ledger>,
    }

    #[async_trait]
    impl CommandHandler<Deposit> for DepositHandler {
        async fn handle(&self, command: Deposit) -> anyhow::Result<()> {
            self.ledger
                .entries
                .lock()
                .map_err(|_| anyhow::anyhow!("ledger poisoned"))?
                .push(command.amount);
            Ok(())
        }
    }

    impl Component for DepositHandler {
        fn build(provider: &ServiceProvider) -> Result<Self, ResolveError> {
            Ok(Self {
                ledger: provider.get::<Ledger>()?,
            })
        }
    }

    pub struct WithdrawHandler;

    #[async_trait]
    impl CommandHandler<Withdraw> for WithdrawHandler {
        async fn handle(&self, command: Withdraw) -> anyhow::Result<()> {
            anyhow::bail!("insufficient funds for {}", command.amount)
        }
    }

    impl Component for WithdrawHandler {
        fn build(_: &ServiceProvider) -> Result<Self, ResolveError> {
            Ok(Self)
        }
    }

    pub struct BalanceHandler {
        ledger: Arc<Ledger>,
    }

    #[async_trait]
    impl QueryHandler<Balance> for BalanceHandler {
        async fn handle(&self, _: Balance) -> anyhow::Result<u32> {
            let entries = self
                .ledger
                .entries
                .lock()
                .map_err(|_| anyhow::anyhow!("ledger poisoned"))?;
            Ok(entries.iter().sum())
        }
    }

    impl Component for BalanceHandler {
        fn build(provider: &ServiceProvider) -> Result<Self, ResolveError> {
            Ok(Self {
                ledger: provider.get::<Ledger>()?,
            })
        }
    }

    #[linkme::distributed_slice(COMMAND_HANDLERS)]
    static DEPOSIT: HandlerDescriptor =
        HandlerDescriptor::command::<Deposit, DepositHandler>(module_path!());

    #[linkme::distributed_slice(COMMAND_HANDLERS)]
    static WITHDRAW: HandlerDescriptor =
        HandlerDescriptor::command::<Withdraw, WithdrawHandler>(module_path!());

    #[linkme::distributed_slice(QUERY_HANDLERS)]
    static BALANCE: HandlerDescriptor =
        HandlerDescriptor::query::<Balance, BalanceHandler>(module_path!());
}

fn banking_provider(ledger: Arc<Ledger>) -> ServiceProvider {
    let assembly = Assembly::named(format!("{}::banking", module_path!()));
    let mut services = ServiceCollection::new();
    services
        .add_instance(ledger)
        .add_command_handlers_from(&assembly)
        .add_query_handlers_from(&assembly);
    services.build_provider(ProviderOptions {
        validate_scopes: true,
    })
}

#[tokio::test]
async fn test_commands_and_queries_flow_through_executors() {
    let ledger = Arc::new(Ledger::default());
    let scope = banking_provider(Arc::clone(&ledger)).create_scope();
    let commands = scope.get::<CommandExecutor>().expect("executor registered");
    let queries = scope.get::<QueryExecutor>().expect("executor registered");

    commands
        .execute(Deposit { amount: 40 })
        .await
        .expect("deposit succeeds");
    commands
        .execute(Deposit { amount: 2 })
        .await
        .expect("deposit succeeds");

    let balance = queries.execute(Balance).await.expect("balance succeeds");
    assert_eq!(balance, 42);
    assert_eq!(ledger.entries.lock().expect("not poisoned").len(), 2);
}

#[tokio::test]
async fn test_missing_handler_surfaces_resolve_error() {
    let scope = banking_provider(Arc::new(Ledger::default())).create_scope();
    let commands = scope.get::<CommandExecutor>().expect("executor registered");

    let err = commands.execute(Refund).await.unwrap_err();

    assert!(matches!(
        err,
        ExecutionError::Resolve(ResolveError::NotRegistered { .. })
    ));
}

#[tokio::test]
async fn test_handler_failure_is_reported_with_message_type() {
    let scope = banking_provider(Arc::new(Ledger::default())).create_scope();
    let commands = scope.get::<CommandExecutor>().expect("executor registered");

    let err = commands
        .execute(Withdraw { amount: 10 })
        .await
        .unwrap_err();

    match err {
        ExecutionError::Handler {
            message_type,
            source,
        } => {
            assert!(message_type.ends_with("Withdraw"));
            assert_eq!(source.to_string(), "insufficient funds for 10");
        }
        other => panic!("expected handler failure, got {other:?}"),
    }
}

#[test]
fn test_scoped_executor_rejected_from_root_when_validating() {
    let provider = banking_provider(Arc::new(Ledger::default()));

    let err = provider.get::<CommandExecutor>().unwrap_err();

    assert!(matches!(err, ResolveError::ScopedFromRoot { .. }));
}
