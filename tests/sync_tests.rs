/*!
 * Reconciliation tests against the in-memory remote registry
 */

use std::sync::Arc;

use slash_registry::command::CommandSchema;
use slash_registry::sync::SyncOperationKind;
use slash_registry::transport::RemoteCall;
use slash_registry::{
    CommandRegistry, CommandScope, MemoryRemote, Parameter, Reconciler, SlashClient, SlashCommand,
    SlashConfig, Snowflake,
};

fn command(name: &str, description: &str) -> SlashCommand {
    SlashCommand::builder(name)
        .description(description)
        .context("ctx")
        .handler(|_ctx, _args| async { Ok(None) })
        .build()
        .expect("valid command")
}

fn schema(name: &str, description: &str) -> CommandSchema {
    command(name, description).to_schema()
}

fn client(remote: &Arc<MemoryRemote>, config: SlashConfig) -> SlashClient {
    SlashClient::new(config, remote.clone(), remote.clone(), remote.clone())
}

#[tokio::test]
async fn test_stale_entry_updated_and_orphan_deleted() {
    let remote = Arc::new(MemoryRemote::new());
    remote.seed_command(CommandScope::Global, schema("ping", "Stale text."));
    remote.seed_command(CommandScope::Global, schema("old", "Removed locally."));

    let registry = CommandRegistry::new();
    registry
        .add_command(command("ping", "Replies with pong."), CommandScope::Global)
        .unwrap();

    let reconciler = Reconciler::new(remote.clone(), 8);
    let report = reconciler
        .sync_scope(CommandScope::Global, registry.snapshot(CommandScope::Global))
        .await;

    assert_eq!(report.updated, vec!["ping".to_string()]);
    assert_eq!(report.deleted, vec!["old".to_string()]);
    assert!(report.created.is_empty());
    assert!(report.is_success());

    let mut mutations = remote.mutations();
    mutations.sort_by_key(|c| format!("{c:?}"));
    assert_eq!(
        mutations,
        vec![
            RemoteCall::Delete {
                scope: CommandScope::Global,
                name: "old".into()
            },
            RemoteCall::Update {
                scope: CommandScope::Global,
                name: "ping".into()
            },
        ]
    );
}

#[tokio::test]
async fn test_convergence_then_quiet_second_pass() {
    let remote = Arc::new(MemoryRemote::new());
    remote.seed_command(CommandScope::Global, schema("same", "Unchanged."));
    remote.seed_command(CommandScope::Global, schema("changed", "Before."));
    remote.seed_command(CommandScope::Global, schema("gone", "Orphan."));

    let client = client(&remote, SlashConfig::default());
    for (name, description) in [("same", "Unchanged."), ("changed", "After."), ("fresh", "New one.")] {
        client
            .add_command(command(name, description), CommandScope::Global)
            .unwrap();
    }

    let first = client.sync_commands().await;
    let global = &first[0];
    assert_eq!(global.scope, CommandScope::Global);
    assert_eq!(global.created, vec!["fresh".to_string()]);
    assert_eq!(global.updated, vec!["changed".to_string()]);
    assert_eq!(global.deleted, vec!["gone".to_string()]);
    assert_eq!(global.unchanged, vec!["same".to_string()]);
    assert_eq!(remote.mutations().len(), 3);
    assert_eq!(
        remote.command_names(CommandScope::Global),
        vec!["changed", "fresh", "same"]
    );

    remote.clear_calls();
    let second = client.sync_commands().await;
    assert_eq!(second[0].changes(), 0);
    assert!(remote.mutations().is_empty());
    assert_eq!(remote.calls(), vec![RemoteCall::Fetch(CommandScope::Global)]);
}

#[tokio::test]
async fn test_argument_order_does_not_cause_updates() {
    let remote = Arc::new(MemoryRemote::new());
    let local = SlashCommand::builder("move")
        .description("Moves a thing.")
        .context("ctx")
        .param(Parameter::named("from"))
        .param(Parameter::named("to"))
        .arg_description("from", "Source.")
        .arg_description("to", "Target.")
        .handler(|_ctx, _args| async { Ok(None) })
        .build()
        .unwrap();

    let mut stored = local.to_schema();
    stored.options.reverse();
    remote.seed_command(CommandScope::Global, stored);

    let reconciler = Reconciler::new(remote.clone(), 8);
    let registry = CommandRegistry::new();
    registry.add_command(local, CommandScope::Global).unwrap();

    let report = reconciler
        .sync_scope(CommandScope::Global, registry.snapshot(CommandScope::Global))
        .await;
    assert_eq!(report.unchanged, vec!["move".to_string()]);
    assert!(remote.mutations().is_empty());
}

#[tokio::test]
async fn test_failures_are_reported_and_healed_next_pass() {
    let remote = Arc::new(MemoryRemote::new());
    remote.fail_on("flaky");

    let client = client(&remote, SlashConfig::default());
    client
        .add_command(command("flaky", "Fails once."), CommandScope::Global)
        .unwrap();
    client
        .add_command(command("steady", "Always works."), CommandScope::Global)
        .unwrap();

    let report = &client.sync_commands().await[0];
    assert_eq!(report.created, vec!["steady".to_string()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "flaky");
    assert_eq!(report.failures[0].operation, SyncOperationKind::Create);

    remote.heal();
    let report = &client.sync_commands().await[0];
    assert_eq!(report.created, vec!["flaky".to_string()]);
    assert_eq!(report.unchanged, vec!["steady".to_string()]);
}

#[tokio::test]
async fn test_fetch_failure_skips_scope() {
    let remote = Arc::new(MemoryRemote::new());
    let guild = CommandScope::Guild(Snowflake(42));
    remote.fail_fetch(guild);

    let client = client(&remote, SlashConfig::default());
    client.add_command(command("local", "Guild only."), guild).unwrap();

    let reports = client.sync_commands().await;
    let guild_report = reports.iter().find(|r| r.scope == guild).unwrap();
    assert_eq!(guild_report.failures[0].operation, SyncOperationKind::Fetch);
    assert!(remote.mutations().is_empty());
}

#[tokio::test]
async fn test_global_first_and_known_guilds_included() {
    let remote = Arc::new(MemoryRemote::new());
    let known_only = CommandScope::Guild(Snowflake(7));
    remote.add_guild(7u64);
    remote.seed_command(known_only, schema("stale", "Left behind."));

    let mut config = SlashConfig::default();
    config.sync.parallel_guilds = false;
    let client = client(&remote, config);
    client
        .add_command(command("ping", "Pong."), CommandScope::Global)
        .unwrap();
    client
        .add_command(command("local", "Guild command."), CommandScope::Guild(Snowflake(3)))
        .unwrap();

    let reports = client.on_ready().await.expect("first ready fires");
    let scopes: Vec<CommandScope> = reports.iter().map(|r| r.scope).collect();
    assert_eq!(
        scopes,
        vec![
            CommandScope::Global,
            CommandScope::Guild(Snowflake(3)),
            known_only
        ]
    );
    assert_eq!(remote.calls()[0], RemoteCall::Fetch(CommandScope::Global));
    assert!(remote.command_names(known_only).is_empty());

    assert!(client.on_ready().await.is_none());
}

#[tokio::test]
async fn test_sync_disabled_by_config() {
    let remote = Arc::new(MemoryRemote::new());
    let config = SlashConfig::from_toml_str("[sync]\nenabled = false").unwrap();
    let client = client(&remote, config);
    client
        .add_command(command("ping", "Pong."), CommandScope::Global)
        .unwrap();

    assert_eq!(client.on_ready().await.map(|r| r.len()), Some(0));
    assert!(remote.calls().is_empty());
}
