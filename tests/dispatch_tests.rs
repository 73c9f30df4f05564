/*!
 * Dispatch tests: option resolution, routing through groups and the
 * once-only response contract
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use slash_registry::error::{InvocationError, SlashError};
use slash_registry::interaction::resolve_payload;
use slash_registry::{
    CommandGroup, CommandScope, DispatchOutcome, InteractionPayload, InteractionResponse,
    MemoryRemote, OptionValue, Parameter, SlashClient, SlashCommand, SlashConfig, Snowflake,
};

fn client(remote: &Arc<MemoryRemote>) -> SlashClient {
    SlashClient::new(
        SlashConfig::default(),
        remote.clone(),
        remote.clone(),
        remote.clone(),
    )
}

fn payload(value: serde_json::Value) -> InteractionPayload {
    serde_json::from_value(value).expect("valid payload")
}

fn settings_payload(id: u64) -> InteractionPayload {
    payload(json!({
        "id": id.to_string(),
        "type": 2,
        "token": "tok",
        "data": {
            "id": "900",
            "name": "settings",
            "options": [{
                "name": "notifications",
                "type": 1,
                "options": [{ "name": "enabled", "type": 5, "value": true }]
            }]
        }
    }))
}

fn settings_group() -> CommandGroup {
    let notifications = SlashCommand::builder("notifications")
        .doc("Toggles notifications.\n\nenabled : bool\n    Turn them on or off.")
        .context("ctx")
        .param(Parameter::named("enabled"))
        .handler(|_ctx, args| async move {
            let enabled = args.get_bool("enabled").unwrap_or(false);
            Ok(Some(format!("notifications: {}", if enabled { "on" } else { "off" })))
        })
        .build()
        .unwrap();

    let mut settings = CommandGroup::new("settings", "Server settings.").unwrap();
    settings.add_command(notifications).unwrap();
    settings
}

#[test]
fn test_two_level_payload_resolves_to_nested_map() {
    let payload = settings_payload(1);
    let resolved = resolve_payload(payload.data.as_ref().unwrap(), None).unwrap();

    let expected = serde_json::to_value(&resolved).unwrap();
    assert_eq!(
        expected,
        json!({ "settings": { "notifications": { "enabled": true } } })
    );
}

#[test]
fn test_three_level_nesting_mirrors_payload() {
    let payload = payload(json!({
        "id": "1",
        "type": 2,
        "token": "tok",
        "data": {
            "id": "900",
            "name": "admin",
            "options": [{
                "name": "roles",
                "type": 2,
                "options": [{
                    "name": "grant",
                    "type": 1,
                    "options": [
                        { "name": "reason", "type": 3, "value": "helper" },
                        { "name": "days", "type": 4, "value": 30 }
                    ]
                }]
            }]
        }
    }));

    let resolved = resolve_payload(payload.data.as_ref().unwrap(), None).unwrap();
    let admin = resolved["admin"].as_nested().unwrap();
    let roles = admin["roles"].as_nested().unwrap();
    let grant = roles["grant"].as_nested().unwrap();
    assert_eq!(admin.len(), 1);
    assert_eq!(roles.len(), 1);
    assert_eq!(grant.len(), 2);
    assert_eq!(grant["reason"], OptionValue::String("helper".into()));
    assert_eq!(grant["days"], OptionValue::Integer(30));
}

#[tokio::test]
async fn test_group_dispatch_reaches_handler() {
    let remote = Arc::new(MemoryRemote::new());
    let client = client(&remote);
    client.add_command(settings_group(), CommandScope::Global).unwrap();

    let outcome = client.on_interaction(settings_payload(10)).await.unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::Responded(Some("notifications: on".into()))
    );
    assert_eq!(
        remote.responses_for(Snowflake(10)),
        vec![InteractionResponse::message("notifications: on")]
    );
}

#[tokio::test]
async fn test_ping_is_acknowledged_without_lookup() {
    let remote = Arc::new(MemoryRemote::new());
    let client = client(&remote);

    let outcome = client
        .on_interaction(InteractionPayload::ping(5u64, "tok"))
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Acknowledged);
    assert_eq!(remote.responses_for(Snowflake(5)), vec![InteractionResponse::Pong]);
}

#[tokio::test]
async fn test_unknown_command_gets_no_implementation_notice() {
    let remote = Arc::new(MemoryRemote::new());
    let client = client(&remote);
    client.add_command(settings_group(), CommandScope::Guild(Snowflake(3))).unwrap();

    // registered in a guild, invoked as global
    let outcome = client.on_interaction(settings_payload(11)).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::NoImplementation);
    assert_eq!(
        remote.responses_for(Snowflake(11)),
        vec![InteractionResponse::message("No implementation")]
    );
}

#[tokio::test]
async fn test_guild_scope_lookup_and_member_resolution() {
    let remote = Arc::new(MemoryRemote::new());
    let client = client(&remote);
    let whois = SlashCommand::builder("whois")
        .doc("Shows a member.\n\nwho : Member\n    The member.")
        .context("ctx")
        .param(Parameter::named("who"))
        .handler(|_ctx, args| async move {
            let member = args.get_member("who").ok_or_else(|| anyhow::anyhow!("no member"))?;
            Ok(Some(member.display_name().to_string()))
        })
        .build()
        .unwrap();
    client.add_command(whois, CommandScope::Guild(Snowflake(500))).unwrap();

    let outcome = client
        .on_interaction(payload(json!({
            "id": "12",
            "type": 2,
            "guild_id": "500",
            "token": "tok",
            "data": {
                "id": "901",
                "name": "whois",
                "guild_id": "500",
                "options": [{ "name": "who", "type": 6, "value": "7" }],
                "resolved": {
                    "users": { "7": { "id": "7", "username": "bob" } },
                    "members": { "7": { "nick": "Bobby" } }
                }
            }
        })))
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Responded(Some("Bobby".into())));
}

#[tokio::test]
async fn test_resolution_failure_is_acknowledged() {
    let remote = Arc::new(MemoryRemote::new());
    let client = client(&remote);

    let outcome = client
        .on_interaction(payload(json!({
            "id": "13",
            "type": 2,
            "token": "tok",
            "data": {
                "id": "902",
                "name": "grant",
                "options": [{ "name": "role", "type": 8, "value": "99" }]
            }
        })))
        .await
        .unwrap();

    assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    let responses = remote.responses_for(Snowflake(13));
    assert_eq!(responses.len(), 1);
    assert!(matches!(
        &responses[0],
        InteractionResponse::Message { content } if content.starts_with("This command failed")
    ));
}

#[tokio::test]
async fn test_conversion_failure_is_acknowledged() {
    let remote = Arc::new(MemoryRemote::new());
    let client = client(&remote);
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();

    let voice = SlashCommand::builder("join")
        .doc("Joins a voice channel.\n\nwhere : VoiceChannel\n    Where to go.")
        .context("ctx")
        .param(Parameter::named("where"))
        .handler(move |_ctx, _args| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }
        })
        .build()
        .unwrap();
    client.add_command(voice, CommandScope::Global).unwrap();

    let outcome = client
        .on_interaction(payload(json!({
            "id": "14",
            "type": 2,
            "guild_id": "500",
            "token": "tok",
            "data": {
                "id": "903",
                "name": "join",
                "options": [{ "name": "where", "type": 7, "value": "11" }],
                "resolved": { "channels": { "11": { "id": "11", "name": "general", "type": 0 } } }
            }
        })))
        .await
        .unwrap();

    assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(remote.responses_for(Snowflake(14)).len(), 1);
}

#[tokio::test]
async fn test_handler_that_responds_itself_is_not_answered_twice() {
    let remote = Arc::new(MemoryRemote::new());
    let client = client(&remote);

    let eager = SlashCommand::builder("eager")
        .description("Answers early.")
        .context("ctx")
        .handler(|ctx, _args| async move {
            ctx.respond("early").await?;
            let second = ctx.respond("again").await;
            assert!(matches!(
                second,
                Err(SlashError::Invocation(InvocationError::AlreadyResponded { .. }))
            ));
            Ok(Some("ignored".into()))
        })
        .build()
        .unwrap();
    client.add_command(eager, CommandScope::Global).unwrap();

    let outcome = client
        .on_interaction(payload(json!({
            "id": "15",
            "type": 2,
            "token": "tok",
            "data": { "id": "904", "name": "eager" }
        })))
        .await
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Responded(Some("ignored".into())));
    assert_eq!(
        remote.responses_for(Snowflake(15)),
        vec![InteractionResponse::message("early")]
    );
}

#[tokio::test]
async fn test_empty_result_defers_and_handler_error_hides_detail() {
    let remote = Arc::new(MemoryRemote::new());
    let client = client(&remote);

    let quiet = SlashCommand::builder("quiet")
        .description("Says nothing.")
        .context("ctx")
        .handler(|_ctx, _args| async { Ok(None) })
        .build()
        .unwrap();
    let broken = SlashCommand::builder("broken")
        .description("Always fails.")
        .context("ctx")
        .handler(|_ctx, _args| async { Err(anyhow::anyhow!("database is down")) })
        .build()
        .unwrap();
    client.add_command(quiet, CommandScope::Global).unwrap();
    client.add_command(broken, CommandScope::Global).unwrap();

    let invoke = |id: &str, name: &str| {
        payload(json!({ "id": id, "type": 2, "token": "tok", "data": { "id": "1", "name": name } }))
    };

    let outcome = client.on_interaction(invoke("16", "quiet")).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Responded(None));
    assert_eq!(remote.responses_for(Snowflake(16)), vec![InteractionResponse::Deferred]);

    let outcome = client.on_interaction(invoke("17", "broken")).await.unwrap();
    assert!(matches!(outcome, DispatchOutcome::Failed(ref text) if text.contains("database is down")));
    assert_eq!(
        remote.responses_for(Snowflake(17)),
        vec![InteractionResponse::message("This command failed")]
    );
}

#[tokio::test]
async fn test_group_without_selected_child_defers() {
    let remote = Arc::new(MemoryRemote::new());
    let client = client(&remote);
    client.add_command(settings_group(), CommandScope::Global).unwrap();

    let outcome = client
        .on_interaction(payload(json!({
            "id": "18",
            "type": 2,
            "token": "tok",
            "data": { "id": "900", "name": "settings" }
        })))
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Responded(None));
}
