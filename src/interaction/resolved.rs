/*!
 * Option resolution
 *
 * Rebuilds the nested option mapping from a flat wire option tree, replacing
 * entity ids with the entities carried in the resolved-entities block.
 */

use serde_json::Value;
use std::collections::HashMap;

use super::options::{OptionMap, OptionValue};
use super::types::{CommandData, RawOption, ResolvedData};
use crate::command::OptionKind;
use crate::error::ResolutionError;
use crate::model::{Channel, Member, Role, Snowflake, User};

/// Lookup tables built once per inbound payload.
#[derive(Debug, Clone, Default)]
pub struct ResolvedTables {
    users: HashMap<Snowflake, User>,
    members: HashMap<Snowflake, Member>,
    roles: HashMap<Snowflake, Role>,
    channels: HashMap<Snowflake, Channel>,
}

impl ResolvedTables {
    /// Members and channels are only usable inside a guild.
    pub fn build(resolved: Option<&ResolvedData>, guild: Option<Snowflake>) -> Self {
        let Some(resolved) = resolved else {
            return Self::default();
        };

        let (members, channels) = if guild.is_some() {
            let members = resolved
                .members
                .iter()
                .filter_map(|(id, partial)| {
                    let user = resolved.users.get(id)?;
                    Some((*id, Member::from_parts(user.clone(), partial.clone())))
                })
                .collect();
            (members, resolved.channels.clone())
        } else {
            (HashMap::new(), HashMap::new())
        };

        Self {
            users: resolved.users.clone(),
            members,
            roles: resolved.roles.clone(),
            channels,
        }
    }
}

/// Resolves a full command payload into `{command name: {...}}`.
pub fn resolve_payload(
    data: &CommandData,
    guild: Option<Snowflake>,
) -> Result<OptionMap, ResolutionError> {
    let tables = ResolvedTables::build(data.resolved.as_ref(), guild);
    let inner = resolve_options(&data.options, &tables)?;

    let mut out = OptionMap::new();
    out.insert(data.name.clone(), OptionValue::Nested(inner));
    Ok(out)
}

pub fn resolve_options(
    options: &[RawOption],
    tables: &ResolvedTables,
) -> Result<OptionMap, ResolutionError> {
    let mut out = OptionMap::with_capacity(options.len());
    for option in options {
        let value = resolve_option(option, tables)?;
        out.insert(option.name.clone(), value);
    }
    Ok(out)
}

fn resolve_option(option: &RawOption, tables: &ResolvedTables) -> Result<OptionValue, ResolutionError> {
    let kind = OptionKind::try_from(option.kind).map_err(|_| ResolutionError::UnknownOptionKind {
        option: option.name.clone(),
        kind: option.kind,
    })?;

    let malformed = |expected: &'static str| ResolutionError::MalformedValue {
        option: option.name.clone(),
        expected,
    };
    let value = option.value.as_ref();

    match kind {
        OptionKind::SubCommand | OptionKind::SubCommandGroup => {
            resolve_options(&option.options, tables).map(OptionValue::Nested)
        }
        OptionKind::String => value
            .and_then(Value::as_str)
            .map(|s| OptionValue::String(s.to_string()))
            .ok_or_else(|| malformed("string")),
        OptionKind::Integer => value
            .and_then(Value::as_i64)
            .map(OptionValue::Integer)
            .ok_or_else(|| malformed("integer")),
        OptionKind::Boolean => value
            .and_then(Value::as_bool)
            .map(OptionValue::Boolean)
            .ok_or_else(|| malformed("boolean")),
        OptionKind::User => {
            let id = entity_id(value).ok_or_else(|| malformed("user id"))?;
            if let Some(member) = tables.members.get(&id) {
                return Ok(OptionValue::Member(member.clone()));
            }
            tables
                .users
                .get(&id)
                .map(|user| OptionValue::User(user.clone()))
                .ok_or_else(|| ResolutionError::UnknownUser {
                    option: option.name.clone(),
                    id: id.to_string(),
                })
        }
        OptionKind::Channel => {
            let id = entity_id(value).ok_or_else(|| malformed("channel id"))?;
            tables
                .channels
                .get(&id)
                .map(|channel| OptionValue::Channel(channel.clone()))
                .ok_or_else(|| ResolutionError::UnknownChannel {
                    option: option.name.clone(),
                    id: id.to_string(),
                })
        }
        OptionKind::Role => {
            let id = entity_id(value).ok_or_else(|| malformed("role id"))?;
            tables
                .roles
                .get(&id)
                .map(|role| OptionValue::Role(role.clone()))
                .ok_or_else(|| ResolutionError::UnknownRole {
                    option: option.name.clone(),
                    id: id.to_string(),
                })
        }
    }
}

fn entity_id(value: Option<&Value>) -> Option<Snowflake> {
    match value? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64().map(Snowflake),
        _ => None,
    }
}
