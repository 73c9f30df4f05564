/*!
 * Inbound interaction payloads
 *
 * Wire shapes only. Turning the raw option tree into values happens in
 * `resolved`.
 */

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{Channel, Member, PartialMember, Role, Snowflake, User};
use crate::registry::CommandScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InteractionKind {
    /// Health-check; answered with an empty acknowledgement.
    Ping,
    Command,
}

impl TryFrom<u8> for InteractionKind {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(InteractionKind::Ping),
            2 => Ok(InteractionKind::Command),
            other => Err(format!("unknown interaction type {other}")),
        }
    }
}

impl From<InteractionKind> for u8 {
    fn from(kind: InteractionKind) -> Self {
        match kind {
            InteractionKind::Ping => 1,
            InteractionKind::Command => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionPayload {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    /// Guild the interaction originated from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Snowflake>,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CommandData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl InteractionPayload {
    pub fn ping(id: impl Into<Snowflake>, token: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: InteractionKind::Ping,
            guild_id: None,
            channel_id: None,
            token: token.into(),
            data: None,
            member: None,
            user: None,
        }
    }

    pub fn command(id: impl Into<Snowflake>, token: impl Into<String>, data: CommandData) -> Self {
        Self {
            kind: InteractionKind::Command,
            data: Some(data),
            ..Self::ping(id, token)
        }
    }

    pub fn in_guild(mut self, guild_id: impl Into<Snowflake>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }
}

/// The invoked command and its option tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandData {
    pub id: Snowflake,
    pub name: String,
    /// Set when the invoked command is registered in a guild scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<RawOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ResolvedData>,
}

impl CommandData {
    /// Registry scope the command was registered in.
    pub fn scope(&self) -> CommandScope {
        CommandScope::from(self.guild_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<RawOption>,
}

/// Referenced entities keyed by id. Any table may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedData {
    #[serde(default)]
    pub users: HashMap<Snowflake, User>,
    #[serde(default)]
    pub members: HashMap<Snowflake, PartialMember>,
    #[serde(default)]
    pub roles: HashMap<Snowflake, Role>,
    #[serde(default)]
    pub channels: HashMap<Snowflake, Channel>,
}
