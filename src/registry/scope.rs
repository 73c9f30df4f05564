use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Snowflake;

/// Partition of the command registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum CommandScope {
    Global,
    Guild(Snowflake),
}

impl CommandScope {
    pub fn guild_id(&self) -> Option<Snowflake> {
        match self {
            CommandScope::Global => None,
            CommandScope::Guild(id) => Some(*id),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, CommandScope::Global)
    }
}

impl From<Option<Snowflake>> for CommandScope {
    fn from(guild: Option<Snowflake>) -> Self {
        guild.map_or(CommandScope::Global, CommandScope::Guild)
    }
}

impl fmt::Display for CommandScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandScope::Global => f.write_str("global"),
            CommandScope::Guild(id) => write!(f, "guild:{id}"),
        }
    }
}
