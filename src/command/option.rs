/*!
 * Schema fragments
 *
 * The structural projection of commands, groups and arguments that is sent to
 * and fetched from the remote registry. Equality used by reconciliation is
 * `structurally_eq`, which ignores the order of sibling options.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Option node kinds as numbered on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OptionKind {
    SubCommand,
    SubCommandGroup,
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
}

impl OptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::SubCommand => "sub_command",
            OptionKind::SubCommandGroup => "sub_command_group",
            OptionKind::String => "string",
            OptionKind::Integer => "integer",
            OptionKind::Boolean => "boolean",
            OptionKind::User => "user",
            OptionKind::Channel => "channel",
            OptionKind::Role => "role",
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, OptionKind::SubCommand | OptionKind::SubCommandGroup)
    }
}

impl TryFrom<u8> for OptionKind {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(OptionKind::SubCommand),
            2 => Ok(OptionKind::SubCommandGroup),
            3 => Ok(OptionKind::String),
            4 => Ok(OptionKind::Integer),
            5 => Ok(OptionKind::Boolean),
            6 => Ok(OptionKind::User),
            7 => Ok(OptionKind::Channel),
            8 => Ok(OptionKind::Role),
            other => Err(format!("unknown option type {other}")),
        }
    }
}

impl From<OptionKind> for u8 {
    fn from(kind: OptionKind) -> Self {
        match kind {
            OptionKind::SubCommand => 1,
            OptionKind::SubCommandGroup => 2,
            OptionKind::String => 3,
            OptionKind::Integer => 4,
            OptionKind::Boolean => 5,
            OptionKind::User => 6,
            OptionKind::Channel => 7,
            OptionKind::Role => 8,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal value of a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    Integer(i64),
    String(String),
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceValue::Integer(v) => write!(f, "{v}"),
            ChoiceValue::String(v) => f.write_str(v),
        }
    }
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        ChoiceValue::String(value.to_string())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        ChoiceValue::String(value)
    }
}

impl From<i64> for ChoiceValue {
    fn from(value: i64) -> Self {
        ChoiceValue::Integer(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionChoice {
    pub name: String,
    pub value: ChoiceValue,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One node of a schema fragment tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    /// Copy with every nested option list sorted by name.
    pub fn canonical(&self) -> CommandOption {
        CommandOption {
            kind: self.kind,
            name: self.name.clone(),
            description: self.description.clone(),
            required: self.required,
            choices: self.choices.clone(),
            options: canonical_options(&self.options),
        }
    }

    pub fn structurally_eq(&self, other: &CommandOption) -> bool {
        self.canonical() == other.canonical()
    }
}

fn canonical_options(options: &[CommandOption]) -> Vec<CommandOption> {
    let mut out: Vec<CommandOption> = options.iter().map(CommandOption::canonical).collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

/// Full top-level registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSchema {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandSchema {
    pub fn canonical(&self) -> CommandSchema {
        CommandSchema {
            name: self.name.clone(),
            description: self.description.clone(),
            options: canonical_options(&self.options),
        }
    }

    pub fn structurally_eq(&self, other: &CommandSchema) -> bool {
        self.canonical() == other.canonical()
    }
}
