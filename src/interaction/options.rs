use serde::Serialize;
use std::collections::HashMap;

use crate::model::{Channel, Member, Role, User};

/// A resolved option value. Sub-command and group levels become `Nested`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    User(User),
    Member(Member),
    Channel(Channel),
    Role(Role),
    Nested(OptionMap),
}

impl OptionValue {
    pub fn as_nested(&self) -> Option<&OptionMap> {
        match self {
            OptionValue::Nested(map) => Some(map),
            _ => None,
        }
    }
}

/// Option name to value, one level of the resolved option tree.
pub type OptionMap = HashMap<String, OptionValue>;
