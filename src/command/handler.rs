use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;

use super::argument::ArgumentValue;
use crate::interaction::InvocationContext;
use crate::model::{Channel, Member, Role, User};

/// `Ok(Some(text))` answers the requester with `text`; `Ok(None)` means the
/// handler produced nothing (it may have responded through the context).
pub type HandlerResult = anyhow::Result<Option<String>>;

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn call(&self, ctx: InvocationContext, args: Arguments) -> HandlerResult;
}

/// Adapts an async closure into a `CommandHandler`.
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F, Fut> CommandHandler for FnHandler<F>
where
    F: Fn(InvocationContext, Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn call(&self, ctx: InvocationContext, args: Arguments) -> HandlerResult {
        (self.func)(ctx, args).await
    }
}

/// Converted argument values keyed by argument name. Optional arguments that
/// were not supplied are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    values: HashMap<String, ArgumentValue>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgumentValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            ArgumentValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            ArgumentValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            ArgumentValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// The user behind a user or member argument.
    pub fn get_user(&self, name: &str) -> Option<&User> {
        match self.values.get(name)? {
            ArgumentValue::User(v) => Some(v),
            ArgumentValue::Member(v) => Some(&v.user),
            _ => None,
        }
    }

    pub fn get_member(&self, name: &str) -> Option<&Member> {
        match self.values.get(name)? {
            ArgumentValue::Member(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_channel(&self, name: &str) -> Option<&Channel> {
        match self.values.get(name)? {
            ArgumentValue::Channel(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_role(&self, name: &str) -> Option<&Role> {
        match self.values.get(name)? {
            ArgumentValue::Role(v) => Some(v),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgumentValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
