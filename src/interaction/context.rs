use std::sync::Arc;

use super::response::{InteractionResponse, ResponseHandle};
use crate::error::SlashResult;
use crate::model::{Member, Snowflake, User};
use crate::transport::EntityProvider;

/// Everything a handler and an argument conversion can see about the
/// interaction being served.
#[derive(Clone)]
pub struct InvocationContext {
    pub interaction_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub channel_id: Option<Snowflake>,
    pub user: Option<User>,
    pub member: Option<Member>,
    entities: Arc<dyn EntityProvider>,
    response: ResponseHandle,
}

impl InvocationContext {
    pub fn new(
        interaction_id: Snowflake,
        guild_id: Option<Snowflake>,
        entities: Arc<dyn EntityProvider>,
        response: ResponseHandle,
    ) -> Self {
        Self {
            interaction_id,
            guild_id,
            channel_id: None,
            user: None,
            member: None,
            entities,
            response,
        }
    }

    pub fn with_channel(mut self, channel_id: Option<Snowflake>) -> Self {
        self.channel_id = channel_id;
        self
    }

    pub fn with_invoker(mut self, user: Option<User>, member: Option<Member>) -> Self {
        self.user = user;
        self.member = member;
        self
    }

    pub fn entities(&self) -> &Arc<dyn EntityProvider> {
        &self.entities
    }

    /// The invoking user, taken from the member when invoked inside a guild.
    pub fn invoker(&self) -> Option<&User> {
        self.member.as_ref().map(|m| &m.user).or(self.user.as_ref())
    }

    pub fn has_responded(&self) -> bool {
        self.response.is_responded()
    }

    pub async fn respond(&self, content: impl Into<String>) -> SlashResult<()> {
        self.response
            .send(InteractionResponse::message(content))
            .await
    }

    pub async fn defer(&self) -> SlashResult<()> {
        self.response.send(InteractionResponse::Deferred).await
    }
}

impl std::fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationContext")
            .field("interaction_id", &self.interaction_id)
            .field("guild_id", &self.guild_id)
            .field("channel_id", &self.channel_id)
            .field("invoker", &self.invoker().map(|u| u.id))
            .field("response", &self.response)
            .finish()
    }
}
