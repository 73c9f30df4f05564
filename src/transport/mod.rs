/*!
 * Remote collaborator seams
 *
 * The network client is not part of this crate. It plugs in through three
 * traits: the registry transport used by reconciliation, the entity provider
 * used by argument conversion, and the responder used to answer interactions.
 */

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::command::CommandSchema;
use crate::error::TransportResult;
use crate::interaction::InteractionResponse;
use crate::model::{Channel, Member, Role, Snowflake, User};
use crate::registry::CommandScope;

pub use memory::{MemoryRemote, RemoteCall};

/// A command entry as stored by the remote registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCommand {
    pub id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<Snowflake>,
    #[serde(flatten)]
    pub schema: CommandSchema,
}

impl RemoteCommand {
    pub fn name(&self) -> &str {
        &self.schema.name
    }
}

#[async_trait]
pub trait RegistryTransport: Send + Sync {
    async fn fetch_commands(&self, scope: CommandScope) -> TransportResult<Vec<RemoteCommand>>;

    async fn create_command(
        &self,
        scope: CommandScope,
        schema: &CommandSchema,
    ) -> TransportResult<RemoteCommand>;

    async fn update_command(
        &self,
        scope: CommandScope,
        id: Snowflake,
        schema: &CommandSchema,
    ) -> TransportResult<RemoteCommand>;

    async fn delete_command(&self, scope: CommandScope, id: Snowflake) -> TransportResult<()>;

    /// Guilds the client currently belongs to.
    async fn known_guilds(&self) -> TransportResult<Vec<Snowflake>>;
}

/// Cache-then-fetch lookups used when converting raw ids into entities.
#[async_trait]
pub trait EntityProvider: Send + Sync {
    async fn user(&self, id: Snowflake) -> TransportResult<Option<User>>;

    async fn member(&self, guild: Snowflake, id: Snowflake) -> TransportResult<Option<Member>>;

    async fn channel(&self, guild: Option<Snowflake>, id: Snowflake)
        -> TransportResult<Option<Channel>>;

    async fn role(&self, guild: Snowflake, id: Snowflake) -> TransportResult<Option<Role>>;
}

#[async_trait]
pub trait InteractionResponder: Send + Sync {
    async fn respond(
        &self,
        interaction: Snowflake,
        token: &str,
        response: &InteractionResponse,
    ) -> TransportResult<()>;
}
