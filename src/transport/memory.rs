/*!
 * In-memory collaborator
 *
 * Plays the remote registry, the entity cache and the response channel at
 * once. Every registry call is recorded so tests can assert on the exact
 * operations a reconciliation pass issued. Failures can be injected per
 * command name or per scope.
 */

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use super::{EntityProvider, InteractionResponder, RegistryTransport, RemoteCommand};
use crate::command::CommandSchema;
use crate::error::{TransportError, TransportResult};
use crate::interaction::InteractionResponse;
use crate::model::{Channel, Member, Role, Snowflake, User};
use crate::registry::CommandScope;

/// A registry call as observed by `MemoryRemote`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Fetch(CommandScope),
    Create { scope: CommandScope, name: String },
    Update { scope: CommandScope, name: String },
    Delete { scope: CommandScope, name: String },
}

impl RemoteCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, RemoteCall::Fetch(_))
    }
}

pub struct MemoryRemote {
    commands: DashMap<CommandScope, Vec<RemoteCommand>>,
    next_id: AtomicU64,
    calls: Mutex<Vec<RemoteCall>>,
    failing_names: DashSet<String>,
    failing_scopes: DashSet<CommandScope>,
    guilds: RwLock<Vec<Snowflake>>,
    users: DashMap<Snowflake, User>,
    members: DashMap<(Snowflake, Snowflake), Member>,
    channels: DashMap<Snowflake, Channel>,
    roles: DashMap<(Snowflake, Snowflake), Role>,
    responses: Mutex<Vec<(Snowflake, InteractionResponse)>>,
    failing_responses: AtomicBool,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self {
            commands: DashMap::new(),
            next_id: AtomicU64::new(1000),
            calls: Mutex::new(Vec::new()),
            failing_names: DashSet::new(),
            failing_scopes: DashSet::new(),
            guilds: RwLock::new(Vec::new()),
            users: DashMap::new(),
            members: DashMap::new(),
            channels: DashMap::new(),
            roles: DashMap::new(),
            responses: Mutex::new(Vec::new()),
            failing_responses: AtomicBool::new(false),
        }
    }

    // ============================================================================
    // Remote registry state
    // ============================================================================

    /// Stores an entry directly, without recording a call.
    pub fn seed_command(&self, scope: CommandScope, schema: CommandSchema) -> RemoteCommand {
        let entry = RemoteCommand {
            id: self.allocate_id(),
            application_id: None,
            schema,
        };
        self.commands.entry(scope).or_default().push(entry.clone());
        entry
    }

    pub fn commands(&self, scope: CommandScope) -> Vec<RemoteCommand> {
        self.commands
            .get(&scope)
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn command_names(&self, scope: CommandScope) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands(scope)
            .into_iter()
            .map(|c| c.schema.name)
            .collect();
        names.sort();
        names
    }

    pub fn add_guild(&self, guild: impl Into<Snowflake>) {
        self.guilds.write().push(guild.into());
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().clone()
    }

    pub fn mutations(&self) -> Vec<RemoteCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Makes every create, update or delete of `name` fail.
    pub fn fail_on(&self, name: impl Into<String>) {
        self.failing_names.insert(name.into());
    }

    /// Makes fetching `scope` fail.
    pub fn fail_fetch(&self, scope: CommandScope) {
        self.failing_scopes.insert(scope);
    }

    pub fn heal(&self) {
        self.failing_names.clear();
        self.failing_scopes.clear();
    }

    fn allocate_id(&self) -> Snowflake {
        Snowflake(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().push(call);
    }

    fn check_name(&self, operation: &str, name: &str) -> TransportResult<()> {
        if self.failing_names.contains(name) {
            return Err(TransportError::Request {
                operation: format!("{operation} '{name}'"),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn name_of(&self, scope: CommandScope, id: Snowflake) -> Option<String> {
        self.commands
            .get(&scope)?
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.schema.name.clone())
    }

    // ============================================================================
    // Entity cache
    // ============================================================================

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn insert_member(&self, guild: Snowflake, member: Member) {
        self.users.insert(member.id(), member.user.clone());
        self.members.insert((guild, member.id()), member);
    }

    pub fn insert_channel(&self, channel: Channel) {
        self.channels.insert(channel.id, channel);
    }

    pub fn insert_role(&self, guild: Snowflake, role: Role) {
        self.roles.insert((guild, role.id), role);
    }

    // ============================================================================
    // Responses
    // ============================================================================

    /// Makes every response emission fail while `fail` is set.
    pub fn fail_responses(&self, fail: bool) {
        self.failing_responses.store(fail, Ordering::SeqCst);
    }

    pub fn responses(&self) -> Vec<(Snowflake, InteractionResponse)> {
        self.responses.lock().clone()
    }

    pub fn responses_for(&self, interaction: Snowflake) -> Vec<InteractionResponse> {
        self.responses
            .lock()
            .iter()
            .filter(|(id, _)| *id == interaction)
            .map(|(_, response)| response.clone())
            .collect()
    }
}

#[async_trait]
impl RegistryTransport for MemoryRemote {
    async fn fetch_commands(&self, scope: CommandScope) -> TransportResult<Vec<RemoteCommand>> {
        self.record(RemoteCall::Fetch(scope));
        if self.failing_scopes.contains(&scope) {
            return Err(TransportError::Unavailable(format!("fetch {scope}")));
        }
        Ok(self.commands(scope))
    }

    async fn create_command(
        &self,
        scope: CommandScope,
        schema: &CommandSchema,
    ) -> TransportResult<RemoteCommand> {
        self.record(RemoteCall::Create {
            scope,
            name: schema.name.clone(),
        });
        self.check_name("create", &schema.name)?;

        let entry = RemoteCommand {
            id: self.allocate_id(),
            application_id: None,
            schema: schema.clone(),
        };
        self.commands.entry(scope).or_default().push(entry.clone());
        Ok(entry)
    }

    async fn update_command(
        &self,
        scope: CommandScope,
        id: Snowflake,
        schema: &CommandSchema,
    ) -> TransportResult<RemoteCommand> {
        self.record(RemoteCall::Update {
            scope,
            name: schema.name.clone(),
        });
        self.check_name("update", &schema.name)?;

        let mut entries = self
            .commands
            .get_mut(&scope)
            .ok_or_else(|| TransportError::NotFound(id.to_string()))?;
        let entry = entries
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| TransportError::NotFound(id.to_string()))?;
        entry.schema = schema.clone();
        Ok(entry.clone())
    }

    async fn delete_command(&self, scope: CommandScope, id: Snowflake) -> TransportResult<()> {
        let name = self
            .name_of(scope, id)
            .ok_or_else(|| TransportError::NotFound(id.to_string()))?;
        self.record(RemoteCall::Delete {
            scope,
            name: name.clone(),
        });
        self.check_name("delete", &name)?;

        if let Some(mut entries) = self.commands.get_mut(&scope) {
            entries.retain(|c| c.id != id);
        }
        Ok(())
    }

    async fn known_guilds(&self) -> TransportResult<Vec<Snowflake>> {
        Ok(self.guilds.read().clone())
    }
}

#[async_trait]
impl EntityProvider for MemoryRemote {
    async fn user(&self, id: Snowflake) -> TransportResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn member(&self, guild: Snowflake, id: Snowflake) -> TransportResult<Option<Member>> {
        Ok(self.members.get(&(guild, id)).map(|m| m.clone()))
    }

    async fn channel(
        &self,
        _guild: Option<Snowflake>,
        id: Snowflake,
    ) -> TransportResult<Option<Channel>> {
        Ok(self.channels.get(&id).map(|c| c.clone()))
    }

    async fn role(&self, guild: Snowflake, id: Snowflake) -> TransportResult<Option<Role>> {
        Ok(self.roles.get(&(guild, id)).map(|r| r.clone()))
    }
}

#[async_trait]
impl InteractionResponder for MemoryRemote {
    async fn respond(
        &self,
        interaction: Snowflake,
        _token: &str,
        response: &InteractionResponse,
    ) -> TransportResult<()> {
        if self.failing_responses.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable(format!(
                "respond to interaction {interaction}"
            )));
        }
        self.responses.lock().push((interaction, response.clone()));
        Ok(())
    }
}
