/*!
 * CommandRegistry - top-level commands per scope
 *
 * Read-mostly after declaration. Writers take the lock exclusively so an
 * in-flight invocation or reconciliation never sees a half-updated scope.
 */

pub mod scope;

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::command::{CommandNode, CommandSchema, COMMAND_LIMIT};
use crate::error::RegistrationError;

pub use scope::CommandScope;

#[derive(Default)]
pub struct CommandRegistry {
    scopes: RwLock<HashMap<CommandScope, HashMap<String, Arc<CommandNode>>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(
        &self,
        command: impl Into<CommandNode>,
        scope: CommandScope,
    ) -> Result<Arc<CommandNode>, RegistrationError> {
        let command = Arc::new(command.into());
        let name = command.name().to_string();

        let mut scopes = self.scopes.write();
        let commands = scopes.entry(scope).or_default();
        if commands.contains_key(&name) {
            return Err(RegistrationError::DuplicateCommand {
                name,
                scope: scope.to_string(),
            });
        }
        if commands.len() >= COMMAND_LIMIT {
            return Err(RegistrationError::ScopeFull {
                scope: scope.to_string(),
                limit: COMMAND_LIMIT,
            });
        }

        commands.insert(name.clone(), command.clone());
        info!(command = %name, scope = %scope, "registered command");
        Ok(command)
    }

    pub fn remove_command(&self, name: &str, scope: CommandScope) -> Option<Arc<CommandNode>> {
        let mut scopes = self.scopes.write();
        let commands = scopes.get_mut(&scope)?;
        let removed = commands.remove(name);
        if commands.is_empty() {
            scopes.remove(&scope);
        }
        if removed.is_some() {
            debug!(command = %name, scope = %scope, "removed command");
        }
        removed
    }

    pub fn get_command(&self, name: &str, scope: CommandScope) -> Option<Arc<CommandNode>> {
        self.scopes.read().get(&scope)?.get(name).cloned()
    }

    /// Desired registration payloads for one scope, keyed by name.
    pub fn snapshot(&self, scope: CommandScope) -> HashMap<String, CommandSchema> {
        self.scopes
            .read()
            .get(&scope)
            .map(|commands| {
                commands
                    .iter()
                    .map(|(name, node)| (name.clone(), node.to_schema()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Scopes holding at least one command, global first.
    pub fn scopes(&self) -> Vec<CommandScope> {
        let mut scopes: Vec<CommandScope> = self.scopes.read().keys().copied().collect();
        scopes.sort();
        scopes
    }

    pub fn len(&self, scope: CommandScope) -> usize {
        self.scopes.read().get(&scope).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.read().values().all(HashMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::SlashCommand;
    use crate::model::Snowflake;

    fn command(name: &str) -> SlashCommand {
        SlashCommand::builder(name)
            .description("Does a thing.")
            .context("ctx")
            .handler(|_ctx, _args| async { Ok(None) })
            .build()
            .unwrap()
    }

    #[test]
    fn scopes_are_independent() {
        let registry = CommandRegistry::new();
        let guild = CommandScope::Guild(Snowflake(5));
        registry.add_command(command("ping"), CommandScope::Global).unwrap();
        registry.add_command(command("ping"), guild).unwrap();

        assert!(matches!(
            registry.add_command(command("ping"), guild),
            Err(RegistrationError::DuplicateCommand { .. })
        ));
        assert_eq!(registry.scopes(), vec![CommandScope::Global, guild]);
        assert!(registry.get_command("ping", guild).is_some());
        assert!(registry.get_command("pong", guild).is_none());

        assert!(registry.remove_command("ping", guild).is_some());
        assert_eq!(registry.scopes(), vec![CommandScope::Global]);
        assert_eq!(registry.len(guild), 0);
    }

    #[test]
    fn snapshot_projects_schemas() {
        let registry = CommandRegistry::new();
        registry.add_command(command("ping"), CommandScope::Global).unwrap();
        let snapshot = registry.snapshot(CommandScope::Global);
        assert_eq!(snapshot["ping"].description, "Does a thing.");
        assert!(registry.snapshot(CommandScope::Guild(Snowflake(1))).is_empty());
    }

    #[test]
    fn concurrent_reads_during_declaration() {
        let registry = Arc::new(CommandRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for i in 0..10 {
                        registry
                            .add_command(command(&format!("c{t}-{i}")), CommandScope::Global)
                            .unwrap();
                        let _ = registry.snapshot(CommandScope::Global);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(CommandScope::Global), 40);
    }
}
