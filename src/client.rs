/*!
 * SlashClient - ties declaration, reconciliation and dispatch together
 *
 * Lifecycle: commands are added during a declaration phase, `on_ready` runs
 * one reconciliation pass over every scope, and `on_interaction` serves each
 * inbound payload independently.
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::command::CommandNode;
use crate::config::SlashConfig;
use crate::error::{RegistrationError, SlashResult};
use crate::interaction::{DispatchOutcome, InteractionPayload, InteractionRouter};
use crate::registry::{CommandRegistry, CommandScope};
use crate::sync::{Reconciler, SyncReport};
use crate::transport::{EntityProvider, InteractionResponder, RegistryTransport};

pub struct SlashClient {
    config: SlashConfig,
    registry: Arc<CommandRegistry>,
    reconciler: Reconciler,
    router: InteractionRouter,
    ready: AtomicBool,
}

impl SlashClient {
    pub fn new(
        config: SlashConfig,
        transport: Arc<dyn RegistryTransport>,
        entities: Arc<dyn EntityProvider>,
        responder: Arc<dyn InteractionResponder>,
    ) -> Self {
        let registry = Arc::new(CommandRegistry::new());
        let reconciler = Reconciler::new(transport, config.sync.concurrency);
        let router = InteractionRouter::new(
            registry.clone(),
            entities,
            responder,
            config.responses.clone(),
        );

        Self {
            config,
            registry,
            reconciler,
            router,
            ready: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SlashConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    pub fn add_command(
        &self,
        command: impl Into<CommandNode>,
        scope: CommandScope,
    ) -> Result<Arc<CommandNode>, RegistrationError> {
        self.registry.add_command(command, scope)
    }

    pub fn remove_command(&self, name: &str, scope: CommandScope) -> Option<Arc<CommandNode>> {
        self.registry.remove_command(name, scope)
    }

    pub fn get_command(&self, name: &str, scope: CommandScope) -> Option<Arc<CommandNode>> {
        self.registry.get_command(name, scope)
    }

    /// One-time ready trigger. Returns `None` when it already fired.
    pub async fn on_ready(&self) -> Option<Vec<SyncReport>> {
        if self
            .ready
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("ready trigger already handled");
            return None;
        }

        if !self.config.sync.enabled {
            info!("command sync disabled by configuration");
            return Some(Vec::new());
        }
        Some(self.sync_commands().await)
    }

    /// Runs a reconciliation pass over every scope now.
    pub async fn sync_commands(&self) -> Vec<SyncReport> {
        let reports = self
            .reconciler
            .sync_all(&self.registry, self.config.sync.parallel_guilds)
            .await;

        let failed: usize = reports.iter().map(|r| r.failures.len()).sum();
        if failed > 0 {
            warn!(scopes = reports.len(), failed, "command sync finished with failures");
        } else {
            info!(scopes = reports.len(), "command sync finished");
        }
        reports
    }

    pub async fn on_interaction(&self, payload: InteractionPayload) -> SlashResult<DispatchOutcome> {
        self.router.dispatch(payload).await
    }
}
