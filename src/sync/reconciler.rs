/*!
 * Reconciler - converges the remote registry onto the local declarations
 *
 * One pass per scope: fetch, plan, apply. Calls within a pass run
 * concurrently in bounded chunks. Failed calls are reported, never retried;
 * the next pass picks them up.
 */

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::plan::{plan_sync, SyncOperation, SyncOperationKind, SyncPlan};
use crate::command::CommandSchema;
use crate::error::TransportResult;
use crate::model::Snowflake;
use crate::registry::{CommandRegistry, CommandScope};
use crate::transport::RegistryTransport;

/// Default bound on in-flight remote calls
pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    pub name: String,
    pub operation: SyncOperationKind,
    pub error: String,
}

/// Outcome of one reconciliation pass over one scope.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub scope: CommandScope,
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub deleted: Vec<String>,
    pub unchanged: Vec<String>,
    pub failures: Vec<SyncFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    fn new(scope: CommandScope) -> Self {
        let now = Utc::now();
        Self {
            scope,
            created: Vec::new(),
            updated: Vec::new(),
            deleted: Vec::new(),
            unchanged: Vec::new(),
            failures: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Create, update and delete calls that went through.
    pub fn changes(&self) -> usize {
        self.created.len() + self.updated.len() + self.deleted.len()
    }

    fn record(&mut self, name: String, kind: SyncOperationKind, result: TransportResult<()>) {
        match result {
            Ok(()) => match kind {
                SyncOperationKind::Create => self.created.push(name),
                SyncOperationKind::Update => self.updated.push(name),
                SyncOperationKind::Delete => self.deleted.push(name),
                SyncOperationKind::Fetch => {}
            },
            Err(e) => {
                warn!(scope = %self.scope, command = %name, operation = kind.as_str(), error = %e, "remote call failed");
                self.failures.push(SyncFailure {
                    name,
                    operation: kind,
                    error: e.to_string(),
                });
            }
        }
    }
}

pub struct Reconciler {
    transport: Arc<dyn RegistryTransport>,
    concurrency: usize,
}

impl Reconciler {
    pub fn new(transport: Arc<dyn RegistryTransport>, concurrency: usize) -> Self {
        Self {
            transport,
            concurrency: concurrency.max(1),
        }
    }

    /// Reconciles the global scope, then every guild that has local commands
    /// or that the transport reports as known.
    pub async fn sync_all(
        &self,
        registry: &CommandRegistry,
        parallel_guilds: bool,
    ) -> Vec<SyncReport> {
        let mut reports = vec![
            self.sync_scope(CommandScope::Global, registry.snapshot(CommandScope::Global))
                .await,
        ];

        let mut guilds: BTreeSet<Snowflake> = registry
            .scopes()
            .into_iter()
            .filter_map(|scope| scope.guild_id())
            .collect();
        match self.transport.known_guilds().await {
            Ok(known) => guilds.extend(known),
            Err(e) => warn!(error = %e, "could not list known guilds, syncing local scopes only"),
        }

        let scopes: Vec<CommandScope> = guilds.into_iter().map(CommandScope::Guild).collect();
        if parallel_guilds {
            for chunk in scopes.chunks(self.concurrency) {
                let passes = chunk
                    .iter()
                    .map(|scope| self.sync_scope(*scope, registry.snapshot(*scope)));
                reports.extend(join_all(passes).await);
            }
        } else {
            for scope in scopes {
                reports.push(self.sync_scope(scope, registry.snapshot(scope)).await);
            }
        }

        reports
    }

    pub async fn sync_scope(
        &self,
        scope: CommandScope,
        desired: HashMap<String, CommandSchema>,
    ) -> SyncReport {
        let remote = match self.transport.fetch_commands(scope).await {
            Ok(remote) => remote,
            Err(e) => {
                let mut report = SyncReport::new(scope);
                report.record(scope.to_string(), SyncOperationKind::Fetch, Err(e));
                report.finished_at = Utc::now();
                return report;
            }
        };

        let plan = plan_sync(desired, &remote);
        debug!(
            scope = %scope,
            remote = remote.len(),
            operations = plan.operations.len(),
            unchanged = plan.unchanged.len(),
            "planned sync"
        );
        self.apply(scope, plan).await
    }

    pub async fn apply(&self, scope: CommandScope, plan: SyncPlan) -> SyncReport {
        let mut report = SyncReport::new(scope);
        report.unchanged = plan.unchanged;

        for chunk in plan.operations.chunks(self.concurrency) {
            let calls = chunk.iter().map(|op| self.execute(scope, op));
            for (name, kind, result) in join_all(calls).await {
                report.record(name, kind, result);
            }
        }

        report.finished_at = Utc::now();
        info!(
            scope = %scope,
            created = report.created.len(),
            updated = report.updated.len(),
            deleted = report.deleted.len(),
            unchanged = report.unchanged.len(),
            failed = report.failures.len(),
            "sync pass finished"
        );
        report
    }

    async fn execute(
        &self,
        scope: CommandScope,
        op: &SyncOperation,
    ) -> (String, SyncOperationKind, TransportResult<()>) {
        debug!(scope = %scope, command = %op.name(), operation = op.kind().as_str(), "remote call");
        let result = match op {
            SyncOperation::Create(schema) => {
                self.transport.create_command(scope, schema).await.map(|_| ())
            }
            SyncOperation::Update { id, schema } => self
                .transport
                .update_command(scope, *id, schema)
                .await
                .map(|_| ()),
            SyncOperation::Delete { id, .. } => self.transport.delete_command(scope, *id).await,
        };
        (op.name().to_string(), op.kind(), result)
    }
}
