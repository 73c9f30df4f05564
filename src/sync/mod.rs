// Registry reconciliation: pure diff planning plus the transport-driven applier

pub mod plan;
pub mod reconciler;

pub use plan::{plan_sync, SyncOperation, SyncOperationKind, SyncPlan};
pub use reconciler::{Reconciler, SyncFailure, SyncReport, DEFAULT_CONCURRENCY};
